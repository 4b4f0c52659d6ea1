// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period queries.

use diesel::prelude::*;
use fleet_ledger_domain::Period;
use time::Date;

use crate::data_models::{PeriodRow, format_date};
use crate::diesel_schema::periods;
use crate::error::PersistenceError;

/// Retrieves a period by ID.
///
/// # Errors
///
/// Returns `PeriodNotFound` if no period has the given ID.
pub fn get_period(conn: &mut SqliteConnection, period_id: i64) -> Result<Period, PersistenceError> {
    let row: PeriodRow = periods::table
        .filter(periods::id.eq(period_id))
        .first::<PeriodRow>(conn)
        .optional()?
        .ok_or(PersistenceError::PeriodNotFound(period_id))?;
    row.into_domain()
}

/// Retrieves the period starting on the given date, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn get_period_by_start(
    conn: &mut SqliteConnection,
    start_date: Date,
) -> Result<Option<Period>, PersistenceError> {
    let start: String = format_date(start_date)?;
    periods::table
        .filter(periods::start_date.eq(start))
        .first::<PeriodRow>(conn)
        .optional()?
        .map(PeriodRow::into_domain)
        .transpose()
}

/// Retrieves the most recent period that starts before the given date.
///
/// Used by carry-forward: the new period copies its commercial state
/// from this one.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn latest_period_before(
    conn: &mut SqliteConnection,
    start_date: Date,
) -> Result<Option<Period>, PersistenceError> {
    let start: String = format_date(start_date)?;
    periods::table
        .filter(periods::start_date.lt(start))
        .order(periods::start_date.desc())
        .first::<PeriodRow>(conn)
        .optional()?
        .map(PeriodRow::into_domain)
        .transpose()
}

/// Lists all periods, ascending by start date.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_periods(conn: &mut SqliteConnection) -> Result<Vec<Period>, PersistenceError> {
    let rows: Vec<PeriodRow> = periods::table
        .order(periods::start_date.asc())
        .load::<PeriodRow>(conn)?;
    rows.into_iter().map(PeriodRow::into_domain).collect()
}

/// Lists periods whose start date falls within `[start, end]`, ascending
/// by start date.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_periods_in_range(
    conn: &mut SqliteConnection,
    start: Date,
    end: Date,
) -> Result<Vec<Period>, PersistenceError> {
    let start: String = format_date(start)?;
    let end: String = format_date(end)?;
    let rows: Vec<PeriodRow> = periods::table
        .filter(periods::start_date.ge(start))
        .filter(periods::start_date.le(end))
        .order(periods::start_date.asc())
        .load::<PeriodRow>(conn)?;
    rows.into_iter().map(PeriodRow::into_domain).collect()
}

/// Lists the last `n` periods, ascending by start date.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn last_n_periods(
    conn: &mut SqliteConnection,
    n: i64,
) -> Result<Vec<Period>, PersistenceError> {
    let rows: Vec<PeriodRow> = periods::table
        .order(periods::start_date.desc())
        .limit(n)
        .load::<PeriodRow>(conn)?;
    let mut periods: Vec<Period> = rows
        .into_iter()
        .map(PeriodRow::into_domain)
        .collect::<Result<Vec<Period>, PersistenceError>>()?;
    periods.reverse();
    Ok(periods)
}
