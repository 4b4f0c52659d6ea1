// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period mutations.

use diesel::prelude::*;
use fleet_ledger_domain::PeriodStatus;
use tracing::info;

use crate::data_models::{NewPeriod, NewPeriodLine};
use crate::diesel_schema::periods;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a period together with all of its seeded or carried lines as
/// one atomic unit: either the period and every line exist afterwards,
/// or none do.
///
/// The `period_id` field of each supplied line is overwritten with the
/// generated period ID inside the transaction.
///
/// # Errors
///
/// Returns `DuplicatePeriod` if a period with the same start date
/// already exists, or a database error if any insert fails.
pub fn insert_period_with_lines(
    conn: &mut SqliteConnection,
    period: NewPeriod,
    lines: Vec<NewPeriodLine>,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let already_exists: bool = diesel::select(diesel::dsl::exists(
            periods::table.filter(periods::start_date.eq(&period.start_date)),
        ))
        .get_result(conn)?;
        if already_exists {
            return Err(PersistenceError::DuplicatePeriod {
                start_date: period.start_date.clone(),
            });
        }

        diesel::insert_into(periods::table)
            .values(&period)
            .execute(conn)?;
        let period_id: i64 = get_last_insert_rowid(conn)?;

        let line_count: usize = lines.len();
        for mut line in lines {
            line.period_id = period_id;
            diesel::insert_into(crate::diesel_schema::period_lines::table)
                .values(&line)
                .execute(conn)?;
        }

        info!(
            period_id,
            start_date = %period.start_date,
            lines = line_count,
            "Created weekly period"
        );
        Ok(period_id)
    })
}

/// Marks a period as closed and stamps the close timestamp.
///
/// Callers are responsible for checking the current status first; this
/// mutation does not re-read the row.
///
/// # Errors
///
/// Returns `PeriodNotFound` if the period does not exist.
pub fn close_period(
    conn: &mut SqliteConnection,
    period_id: i64,
    closed_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(periods::table.filter(periods::id.eq(period_id)))
        .set((
            periods::status.eq(PeriodStatus::Closed.as_str()),
            periods::closed_at.eq(closed_at),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::PeriodNotFound(period_id));
    }
    info!(period_id, closed_at, "Closed weekly period");
    Ok(())
}
