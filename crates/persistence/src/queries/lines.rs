// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period line queries.

use diesel::prelude::*;
use fleet_ledger_domain::{PeriodLine, VehicleRef};

use crate::data_models::PeriodLineRow;
use crate::diesel_schema::period_lines;
use crate::error::PersistenceError;

/// Retrieves a line by ID.
///
/// # Errors
///
/// Returns `LineNotFound` if no line has the given ID.
pub fn get_line(conn: &mut SqliteConnection, line_id: i64) -> Result<PeriodLine, PersistenceError> {
    let row: PeriodLineRow = period_lines::table
        .filter(period_lines::id.eq(line_id))
        .first::<PeriodLineRow>(conn)
        .optional()?
        .ok_or(PersistenceError::LineNotFound(line_id))?;
    row.into_domain()
}

/// Lists all lines of a period, in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_lines(
    conn: &mut SqliteConnection,
    period_id: i64,
) -> Result<Vec<PeriodLine>, PersistenceError> {
    let rows: Vec<PeriodLineRow> = period_lines::table
        .filter(period_lines::period_id.eq(period_id))
        .order(period_lines::id.asc())
        .load::<PeriodLineRow>(conn)?;
    rows.into_iter().map(PeriodLineRow::into_domain).collect()
}

/// Finds the line for a given vehicle within a period, if any.
///
/// The `(period_id, vehicle_plate)` pair is unique, so at most one line
/// can match.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn find_line_for_vehicle(
    conn: &mut SqliteConnection,
    period_id: i64,
    vehicle: &VehicleRef,
) -> Result<Option<PeriodLine>, PersistenceError> {
    period_lines::table
        .filter(period_lines::period_id.eq(period_id))
        .filter(period_lines::vehicle_plate.eq(vehicle.as_str()))
        .first::<PeriodLineRow>(conn)
        .optional()?
        .map(PeriodLineRow::into_domain)
        .transpose()
}
