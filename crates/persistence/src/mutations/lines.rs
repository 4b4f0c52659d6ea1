// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period line mutations.

use diesel::prelude::*;
use fleet_ledger_domain::PeriodLine;

use crate::data_models::NewPeriodLine;
use crate::diesel_schema::period_lines;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a single line into an existing period.
///
/// # Errors
///
/// Returns a database error if the insert fails (e.g., the
/// `(period_id, vehicle_plate)` uniqueness constraint is violated).
pub fn insert_line(
    conn: &mut SqliteConnection,
    line: &NewPeriodLine,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(period_lines::table)
        .values(line)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Overwrites a line's commercial attributes and financial columns from
/// a recomputed domain line.
///
/// The financial columns come from the line's `Financials`, which only
/// the calculator can produce, so stored derived values cannot drift
/// from their inputs.
///
/// # Errors
///
/// Returns `LineNotFound` if the line does not exist.
pub fn update_line(conn: &mut SqliteConnection, line: &PeriodLine) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(period_lines::table.filter(period_lines::id.eq(line.id)))
        .set((
            period_lines::client_id.eq(line.client.map(|c| c.0)),
            period_lines::status.eq(line.status.as_str()),
            period_lines::days_rented.eq(line.days_rented),
            period_lines::tariff.eq(line.tariff),
            period_lines::daily_rate.eq(line.financials.daily_rate()),
            period_lines::base_revenue.eq(line.financials.base_revenue()),
            period_lines::premium.eq(line.charges.premium),
            period_lines::protection.eq(line.charges.protection),
            period_lines::agreement_fee.eq(line.charges.agreement_fee),
            period_lines::invoice_fee.eq(line.charges.invoice_fee),
            period_lines::discount.eq(line.charges.discount),
            period_lines::forecast.eq(line.financials.forecast()),
            period_lines::received.eq(line.received),
            period_lines::balance.eq(line.financials.balance()),
            period_lines::signed.eq(i32::from(line.flags.signed)),
            period_lines::invoiced.eq(i32::from(line.flags.invoiced)),
            period_lines::reconciled.eq(i32::from(line.flags.reconciled)),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::LineNotFound(line.id));
    }
    Ok(())
}
