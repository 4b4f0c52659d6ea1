// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the Fleet Ledger back office.
//!
//! This crate is pure: no I/O, no database access. It owns the weekly
//! ledger entities (`Period`, `PeriodLine`), the collaborator shapes the
//! ledger consumes (`Vehicle`, `Client`), and the rental calculator that
//! is the single source of truth for every derived financial field.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod rental;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use rental::{
    ADMIN_FEE_MULTIPLIER, Financials, MAX_DISCOUNT_PERCENT, balance, daily_rate,
    discount_waste, discounted_value, forecast, receivable_with_fee, round2, weekly_revenue,
};
pub use types::{
    Client, ClientRef, LineCharges, LineFlags, Period, PeriodLine, PeriodStatus,
    PeriodWithLines, TenantId, Vehicle, VehicleRef, VehicleStatus,
};
