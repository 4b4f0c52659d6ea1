// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! KPI aggregation for the Fleet Ledger back office.
//!
//! The [`AnalyticsEngine`] turns a window of a tenant's weekly periods
//! into a [`KpiSnapshot`]: occupancy, revenue per unit, delinquency,
//! churn rate, and top-10 revenue rankings, per period and across the
//! window. The aggregation itself ([`aggregate`]) is a pure function
//! over already-loaded periods, so every figure is unit-testable
//! without a store.

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
#![allow(clippy::multiple_crate_versions)]

mod engine;
mod error;
mod kpi;

#[cfg(test)]
mod tests;

pub use engine::{AnalyticsEngine, Window};
pub use error::AnalyticsError;
pub use kpi::{ClientRevenue, KpiSnapshot, PeriodKpi, VehicleRevenue, aggregate};
