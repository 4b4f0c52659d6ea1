// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly ledger lifecycle service for the Fleet Ledger back office.
//!
//! The [`WeeklyLedger`] service owns the period lifecycle: creating a
//! week (carrying commercial state forward from the prior one), editing
//! lines with automatic recomputation of derived financials, syncing an
//! open week against the active fleet, and closing a week terminally.
//!
//! Fleet data comes through the [`FleetRegistry`] trait; production
//! deployments use [`MirrorFleet`] over the per-tenant fleet mirror,
//! tests substitute in-memory fakes.

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

mod error;
mod fleet;
mod lifecycle;

#[cfg(test)]
mod tests;

pub use error::LedgerError;
pub use fleet::{FleetRegistry, MirrorFleet};
pub use lifecycle::{LineEdit, WeeklyLedger};
