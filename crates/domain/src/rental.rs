// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental financial calculations.
//!
//! This module provides pure, deterministic financial functions for the
//! weekly ledger. It is the single source of truth for every derived
//! field on a period line: daily rate, base revenue, forecast and
//! balance all flow through [`Financials::derive`].
//!
//! Arithmetic is deliberately total: non-finite inputs are coerced to
//! zero so that a single malformed field cannot cascade through ledger
//! recomputation. The one hard error is a negative rented-day count.

use crate::error::DomainError;
use crate::types::{LineCharges, VehicleStatus};
use serde::Serialize;

/// Maximum commercial discount a tenant may grant, in percent.
pub const MAX_DISCOUNT_PERCENT: f64 = 40.0;

/// Multiplier applied when the fixed administrative charge fee is due.
pub const ADMIN_FEE_MULTIPLIER: f64 = 1.15;

/// Epsilon used to counter floating-point drift before rounding.
const ROUND_EPSILON: f64 = 1e-9;

/// Days in a weekly billing cycle.
const DAYS_PER_WEEK: f64 = 7.0;

/// Coerces non-finite values to zero so ledger arithmetic stays total.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Rounds to 2 decimal places, half-up, with an epsilon nudge.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let shifted: f64 = sanitize(value) * 100.0;
    let nudged: f64 = if shifted >= 0.0 {
        shifted + ROUND_EPSILON
    } else {
        shifted - ROUND_EPSILON
    };
    nudged.round() / 100.0
}

/// Daily rate derived from a weekly tariff.
#[must_use]
pub fn daily_rate(weekly_tariff: f64) -> f64 {
    sanitize(weekly_tariff) / DAYS_PER_WEEK
}

/// Base weekly revenue for a line.
///
/// Only lines in `Rented` status generate revenue; every other status
/// yields zero regardless of the day count.
///
/// # Errors
///
/// Returns `DomainError::NegativeDaysRented` if `days` is negative.
pub fn weekly_revenue(
    days: f64,
    daily_rate: f64,
    status: VehicleStatus,
) -> Result<f64, DomainError> {
    let days: f64 = sanitize(days);
    if days < 0.0 {
        return Err(DomainError::NegativeDaysRented { days });
    }
    if status != VehicleStatus::Rented {
        return Ok(0.0);
    }
    Ok(round2(days * sanitize(daily_rate)))
}

/// Forecast amount owed for a line: base revenue plus surcharges, net of
/// discount.
#[must_use]
pub fn forecast(base_revenue: f64, charges: &LineCharges) -> f64 {
    round2(
        sanitize(base_revenue) + sanitize(charges.premium) + sanitize(charges.protection)
            + sanitize(charges.agreement_fee)
            + sanitize(charges.invoice_fee)
            - sanitize(charges.discount),
    )
}

/// Balance of a line: received minus forecast. Negative means the client
/// still owes money for the week.
#[must_use]
pub fn balance(received: f64, forecast: f64) -> f64 {
    round2(sanitize(received) - sanitize(forecast))
}

/// Value after applying a percentage discount.
#[must_use]
pub fn discounted_value(original: f64, discount_percent: f64) -> f64 {
    round2(sanitize(original) * (1.0 - sanitize(discount_percent) / 100.0))
}

/// Receivable amount, with the fixed administrative fee when applicable.
#[must_use]
pub fn receivable_with_fee(discounted_value: f64, charge_fee: bool) -> f64 {
    let multiplier: f64 = if charge_fee { ADMIN_FEE_MULTIPLIER } else { 1.0 };
    round2(sanitize(discounted_value) * multiplier)
}

/// Unused discount headroom against the fixed 40% cap.
///
/// Business rule: the maximum permitted discount is `MAX_DISCOUNT_PERCENT`;
/// the waste is what the tenant could still have granted.
#[must_use]
pub fn discount_waste(original: f64, applied_percent: f64) -> f64 {
    let original: f64 = sanitize(original);
    round2(
        original * (MAX_DISCOUNT_PERCENT / 100.0)
            - original * (sanitize(applied_percent) / 100.0),
    )
}

/// Derived financial fields of a period line.
///
/// The fields are private and there is no public constructor besides
/// [`Financials::derive`], so a forecast or balance that disagrees with
/// its inputs cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Financials {
    daily_rate: f64,
    base_revenue: f64,
    forecast: f64,
    balance: f64,
}

impl Financials {
    /// Re-establishes all four financial identities from their inputs.
    ///
    /// - `daily_rate = tariff / 7`
    /// - `base_revenue = days × daily_rate` when rented, else `0`
    /// - `forecast = base_revenue + Σsurcharges − discount`
    /// - `balance = received − forecast`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeDaysRented` if `days` is negative.
    pub fn derive(
        status: VehicleStatus,
        days: f64,
        tariff: f64,
        charges: &LineCharges,
        received: f64,
    ) -> Result<Self, DomainError> {
        let daily_rate: f64 = daily_rate(tariff);
        let base_revenue: f64 = weekly_revenue(days, daily_rate, status)?;
        let forecast: f64 = forecast(base_revenue, charges);
        let balance: f64 = balance(received, forecast);
        Ok(Self {
            daily_rate,
            base_revenue,
            forecast,
            balance,
        })
    }

    #[must_use]
    pub const fn daily_rate(&self) -> f64 {
        self.daily_rate
    }

    #[must_use]
    pub const fn base_revenue(&self) -> f64 {
        self.base_revenue
    }

    #[must_use]
    pub const fn forecast(&self) -> f64 {
        self.forecast
    }

    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }
}
