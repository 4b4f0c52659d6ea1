// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rental::{
    Financials, balance, daily_rate, discount_waste, discounted_value, forecast,
    receivable_with_fee, round2, weekly_revenue,
};
use crate::tests::create_test_charges;
use crate::types::{LineCharges, VehicleStatus};
use crate::DomainError;

const TOLERANCE: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_daily_rate_divides_weekly_tariff_by_seven() {
    assert_close(daily_rate(700.0), 100.0);
    assert_close(daily_rate(700.0) * 7.0, 700.0);
}

#[test]
fn test_daily_rate_zero_and_non_finite_inputs_yield_zero() {
    assert_close(daily_rate(0.0), 0.0);
    assert_close(daily_rate(f64::NAN), 0.0);
    assert_close(daily_rate(f64::INFINITY), 0.0);
}

#[test]
fn test_weekly_revenue_only_for_rented_lines() {
    let rate: f64 = daily_rate(700.0);
    assert_close(weekly_revenue(5.0, rate, VehicleStatus::Rented).unwrap(), 500.0);
    assert_close(weekly_revenue(5.0, rate, VehicleStatus::Available).unwrap(), 0.0);
    assert_close(weekly_revenue(5.0, rate, VehicleStatus::Maintenance).unwrap(), 0.0);
    assert_close(
        weekly_revenue(5.0, rate, VehicleStatus::PendingReview).unwrap(),
        0.0,
    );
}

#[test]
fn test_weekly_revenue_rejects_negative_days() {
    let result = weekly_revenue(-1.0, 100.0, VehicleStatus::Rented);
    assert_eq!(result, Err(DomainError::NegativeDaysRented { days: -1.0 }));
}

#[test]
fn test_forecast_sums_surcharges_and_subtracts_discount() {
    let charges: LineCharges = create_test_charges();
    // 500 + 50 + 35 + 10 + 5 - 20
    assert_close(forecast(500.0, &charges), 580.0);
}

#[test]
fn test_balance_is_received_minus_forecast() {
    assert_close(balance(300.0, 580.0), -280.0);
    assert_close(balance(580.0, 580.0), 0.0);
}

#[test]
fn test_round2_half_up_with_epsilon() {
    assert_close(round2(1.005), 1.01);
    assert_close(round2(2.675), 2.68);
    assert_close(round2(1.004), 1.0);
    assert_close(round2(-1.005), -1.01);
}

#[test]
fn test_discounted_value() {
    assert_close(discounted_value(1000.0, 10.0), 900.0);
    assert_close(discounted_value(1000.0, 0.0), 1000.0);
}

#[test]
fn test_receivable_with_fee_applies_fixed_fifteen_percent() {
    assert_close(receivable_with_fee(100.0, true), 115.0);
    assert_close(receivable_with_fee(100.0, false), 100.0);
}

#[test]
fn test_discount_waste_is_unused_headroom_against_cap() {
    // Cap is 40%: granting 10% on 1000 wastes 300 of headroom.
    assert_close(discount_waste(1000.0, 10.0), 300.0);
    assert_close(discount_waste(1000.0, 40.0), 0.0);
    assert_close(discount_waste(1000.0, 0.0), 400.0);
}

#[test]
fn test_derive_establishes_all_four_identities() {
    let charges: LineCharges = create_test_charges();
    let financials: Financials =
        Financials::derive(VehicleStatus::Rented, 5.0, 700.0, &charges, 300.0).unwrap();

    assert_close(financials.daily_rate() * 7.0, 700.0);
    assert_close(financials.base_revenue(), 500.0);
    assert_close(
        financials.forecast(),
        financials.base_revenue() + charges.premium + charges.protection
            + charges.agreement_fee
            + charges.invoice_fee
            - charges.discount,
    );
    assert_close(financials.balance(), 300.0 - financials.forecast());
}

#[test]
fn test_derive_non_rented_line_has_zero_base_revenue() {
    let charges: LineCharges = LineCharges::default();
    let financials: Financials =
        Financials::derive(VehicleStatus::Available, 7.0, 700.0, &charges, 0.0).unwrap();

    assert_close(financials.base_revenue(), 0.0);
    assert_close(financials.forecast(), 0.0);
    assert_close(financials.balance(), 0.0);
}

#[test]
fn test_derive_coerces_non_finite_inputs_to_zero() {
    let charges: LineCharges = LineCharges {
        premium: f64::NAN,
        ..LineCharges::default()
    };
    let financials: Financials =
        Financials::derive(VehicleStatus::Rented, f64::NAN, f64::NAN, &charges, f64::NAN)
            .unwrap();

    assert_close(financials.daily_rate(), 0.0);
    assert_close(financials.base_revenue(), 0.0);
    assert_close(financials.forecast(), 0.0);
    assert_close(financials.balance(), 0.0);
}
