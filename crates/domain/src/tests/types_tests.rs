// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Period, PeriodStatus, TenantId, VehicleRef, VehicleStatus};
use time::macros::date;

#[test]
fn test_tenant_id_rejects_empty_and_path_hostile_values() {
    assert!(TenantId::new("").is_err());
    assert!(TenantId::new("   ").is_err());
    assert!(TenantId::new("../escape").is_err());
    assert!(TenantId::new("acme rentals").is_err());
    assert!(TenantId::new("acme-rentals_01").is_ok());
}

#[test]
fn test_vehicle_ref_normalizes_plate() {
    let plate: VehicleRef = VehicleRef::new("  abc1d23 ");
    assert_eq!(plate.as_str(), "ABC1D23");
    assert_eq!(plate, VehicleRef::new("ABC1D23"));
}

#[test]
fn test_vehicle_status_round_trips_through_storage_form() {
    for status in [
        VehicleStatus::Rented,
        VehicleStatus::Available,
        VehicleStatus::Maintenance,
        VehicleStatus::PendingReview,
    ] {
        assert_eq!(VehicleStatus::parse(status.as_str()).unwrap(), status);
    }
    assert!(VehicleStatus::parse("scrapped").is_err());
}

#[test]
fn test_period_status_round_trips_through_storage_form() {
    for status in [PeriodStatus::Open, PeriodStatus::Closed] {
        assert_eq!(PeriodStatus::parse(status.as_str()).unwrap(), status);
    }
    assert!(PeriodStatus::parse("reopened").is_err());
}

#[test]
fn test_period_end_date_is_start_plus_six_days() {
    let period: Period =
        Period::new(1, date!(2026 - 03 - 02), PeriodStatus::Open, None).unwrap();
    assert_eq!(period.end_date(), date!(2026 - 03 - 08));
}

#[test]
fn test_period_rejects_unrepresentable_end_date() {
    // The constructor is the only way to build a Period, so an end date
    // that disagrees with the start date cannot be materialized.
    let result = Period::new(1, time::Date::MAX, PeriodStatus::Open, None);
    assert!(matches!(
        result,
        Err(crate::error::DomainError::DateArithmeticOverflow { .. })
    ));
}

#[test]
fn test_period_elapsed_only_after_end_date() {
    let period: Period =
        Period::new(1, date!(2026 - 03 - 02), PeriodStatus::Open, None).unwrap();
    assert!(!period.has_elapsed(date!(2026 - 03 - 08)));
    assert!(period.has_elapsed(date!(2026 - 03 - 09)));
}
