// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use fleet_ledger_domain::{
    Financials, LineCharges, LineFlags, TenantId, Vehicle, VehicleRef, VehicleStatus,
};
use time::{Date, Duration};

use crate::data_models::{NewPeriod, NewPeriodLine, format_date};
use crate::TenantStore;

pub fn create_test_store() -> TenantStore {
    let tenant: TenantId = TenantId::new("acme-rentals").unwrap();
    TenantStore::new_in_memory(tenant).unwrap()
}

pub fn seed_vehicle(store: &mut TenantStore, plate: &str, base_tariff: f64) -> VehicleRef {
    let vehicle: Vehicle = Vehicle {
        plate: VehicleRef::new(plate),
        active: true,
        base_tariff,
    };
    store.upsert_vehicle(&vehicle).unwrap();
    vehicle.plate
}

pub fn new_open_period(start_date: Date) -> NewPeriod {
    NewPeriod {
        start_date: format_date(start_date).unwrap(),
        end_date: format_date(start_date + Duration::days(6)).unwrap(),
        status: String::from("open"),
        closed_at: None,
    }
}

pub fn new_available_line(vehicle: &VehicleRef, tariff: f64) -> NewPeriodLine {
    let charges: LineCharges = LineCharges::default();
    let financials: Financials =
        Financials::derive(VehicleStatus::Available, 0.0, tariff, &charges, 0.0).unwrap();
    NewPeriodLine::from_parts(
        0,
        vehicle,
        None,
        VehicleStatus::Available,
        0.0,
        tariff,
        &charges,
        0.0,
        LineFlags::default(),
        &financials,
    )
}
