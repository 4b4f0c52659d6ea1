// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod engine_tests;
mod kpi_tests;

use fleet_ledger_domain::{
    ClientRef, Financials, LineCharges, LineFlags, Period, PeriodLine, PeriodStatus,
    PeriodWithLines, VehicleRef, VehicleStatus,
};
use time::Date;

pub fn week(id: i64, start: Date, lines: Vec<PeriodLine>) -> PeriodWithLines {
    PeriodWithLines {
        period: Period::new(id, start, PeriodStatus::Open, None).unwrap(),
        lines,
    }
}

pub fn rented(
    plate: &str,
    client: Option<i64>,
    days: f64,
    tariff: f64,
    received: f64,
) -> PeriodLine {
    line(plate, client, VehicleStatus::Rented, days, tariff, received)
}

pub fn available(plate: &str, tariff: f64) -> PeriodLine {
    line(plate, None, VehicleStatus::Available, 0.0, tariff, 0.0)
}

pub fn line(
    plate: &str,
    client: Option<i64>,
    status: VehicleStatus,
    days: f64,
    tariff: f64,
    received: f64,
) -> PeriodLine {
    let charges: LineCharges = LineCharges::default();
    let financials: Financials =
        Financials::derive(status, days, tariff, &charges, received).unwrap();
    PeriodLine {
        id: 0,
        period_id: 0,
        vehicle: VehicleRef::new(plate),
        client: client.map(ClientRef),
        status,
        days_rented: days,
        tariff,
        charges,
        received,
        flags: LineFlags::default(),
        financials,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
