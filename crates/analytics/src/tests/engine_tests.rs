// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fleet_ledger_domain::{
    Financials, LineCharges, LineFlags, Vehicle, VehicleRef, VehicleStatus,
};
use fleet_ledger_persistence::{
    NewPeriod, NewPeriodLine, PersistenceError, SchemaCatalog, TenantRegistry, format_date,
};
use time::macros::date;
use time::{Date, Duration};

use crate::engine::{AnalyticsEngine, Window};
use crate::error::AnalyticsError;
use crate::tests::assert_close;

static ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A unique on-disk registry root per test, cleaned up on drop.
struct TestRoot(PathBuf);

impl TestRoot {
    fn new() -> Self {
        let id: u64 = ROOT_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir()
            .join(format!("fleet-ledger-analytics-{}-{id}", std::process::id()));
        Self(path)
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn engine(root: &TestRoot) -> (Arc<TenantRegistry>, AnalyticsEngine) {
    let registry: Arc<TenantRegistry> = Arc::new(TenantRegistry::new(root.0.clone()));
    let catalog: Arc<SchemaCatalog> = Arc::new(SchemaCatalog::new());
    (
        Arc::clone(&registry),
        AnalyticsEngine::new(registry, catalog),
    )
}

/// Seeds two rented weeks for `TENANT`: V1 stays with client 1, V2
/// moves from client 2 to a new client in week 2.
fn seed_history(registry: &TenantRegistry) {
    let store = registry.resolve(TENANT).unwrap();
    let mut store = store.lock().unwrap();

    for (plate, tariff) in [("AAA1A11", 700.0), ("BBB2B22", 490.0)] {
        store
            .upsert_vehicle(&Vehicle {
                plate: VehicleRef::new(plate),
                active: true,
                base_tariff: tariff,
            })
            .unwrap();
    }
    let client_a: i64 = store.insert_client("Nordic Couriers").unwrap();
    let client_b: i64 = store.insert_client("Harbor Freight").unwrap();
    let client_c: i64 = store.insert_client("City Movers").unwrap();

    let weeks = [
        (date!(2026 - 03 - 02), client_a, client_b),
        (date!(2026 - 03 - 09), client_a, client_c),
    ];
    for (start, first_client, second_client) in weeks {
        store
            .create_period(
                open_period(start),
                vec![
                    rented_row("AAA1A11", first_client, 700.0, 700.0),
                    rented_row("BBB2B22", second_client, 490.0, 0.0),
                ],
            )
            .unwrap();
    }
}

const TENANT: &str = "acme-rentals";

fn open_period(start_date: Date) -> NewPeriod {
    NewPeriod {
        start_date: format_date(start_date).unwrap(),
        end_date: format_date(start_date + Duration::days(6)).unwrap(),
        status: String::from("open"),
        closed_at: None,
    }
}

fn rented_row(plate: &str, client: i64, tariff: f64, received: f64) -> NewPeriodLine {
    let vehicle: VehicleRef = VehicleRef::new(plate);
    let charges: LineCharges = LineCharges::default();
    let financials: Financials =
        Financials::derive(VehicleStatus::Rented, 7.0, tariff, &charges, received).unwrap();
    NewPeriodLine::from_parts(
        0,
        &vehicle,
        Some(fleet_ledger_domain::ClientRef(client)),
        VehicleStatus::Rented,
        7.0,
        tariff,
        &charges,
        received,
        LineFlags::default(),
        &financials,
    )
}

#[test]
fn test_query_range_window_with_mirror_fleet_size() {
    let root: TestRoot = TestRoot::new();
    let (registry, engine) = engine(&root);
    seed_history(&registry);

    let snapshot = engine
        .query(
            TENANT,
            Window::Range {
                start: date!(2026 - 03 - 01),
                end: date!(2026 - 03 - 31),
            },
            date!(2026 - 03 - 20),
            None,
        )
        .unwrap();

    assert_eq!(snapshot.periods.len(), 2);
    // Two active vehicles, both rented all week: full occupancy.
    assert_close(snapshot.mean_occupancy, 100.0);
    // V2 changed client in week 2: 1 of 2 prior rentals churned.
    assert_close(snapshot.periods[1].churn_rate, 50.0);
    assert_close(snapshot.mean_churn_rate, 25.0);
    // Both weeks have elapsed and BBB2B22 is unpaid in both.
    assert_close(snapshot.total_delinquency, 980.0);
    assert_eq!(snapshot.top_vehicles[0].vehicle.as_str(), "AAA1A11");
}

#[test]
fn test_query_last_n_window_selects_most_recent_periods() {
    let root: TestRoot = TestRoot::new();
    let (registry, engine) = engine(&root);
    seed_history(&registry);

    let snapshot = engine
        .query(TENANT, Window::LastN(1), date!(2026 - 03 - 20), None)
        .unwrap();

    assert_eq!(snapshot.periods.len(), 1);
    assert_eq!(snapshot.periods[0].start_date, date!(2026 - 03 - 09));
    // A single-period window has no churn baseline.
    assert_close(snapshot.periods[0].churn_rate, 0.0);
}

#[test]
fn test_query_fleet_size_override_changes_normalization() {
    let root: TestRoot = TestRoot::new();
    let (registry, engine) = engine(&root);
    seed_history(&registry);

    let snapshot = engine
        .query(TENANT, Window::LastN(2), date!(2026 - 03 - 20), Some(4))
        .unwrap();

    // 14 rented-days against 4 vehicles x 7 days.
    assert_close(snapshot.periods[0].occupancy, 50.0);
}

#[test]
fn test_query_rejects_inverted_range() {
    let root: TestRoot = TestRoot::new();
    let (_registry, engine) = engine(&root);

    let result = engine.query(
        TENANT,
        Window::Range {
            start: date!(2026 - 03 - 31),
            end: date!(2026 - 03 - 01),
        },
        date!(2026 - 03 - 20),
        None,
    );
    assert!(matches!(result, Err(AnalyticsError::InvalidWindow(_))));
}

#[test]
fn test_query_empty_history_yields_empty_snapshot() {
    let root: TestRoot = TestRoot::new();
    let (_registry, engine) = engine(&root);

    let snapshot = engine
        .query(TENANT, Window::LastN(5), date!(2026 - 03 - 20), None)
        .unwrap();
    assert!(snapshot.periods.is_empty());
    assert_close(snapshot.total_received, 0.0);
}

#[test]
fn test_query_rejects_invalid_tenant() {
    let root: TestRoot = TestRoot::new();
    let (_registry, engine) = engine(&root);

    let result = engine.query("", Window::LastN(1), date!(2026 - 03 - 20), None);
    assert!(matches!(
        result,
        Err(AnalyticsError::Persistence(
            PersistenceError::TenantNotFound(_)
        ))
    ));
}
