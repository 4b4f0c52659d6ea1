// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fleet_ledger_domain::{ClientRef, Vehicle, VehicleRef};
use fleet_ledger_persistence::{SchemaCatalog, TenantRegistry};

use crate::fleet::MirrorFleet;
use crate::lifecycle::WeeklyLedger;

static ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A unique on-disk registry root per test, cleaned up on drop.
pub struct TestRoot(PathBuf);

impl TestRoot {
    pub fn new() -> Self {
        let id: u64 = ROOT_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir()
            .join(format!("fleet-ledger-lifecycle-{}-{id}", std::process::id()));
        Self(path)
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub struct Harness {
    pub registry: Arc<TenantRegistry>,
    pub ledger: WeeklyLedger<MirrorFleet>,
    _root: TestRoot,
}

pub fn harness() -> Harness {
    let root: TestRoot = TestRoot::new();
    let registry: Arc<TenantRegistry> = Arc::new(TenantRegistry::new(root.0.clone()));
    let catalog: Arc<SchemaCatalog> = Arc::new(SchemaCatalog::new());
    let fleet: MirrorFleet = MirrorFleet::new(Arc::clone(&registry));
    Harness {
        registry: Arc::clone(&registry),
        ledger: WeeklyLedger::new(registry, catalog, fleet),
        _root: root,
    }
}

pub fn seed_vehicle(
    registry: &TenantRegistry,
    tenant: &str,
    plate: &str,
    base_tariff: f64,
) -> VehicleRef {
    let vehicle: Vehicle = Vehicle {
        plate: VehicleRef::new(plate),
        active: true,
        base_tariff,
    };
    let store = registry.resolve(tenant).unwrap();
    store.lock().unwrap().upsert_vehicle(&vehicle).unwrap();
    vehicle.plate
}

pub fn seed_client(registry: &TenantRegistry, tenant: &str, name: &str) -> ClientRef {
    let store = registry.resolve(tenant).unwrap();
    let id: i64 = store.lock().unwrap().insert_client(name).unwrap();
    ClientRef(id)
}
