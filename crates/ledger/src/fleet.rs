// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet registry collaborator interface.
//!
//! Vehicles are owned by an external system; the ledger only consumes
//! the active flag and base weekly tariff. [`MirrorFleet`] reads the
//! per-tenant fleet mirror the external registry pushes into each
//! tenant store; tests substitute in-memory fakes.

use std::sync::Arc;

use fleet_ledger_domain::{TenantId, Vehicle, VehicleRef};
use fleet_ledger_persistence::{PersistenceError, TenantRegistry};

use crate::error::LedgerError;

/// Read access to a tenant's active fleet.
pub trait FleetRegistry {
    /// Lists the tenant's currently active vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be read.
    fn list_active_vehicles(&self, tenant: &TenantId) -> Result<Vec<Vehicle>, LedgerError>;

    /// Retrieves one vehicle by plate, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be read.
    fn get_vehicle(
        &self,
        tenant: &TenantId,
        plate: &VehicleRef,
    ) -> Result<Option<Vehicle>, LedgerError>;
}

/// Fleet registry backed by the tenant store's `vehicles` mirror table.
#[derive(Debug, Clone)]
pub struct MirrorFleet {
    registry: Arc<TenantRegistry>,
}

impl MirrorFleet {
    #[must_use]
    pub const fn new(registry: Arc<TenantRegistry>) -> Self {
        Self { registry }
    }
}

impl FleetRegistry for MirrorFleet {
    fn list_active_vehicles(&self, tenant: &TenantId) -> Result<Vec<Vehicle>, LedgerError> {
        let store = self.registry.resolve(tenant.as_str())?;
        let mut store = store.lock().map_err(|_| {
            LedgerError::Persistence(PersistenceError::StorageUnavailable(
                "tenant store lock poisoned".to_string(),
            ))
        })?;
        Ok(store.list_active_vehicles()?)
    }

    fn get_vehicle(
        &self,
        tenant: &TenantId,
        plate: &VehicleRef,
    ) -> Result<Option<Vehicle>, LedgerError> {
        let store = self.registry.resolve(tenant.as_str())?;
        let mut store = store.lock().map_err(|_| {
            LedgerError::Persistence(PersistenceError::StorageUnavailable(
                "tenant store lock poisoned".to_string(),
            ))
        })?;
        Ok(store.get_vehicle(plate)?)
    }
}
