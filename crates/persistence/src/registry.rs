// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tenant registry: resolves a tenant identifier to its isolated store.
//!
//! Each tenant owns one physical SQLite database file under the registry
//! root. Handles are created lazily on first resolve, cached for the
//! registry's lifetime, and shared as `Arc<Mutex<TenantStore>>` so
//! operations against the same store are serialized.
//!
//! First-time resolution is guarded per tenant: the outer map lock is
//! held only to fetch or insert the tenant's slot, and initialization
//! runs under the slot's own lock. Two concurrent first resolves for the
//! same tenant therefore cannot create two stores or race on storage
//! initialization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fleet_ledger_domain::TenantId;
use tracing::{debug, info};

use crate::TenantStore;
use crate::error::PersistenceError;

/// File name of a tenant's ledger database inside its directory.
const LEDGER_DB_FILE: &str = "ledger.db";

/// A cached, shareable handle to one tenant's store.
pub type SharedStore = Arc<Mutex<TenantStore>>;

/// Per-tenant slot. The slot lock is the single-flight guard for store
/// initialization.
#[derive(Debug, Default)]
struct TenantSlot {
    handle: Mutex<Option<SharedStore>>,
}

/// Registry of per-tenant storage handles.
#[derive(Debug)]
pub struct TenantRegistry {
    root: PathBuf,
    slots: Mutex<HashMap<TenantId, Arc<TenantSlot>>>,
}

impl TenantRegistry {
    /// Creates a registry rooted at the given directory. Tenant stores
    /// live at `<root>/<tenant>/ledger.db`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a tenant identifier to its storage handle, creating the
    /// isolated store on first use.
    ///
    /// Idempotent: a cached handle is returned without touching storage.
    ///
    /// # Errors
    ///
    /// * `TenantNotFound` - the identifier is empty or invalid.
    /// * `StorageUnavailable` - the store directory or database cannot
    ///   be created or opened.
    pub fn resolve(&self, tenant: &str) -> Result<SharedStore, PersistenceError> {
        let tenant_id: TenantId = TenantId::new(tenant)
            .map_err(|_| PersistenceError::TenantNotFound(tenant.to_string()))?;

        let slot: Arc<TenantSlot> = {
            let mut slots = self.lock_slots()?;
            Arc::clone(slots.entry(tenant_id.clone()).or_default())
        };

        let mut handle = slot
            .handle
            .lock()
            .map_err(|_| Self::poisoned("tenant slot"))?;

        if let Some(existing) = handle.as_ref() {
            debug!(tenant = %tenant_id, "Tenant store cache hit");
            return Ok(Arc::clone(existing));
        }

        match self.open_store(&tenant_id) {
            Ok(store) => {
                let shared: SharedStore = Arc::new(Mutex::new(store));
                *handle = Some(Arc::clone(&shared));
                info!(tenant = %tenant_id, "Provisioned tenant store");
                Ok(shared)
            }
            Err(e) => {
                // Drop the empty slot so a later resolve can retry
                // initialization from scratch.
                drop(handle);
                if let Ok(mut slots) = self.lock_slots() {
                    if let Some(current) = slots.get(&tenant_id) {
                        if Arc::ptr_eq(current, &slot) {
                            slots.remove(&tenant_id);
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// Closes and removes the cached handle for a tenant.
    ///
    /// Used to bound memory and connection count. The store is closed
    /// once the last outstanding `SharedStore` clone drops; a subsequent
    /// `resolve` recreates the handle.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound` if the identifier is empty or invalid.
    pub fn evict(&self, tenant: &str) -> Result<bool, PersistenceError> {
        let tenant_id: TenantId = TenantId::new(tenant)
            .map_err(|_| PersistenceError::TenantNotFound(tenant.to_string()))?;
        let removed: bool = self.lock_slots()?.remove(&tenant_id).is_some();
        if removed {
            info!(tenant = %tenant_id, "Evicted tenant store");
        }
        Ok(removed)
    }

    /// Whether a handle for the tenant is currently cached.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound` if the identifier is empty or invalid.
    pub fn is_cached(&self, tenant: &str) -> Result<bool, PersistenceError> {
        let tenant_id: TenantId = TenantId::new(tenant)
            .map_err(|_| PersistenceError::TenantNotFound(tenant.to_string()))?;
        Ok(self.lock_slots()?.contains_key(&tenant_id))
    }

    /// The registry root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open_store(&self, tenant_id: &TenantId) -> Result<TenantStore, PersistenceError> {
        let tenant_dir: PathBuf = self.root.join(tenant_id.as_str());
        std::fs::create_dir_all(&tenant_dir).map_err(|e| {
            PersistenceError::StorageUnavailable(format!(
                "cannot create tenant directory {}: {e}",
                tenant_dir.display()
            ))
        })?;

        let db_path: PathBuf = tenant_dir.join(LEDGER_DB_FILE);
        let db_path_str: &str = db_path.to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        TenantStore::open_at_path(tenant_id.clone(), db_path_str)
    }

    fn lock_slots(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<TenantId, Arc<TenantSlot>>>, PersistenceError>
    {
        self.slots.lock().map_err(|_| Self::poisoned("tenant registry"))
    }

    fn poisoned(what: &str) -> PersistenceError {
        PersistenceError::StorageUnavailable(format!("{what} lock poisoned"))
    }
}
