// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema catalog: binds a tenant store to the declared entity schemas.
//!
//! The static declarations below (together with the Diesel `table!`
//! macros in `diesel_schema`) are the schema the ledger expects. Binding
//! only *verifies* that the physical store matches the declarations and
//! caches the result per store handle; it never runs DDL. Structural
//! changes belong to the versioned migrations executed when the store is
//! provisioned (`sqlite::initialize_database`).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use diesel::prelude::*;
use diesel::sql_types::Text;
use tracing::debug;

use crate::TenantStore;
use crate::error::PersistenceError;

/// A declared relationship from one entity column to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Referencing column on the owning entity.
    pub column: &'static str,
    /// Referenced entity table.
    pub references: &'static str,
}

/// A declared entity schema.
#[derive(Debug, Clone, Copy)]
pub struct EntityDecl {
    /// Physical table name.
    pub table: &'static str,
    /// Relationships this entity owns.
    pub relations: &'static [Relation],
}

/// Entity schemas and relationship wiring the weekly ledger requires:
/// `Period 1—N PeriodLine`, `PeriodLine N—1 Vehicle` (by plate),
/// `PeriodLine N—1 Client` (nullable).
const LEDGER_ENTITIES: &[EntityDecl] = &[
    EntityDecl {
        table: "periods",
        relations: &[],
    },
    EntityDecl {
        table: "period_lines",
        relations: &[
            Relation {
                column: "period_id",
                references: "periods",
            },
            Relation {
                column: "vehicle_plate",
                references: "vehicles",
            },
            Relation {
                column: "client_id",
                references: "clients",
            },
        ],
    },
    EntityDecl {
        table: "vehicles",
        relations: &[],
    },
    EntityDecl {
        table: "clients",
        relations: &[],
    },
];

/// The bound set of entity schemas for one store handle.
#[derive(Debug)]
pub struct SchemaSet {
    handle_id: u64,
    entities: &'static [EntityDecl],
}

impl SchemaSet {
    #[must_use]
    pub const fn handle_id(&self) -> u64 {
        self.handle_id
    }

    #[must_use]
    pub const fn entities(&self) -> &'static [EntityDecl] {
        self.entities
    }

    #[must_use]
    pub fn entity(&self, table: &str) -> Option<&'static EntityDecl> {
        self.entities.iter().find(|e| e.table == table)
    }
}

/// Helper row struct for schema introspection.
///
/// This is a justified use of raw SQL as Diesel has no DSL for
/// `sqlite_master`.
#[derive(QueryableByName)]
struct TableRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// An explicit registry of schema bindings, keyed by store handle
/// identity.
///
/// Replaces the source system's ambient module-level weak map: the
/// catalog is constructed once, injected into callers, and owns a
/// concurrency-safe map with explicit eviction (`unbind`).
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    bindings: Mutex<HashMap<u64, Arc<SchemaSet>>>,
}

impl SchemaCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the declared entity schemas to a store, idempotently per
    /// store handle.
    ///
    /// The first bind for a handle verifies every declared table and
    /// relationship endpoint against the physical schema; subsequent
    /// binds for the same handle are cache lookups. The catalog lock is
    /// held across first-bind verification, so two concurrent first
    /// binds cannot race.
    ///
    /// # Errors
    ///
    /// Returns `SchemaBindError` if a declared entity is missing from
    /// the physical store or a relationship references an undeclared
    /// entity.
    pub fn bind(&self, store: &mut TenantStore) -> Result<Arc<SchemaSet>, PersistenceError> {
        let mut bindings = self
            .bindings
            .lock()
            .map_err(|_| PersistenceError::InitializationError("schema catalog lock poisoned".to_string()))?;

        if let Some(bound) = bindings.get(&store.handle_id()) {
            debug!(handle_id = store.handle_id(), "Schema bind cache hit");
            return Ok(Arc::clone(bound));
        }

        Self::verify(store)?;

        let bound: Arc<SchemaSet> = Arc::new(SchemaSet {
            handle_id: store.handle_id(),
            entities: LEDGER_ENTITIES,
        });
        bindings.insert(store.handle_id(), Arc::clone(&bound));
        debug!(
            handle_id = store.handle_id(),
            tenant = %store.tenant(),
            "Bound entity schemas"
        );
        Ok(bound)
    }

    /// Removes the cached binding for a store handle.
    ///
    /// Called when the handle is evicted from the tenant registry so the
    /// catalog does not accumulate entries for dead handles.
    pub fn unbind(&self, handle_id: u64) {
        if let Ok(mut bindings) = self.bindings.lock() {
            bindings.remove(&handle_id);
        }
    }

    /// Number of live bindings. Exposed for eviction bookkeeping.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bindings.lock().map_or(0, |bindings| bindings.len())
    }

    fn verify(store: &mut TenantStore) -> Result<(), PersistenceError> {
        let declared: HashSet<&'static str> =
            LEDGER_ENTITIES.iter().map(|e| e.table).collect();

        // NOTE: sqlite_master is raw SQL (justified - no Diesel DSL for
        // schema introspection)
        let rows: Vec<TableRow> =
            diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'table'")
                .load::<TableRow>(store.connection())?;
        let physical: HashSet<String> = rows.into_iter().map(|r| r.name).collect();

        for entity in LEDGER_ENTITIES {
            if !physical.contains(entity.table) {
                return Err(PersistenceError::SchemaBindError(format!(
                    "declared entity {:?} is missing from the physical schema",
                    entity.table
                )));
            }
            for relation in entity.relations {
                if !declared.contains(relation.references) {
                    return Err(PersistenceError::SchemaBindError(format!(
                        "{}.{} references undeclared entity {:?}",
                        entity.table, relation.column, relation.references
                    )));
                }
                if !physical.contains(relation.references) {
                    return Err(PersistenceError::SchemaBindError(format!(
                        "{}.{} references entity {:?} missing from the physical schema",
                        entity.table, relation.column, relation.references
                    )));
                }
            }
        }
        Ok(())
    }
}
