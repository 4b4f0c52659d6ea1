// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Fleet Ledger back office.
//!
//! This crate provides per-tenant database persistence for weekly ledger
//! periods, their lines, and the per-tenant mirrors of the fleet and
//! client registries. It is built on Diesel over SQLite: each tenant
//! owns one isolated database file, provisioned lazily by the
//! [`TenantRegistry`] and bound to the declared entity schemas by the
//! [`SchemaCatalog`].
//!
//! ## Layering
//!
//! - `registry` — resolves a tenant identifier to a cached
//!   `Arc<Mutex<TenantStore>>` handle with per-tenant single-flight
//!   initialization.
//! - `catalog` — verifies and caches the schema binding per store
//!   handle; never mutates schema structure.
//! - `sqlite` — connection initialization, embedded migrations, PRAGMA
//!   configuration. Structural changes happen only here.
//! - `queries`/`mutations` — Diesel DSL operations, surfaced as methods
//!   on [`TenantStore`].
//!
//! ## Testing
//!
//! Standard tests run against unique shared in-memory SQLite databases,
//! named from an atomic counter so tests are isolated without
//! time-based collisions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use fleet_ledger_domain::{Client, Period, PeriodLine, TenantId, Vehicle, VehicleRef};
use time::Date;

mod catalog;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod registry;
mod sqlite;

#[cfg(test)]
mod tests;

pub use catalog::{EntityDecl, Relation, SchemaCatalog, SchemaSet};
pub use data_models::{NewPeriod, NewPeriodLine, format_date, format_timestamp, parse_date};
pub use error::PersistenceError;
pub use registry::{SharedStore, TenantRegistry};

/// Atomic counter for unique in-memory database names and store handle
/// identities.
///
/// Unique sequential IDs eliminate time-based collisions between test
/// stores and give every open store a process-unique handle identity
/// for schema-binding cache keys.
static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An open connection to one tenant's isolated store.
///
/// Never shared across tenants; once bound through the
/// [`SchemaCatalog`], a handle has exactly one associated schema set,
/// keyed by [`TenantStore::handle_id`].
pub struct TenantStore {
    conn: SqliteConnection,
    handle_id: u64,
    tenant: TenantId,
}

impl core::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TenantStore")
            .field("handle_id", &self.handle_id)
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}

impl TenantStore {
    /// Creates a store backed by a unique shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory(tenant: TenantId) -> Result<Self, PersistenceError> {
        let handle_id: u64 = HANDLE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_{}_{handle_id}?mode=memory&cache=shared", tenant.as_str());

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            handle_id,
            tenant,
        })
    }

    /// Opens (creating and migrating if needed) a file-based store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open_at_path(tenant: TenantId, path: &str) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = sqlite::initialize_database(path)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            handle_id: HANDLE_COUNTER.fetch_add(1, Ordering::SeqCst),
            tenant,
        })
    }

    /// Process-unique identity of this handle.
    #[must_use]
    pub const fn handle_id(&self) -> u64 {
        self.handle_id
    }

    /// The tenant this store belongs to.
    #[must_use]
    pub const fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub(crate) fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Periods
    // ========================================================================

    /// Inserts a period and all of its lines as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePeriod` if a period with the same start date
    /// exists, or a database error if any insert fails.
    pub fn create_period(
        &mut self,
        period: NewPeriod,
        lines: Vec<NewPeriodLine>,
    ) -> Result<i64, PersistenceError> {
        mutations::periods::insert_period_with_lines(&mut self.conn, period, lines)
    }

    /// Retrieves a period by ID.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if the period does not exist.
    pub fn get_period(&mut self, period_id: i64) -> Result<Period, PersistenceError> {
        queries::periods::get_period(&mut self.conn, period_id)
    }

    /// Retrieves the period starting on the given date, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_period_by_start(
        &mut self,
        start_date: Date,
    ) -> Result<Option<Period>, PersistenceError> {
        queries::periods::get_period_by_start(&mut self.conn, start_date)
    }

    /// Retrieves the most recent period starting before the given date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_period_before(
        &mut self,
        start_date: Date,
    ) -> Result<Option<Period>, PersistenceError> {
        queries::periods::latest_period_before(&mut self.conn, start_date)
    }

    /// Lists all periods, ascending by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_periods(&mut self) -> Result<Vec<Period>, PersistenceError> {
        queries::periods::list_periods(&mut self.conn)
    }

    /// Lists periods whose start date falls within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_periods_in_range(
        &mut self,
        start: Date,
        end: Date,
    ) -> Result<Vec<Period>, PersistenceError> {
        queries::periods::list_periods_in_range(&mut self.conn, start, end)
    }

    /// Lists the last `n` periods, ascending by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn last_n_periods(&mut self, n: i64) -> Result<Vec<Period>, PersistenceError> {
        queries::periods::last_n_periods(&mut self.conn, n)
    }

    /// Marks a period closed and stamps the close timestamp.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if the period does not exist.
    pub fn close_period(
        &mut self,
        period_id: i64,
        closed_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::periods::close_period(&mut self.conn, period_id, closed_at)
    }

    // ========================================================================
    // Period lines
    // ========================================================================

    /// Retrieves a line by ID.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` if the line does not exist.
    pub fn get_line(&mut self, line_id: i64) -> Result<PeriodLine, PersistenceError> {
        queries::lines::get_line(&mut self.conn, line_id)
    }

    /// Lists all lines of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_lines(&mut self, period_id: i64) -> Result<Vec<PeriodLine>, PersistenceError> {
        queries::lines::list_lines(&mut self.conn, period_id)
    }

    /// Finds the line for a vehicle within a period, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_line_for_vehicle(
        &mut self,
        period_id: i64,
        vehicle: &VehicleRef,
    ) -> Result<Option<PeriodLine>, PersistenceError> {
        queries::lines::find_line_for_vehicle(&mut self.conn, period_id, vehicle)
    }

    /// Inserts a single line into an existing period.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub fn insert_line(&mut self, line: &NewPeriodLine) -> Result<i64, PersistenceError> {
        mutations::lines::insert_line(&mut self.conn, line)
    }

    /// Overwrites a line from a recomputed domain line.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` if the line does not exist.
    pub fn update_line(&mut self, line: &PeriodLine) -> Result<(), PersistenceError> {
        mutations::lines::update_line(&mut self.conn, line)
    }

    // ========================================================================
    // Fleet and client mirrors
    // ========================================================================

    /// Lists all vehicles currently flagged active.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_vehicles(&mut self) -> Result<Vec<Vehicle>, PersistenceError> {
        queries::fleet::list_active_vehicles(&mut self.conn)
    }

    /// Counts the active fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_vehicles(&mut self) -> Result<i64, PersistenceError> {
        queries::fleet::count_active_vehicles(&mut self.conn)
    }

    /// Retrieves a vehicle by plate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_vehicle(
        &mut self,
        plate: &VehicleRef,
    ) -> Result<Option<Vehicle>, PersistenceError> {
        queries::fleet::get_vehicle(&mut self.conn, plate)
    }

    /// Retrieves a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_client(&mut self, client_id: i64) -> Result<Option<Client>, PersistenceError> {
        queries::fleet::get_client(&mut self.conn, client_id)
    }

    /// Inserts or replaces a vehicle in the fleet mirror.
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    pub fn upsert_vehicle(&mut self, vehicle: &Vehicle) -> Result<(), PersistenceError> {
        mutations::fleet::upsert_vehicle(&mut self.conn, vehicle)
    }

    /// Flips a vehicle's active flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the plate is unknown.
    pub fn set_vehicle_active(
        &mut self,
        plate: &VehicleRef,
        active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::fleet::set_vehicle_active(&mut self.conn, plate.as_str(), active)
    }

    /// Inserts a client and returns its generated ID.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub fn insert_client(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::fleet::insert_client(&mut self.conn, name)
    }
}
