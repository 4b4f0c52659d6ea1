// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet and client mirror mutations.
//!
//! Used when the external registries push vehicle or client changes into
//! a tenant's store, and by tests to provision fixture fleets.

use diesel::prelude::*;
use fleet_ledger_domain::Vehicle;

use crate::data_models::VehicleRow;
use crate::diesel_schema::{clients, vehicles};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts or replaces a vehicle in the tenant's fleet mirror.
///
/// # Errors
///
/// Returns a database error if the write fails.
pub fn upsert_vehicle(
    conn: &mut SqliteConnection,
    vehicle: &Vehicle,
) -> Result<(), PersistenceError> {
    let row: VehicleRow = VehicleRow {
        plate: vehicle.plate.as_str().to_string(),
        active: i32::from(vehicle.active),
        base_tariff: vehicle.base_tariff,
    };
    diesel::replace_into(vehicles::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Flips a vehicle's active flag.
///
/// # Errors
///
/// Returns `NotFound` if the plate is unknown.
pub fn set_vehicle_active(
    conn: &mut SqliteConnection,
    plate: &str,
    active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(vehicles::table.filter(vehicles::plate.eq(plate)))
        .set(vehicles::active.eq(i32::from(active)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("vehicle {plate}")));
    }
    Ok(())
}

/// Inserts a client and returns its generated ID.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub fn insert_client(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(clients::table)
        .values(clients::name.eq(name))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
