// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet and client registry queries.
//!
//! Vehicles and clients are owned by external collaborators; the tenant
//! store keeps a per-tenant mirror that the ledger reads for seeding and
//! synchronization.

use diesel::prelude::*;
use fleet_ledger_domain::{Client, Vehicle, VehicleRef};

use crate::data_models::{ClientRow, VehicleRow};
use crate::diesel_schema::{clients, vehicles};
use crate::error::PersistenceError;

/// Lists all vehicles currently flagged active, in plate order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_vehicles(
    conn: &mut SqliteConnection,
) -> Result<Vec<Vehicle>, PersistenceError> {
    let rows: Vec<VehicleRow> = vehicles::table
        .filter(vehicles::active.ne(0))
        .order(vehicles::plate.asc())
        .load::<VehicleRow>(conn)?;
    Ok(rows.into_iter().map(VehicleRow::into_domain).collect())
}

/// Counts the active fleet.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_vehicles(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(vehicles::table
        .filter(vehicles::active.ne(0))
        .count()
        .get_result(conn)?)
}

/// Retrieves a vehicle by plate.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_vehicle(
    conn: &mut SqliteConnection,
    plate: &VehicleRef,
) -> Result<Option<Vehicle>, PersistenceError> {
    Ok(vehicles::table
        .filter(vehicles::plate.eq(plate.as_str()))
        .first::<VehicleRow>(conn)
        .optional()?
        .map(VehicleRow::into_domain))
}

/// Retrieves a client by ID, for display and attribution only.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<Client>, PersistenceError> {
    Ok(clients::table
        .filter(clients::id.eq(client_id))
        .first::<ClientRow>(conn)
        .optional()?
        .map(ClientRow::into_domain))
}
