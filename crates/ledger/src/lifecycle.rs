// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly ledger lifecycle operations.
//!
//! A period is `open` on creation and mutable until it is closed;
//! `closed` is terminal. Every financial mutation flows through
//! `Financials::derive`, so the four financial identities hold after
//! every operation.
//!
//! Operations resolve the tenant's store through the registry and bind
//! the schema catalog before touching rows. Fleet reads happen before
//! the store lock is taken, so a store-backed fleet registry cannot
//! deadlock against the operation's own handle.

use std::collections::HashSet;
use std::sync::Arc;

use fleet_ledger_domain::{
    ClientRef, Financials, LineCharges, LineFlags, Period, PeriodLine, PeriodWithLines,
    TenantId, Vehicle, VehicleRef, VehicleStatus,
};
use fleet_ledger_persistence::{
    NewPeriod, NewPeriodLine, PersistenceError, SchemaCatalog, SharedStore, TenantRegistry,
    TenantStore, format_date, format_timestamp,
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use tracing::info;

use crate::error::LedgerError;
use crate::fleet::FleetRegistry;

/// Days added to a period's start date to reach its end date.
const PERIOD_SPAN_DAYS: i64 = 6;

/// A patch against one period line.
///
/// Derived fields (`daily_rate`, `base_revenue`, `forecast`, `balance`)
/// are deliberately absent: they are recomputed by the calculator after
/// the patch is applied and cannot be set by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineEdit {
    pub line_id: i64,
    pub status: Option<VehicleStatus>,
    /// `Some(None)` clears the client attribution.
    pub client: Option<Option<ClientRef>>,
    pub days_rented: Option<f64>,
    pub tariff: Option<f64>,
    pub premium: Option<f64>,
    pub protection: Option<f64>,
    pub agreement_fee: Option<f64>,
    pub invoice_fee: Option<f64>,
    pub discount: Option<f64>,
    pub received: Option<f64>,
    pub signed: Option<bool>,
    pub invoiced: Option<bool>,
    pub reconciled: Option<bool>,
}

/// The weekly ledger service.
///
/// Owns the tenant registry, the schema catalog and the fleet registry
/// collaborator; all lifecycle operations go through here.
pub struct WeeklyLedger<F: FleetRegistry> {
    registry: Arc<TenantRegistry>,
    catalog: Arc<SchemaCatalog>,
    fleet: F,
}

impl<F: FleetRegistry> WeeklyLedger<F> {
    #[must_use]
    pub const fn new(registry: Arc<TenantRegistry>, catalog: Arc<SchemaCatalog>, fleet: F) -> Self {
        Self {
            registry,
            catalog,
            fleet,
        }
    }

    /// Creates the weekly period starting on `start_date` (or `today`
    /// when omitted), carrying commercial state forward from the most
    /// recent prior period, or seeding from the active fleet when the
    /// tenant has no history. The period and all of its lines are
    /// persisted as one atomic unit.
    ///
    /// # Errors
    ///
    /// * `DuplicatePeriod` - a period with this start date exists.
    /// * Infrastructure errors from tenant resolution or binding.
    pub fn create(
        &self,
        tenant: &str,
        start_date: Option<Date>,
        today: Date,
    ) -> Result<PeriodWithLines, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let active_fleet: Vec<Vehicle> = self.fleet.list_active_vehicles(&tenant_id)?;

        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;

        let start: Date = start_date.unwrap_or(today);
        if store.get_period_by_start(start)?.is_some() {
            return Err(PersistenceError::DuplicatePeriod {
                start_date: format_date(start)?,
            }
            .into());
        }

        let prior: Option<Period> = store.latest_period_before(start)?;
        let lines: Vec<NewPeriodLine> = match prior {
            Some(ref prior_period) => {
                let prior_lines: Vec<PeriodLine> = store.list_lines(prior_period.id())?;
                prior_lines
                    .iter()
                    .map(carry_forward_line)
                    .collect::<Result<Vec<NewPeriodLine>, LedgerError>>()?
            }
            None => active_fleet
                .iter()
                .map(seed_line)
                .collect::<Result<Vec<NewPeriodLine>, LedgerError>>()?,
        };

        let end: Date = start
            .checked_add(Duration::days(PERIOD_SPAN_DAYS))
            .ok_or_else(|| {
                LedgerError::Domain(fleet_ledger_domain::DomainError::DateArithmeticOverflow {
                    operation: format!("{start} + {PERIOD_SPAN_DAYS} days"),
                })
            })?;
        let period: NewPeriod = NewPeriod {
            start_date: format_date(start)?,
            end_date: format_date(end)?,
            status: String::from("open"),
            closed_at: None,
        };

        let carried: bool = prior.is_some();
        let period_id: i64 = store.create_period(period, lines)?;
        info!(tenant = %tenant_id, period_id, carried, "Opened weekly period");
        fetch(&mut store, period_id)
    }

    /// Applies line edits to an open period, recomputing every derived
    /// financial field, and optionally closes the period afterwards.
    ///
    /// # Errors
    ///
    /// * `PeriodClosed` - the period is already closed.
    /// * `LineNotFound` - an edit references a line outside the period.
    pub fn update(
        &self,
        tenant: &str,
        period_id: i64,
        edits: &[LineEdit],
        close_after: bool,
        now: OffsetDateTime,
    ) -> Result<PeriodWithLines, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;

        let period: Period = store.get_period(period_id)?;
        if period.is_closed() {
            return Err(PersistenceError::PeriodClosed(period_id).into());
        }

        for edit in edits {
            let mut line: PeriodLine = store.get_line(edit.line_id)?;
            if line.period_id != period_id {
                return Err(PersistenceError::LineNotFound(edit.line_id).into());
            }
            apply_edit(&mut line, edit)?;
            store.update_line(&line)?;
        }

        if close_after {
            store.close_period(period_id, &format_timestamp(now)?)?;
        }

        fetch(&mut store, period_id)
    }

    /// Closes an open period, stamping the close timestamp. `closed` is
    /// terminal; there is no reopen transition.
    ///
    /// # Errors
    ///
    /// Returns `PeriodClosed` if the period is already closed.
    pub fn close(
        &self,
        tenant: &str,
        period_id: i64,
        now: OffsetDateTime,
    ) -> Result<Period, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;

        let period: Period = store.get_period(period_id)?;
        if period.is_closed() {
            return Err(PersistenceError::PeriodClosed(period_id).into());
        }

        store.close_period(period_id, &format_timestamp(now)?)?;
        Ok(store.get_period(period_id)?)
    }

    /// Reconciles an open period's lines against the current active
    /// fleet. Missing active vehicles gain an `available` line; lines
    /// still `available` get their tariff refreshed from the vehicle;
    /// `rented` lines are never overwritten; lines for deactivated
    /// vehicles stay as they are. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `PeriodClosed` if the period is closed.
    pub fn sync(&self, tenant: &str, period_id: i64) -> Result<PeriodWithLines, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let active_fleet: Vec<Vehicle> = self.fleet.list_active_vehicles(&tenant_id)?;

        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;

        let period: Period = store.get_period(period_id)?;
        if period.is_closed() {
            return Err(PersistenceError::PeriodClosed(period_id).into());
        }

        let existing: Vec<PeriodLine> = store.list_lines(period_id)?;
        let represented: HashSet<&str> =
            existing.iter().map(|line| line.vehicle.as_str()).collect();

        let mut added: usize = 0;
        for vehicle in &active_fleet {
            if !represented.contains(vehicle.plate.as_str()) {
                let mut line: NewPeriodLine = seed_line(vehicle)?;
                line.period_id = period_id;
                store.insert_line(&line)?;
                added += 1;
            }
        }

        let mut refreshed: usize = 0;
        for line in existing {
            if line.status != VehicleStatus::Available {
                continue;
            }
            let Some(vehicle) = active_fleet
                .iter()
                .find(|v| v.plate == line.vehicle)
            else {
                // Vehicle left the active fleet mid-period; deliberately
                // left as-is.
                continue;
            };
            let mut line: PeriodLine = line;
            line.tariff = vehicle.base_tariff;
            line.financials = Financials::derive(
                line.status,
                line.days_rented,
                line.tariff,
                &line.charges,
                line.received,
            )?;
            store.update_line(&line)?;
            refreshed += 1;
        }

        info!(
            tenant = %tenant_id,
            period_id,
            added,
            refreshed,
            "Synchronized period with fleet"
        );
        fetch(&mut store, period_id)
    }

    /// Retrieves a period with all of its lines.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if the period does not exist.
    pub fn get(&self, tenant: &str, period_id: i64) -> Result<PeriodWithLines, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;
        fetch(&mut store, period_id)
    }

    /// Lists the tenant's periods, ascending by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant cannot be resolved.
    pub fn list(&self, tenant: &str) -> Result<Vec<Period>, LedgerError> {
        let tenant_id: TenantId = parse_tenant(tenant)?;
        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = lock_store(&shared)?;
        self.catalog.bind(&mut store)?;
        Ok(store.list_periods()?)
    }

    /// Evicts the tenant's cached store handle and its schema binding.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound` for an invalid identifier.
    pub fn evict_tenant(&self, tenant: &str) -> Result<bool, LedgerError> {
        if self.registry.is_cached(tenant)? {
            let shared: SharedStore = self.registry.resolve(tenant)?;
            let handle_id: u64 = lock_store(&shared)?.handle_id();
            self.catalog.unbind(handle_id);
        }
        Ok(self.registry.evict(tenant)?)
    }
}

fn parse_tenant(tenant: &str) -> Result<TenantId, LedgerError> {
    TenantId::new(tenant)
        .map_err(|_| LedgerError::Persistence(PersistenceError::TenantNotFound(tenant.to_string())))
}

fn lock_store(
    shared: &SharedStore,
) -> Result<std::sync::MutexGuard<'_, TenantStore>, LedgerError> {
    shared.lock().map_err(|_| {
        LedgerError::Persistence(PersistenceError::StorageUnavailable(
            "tenant store lock poisoned".to_string(),
        ))
    })
}

fn fetch(store: &mut TenantStore, period_id: i64) -> Result<PeriodWithLines, LedgerError> {
    let period: Period = store.get_period(period_id)?;
    let lines: Vec<PeriodLine> = store.list_lines(period_id)?;
    Ok(PeriodWithLines { period, lines })
}

/// Builds a fresh `available` line for an active vehicle at its base
/// tariff.
fn seed_line(vehicle: &Vehicle) -> Result<NewPeriodLine, LedgerError> {
    build_line(
        &vehicle.plate,
        None,
        VehicleStatus::Available,
        0.0,
        vehicle.base_tariff,
        &LineCharges::default(),
        0.0,
        LineFlags::default(),
    )
}

/// Copies a prior line's commercial attributes into a new-week line:
/// the carried line starts unpaid, so `received` resets to zero and the
/// derived fields are recomputed.
fn carry_forward_line(prior: &PeriodLine) -> Result<NewPeriodLine, LedgerError> {
    build_line(
        &prior.vehicle,
        prior.client,
        prior.status,
        prior.days_rented,
        prior.tariff,
        &prior.charges,
        0.0,
        prior.flags,
    )
}

#[allow(clippy::too_many_arguments)]
fn build_line(
    vehicle: &VehicleRef,
    client: Option<ClientRef>,
    status: VehicleStatus,
    days_rented: f64,
    tariff: f64,
    charges: &LineCharges,
    received: f64,
    flags: LineFlags,
) -> Result<NewPeriodLine, LedgerError> {
    let financials: Financials = Financials::derive(status, days_rented, tariff, charges, received)?;
    Ok(NewPeriodLine::from_parts(
        0, vehicle, client, status, days_rented, tariff, charges, received, flags, &financials,
    ))
}

fn apply_edit(line: &mut PeriodLine, edit: &LineEdit) -> Result<(), LedgerError> {
    if let Some(status) = edit.status {
        line.status = status;
    }
    if let Some(client) = edit.client {
        line.client = client;
    }
    if let Some(days_rented) = edit.days_rented {
        line.days_rented = days_rented;
    }
    if let Some(tariff) = edit.tariff {
        line.tariff = tariff;
    }
    if let Some(premium) = edit.premium {
        line.charges.premium = premium;
    }
    if let Some(protection) = edit.protection {
        line.charges.protection = protection;
    }
    if let Some(agreement_fee) = edit.agreement_fee {
        line.charges.agreement_fee = agreement_fee;
    }
    if let Some(invoice_fee) = edit.invoice_fee {
        line.charges.invoice_fee = invoice_fee;
    }
    if let Some(discount) = edit.discount {
        line.charges.discount = discount;
    }
    if let Some(received) = edit.received {
        line.received = received;
    }
    if let Some(signed) = edit.signed {
        line.flags.signed = signed;
    }
    if let Some(invoiced) = edit.invoiced {
        line.flags.invoiced = invoiced;
    }
    if let Some(reconciled) = edit.reconciled {
        line.flags.reconciled = reconciled;
    }

    line.financials = Financials::derive(
        line.status,
        line.days_rented,
        line.tariff,
        &line.charges,
        line.received,
    )?;
    Ok(())
}
