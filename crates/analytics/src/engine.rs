// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only KPI query engine over a tenant's period history.

use std::sync::Arc;

use fleet_ledger_domain::{Period, PeriodWithLines, TenantId};
use fleet_ledger_persistence::{
    PersistenceError, SchemaCatalog, SharedStore, TenantRegistry, TenantStore,
};
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::kpi::{KpiSnapshot, aggregate};

/// Period selection for a KPI query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    /// Periods whose start date falls within `[start, end]`.
    Range { start: Date, end: Date },
    /// The most recent `n` periods.
    LastN(usize),
}

/// Read-only analytics over a tenant's weekly ledger history.
pub struct AnalyticsEngine {
    registry: Arc<TenantRegistry>,
    catalog: Arc<SchemaCatalog>,
}

impl AnalyticsEngine {
    #[must_use]
    pub const fn new(registry: Arc<TenantRegistry>, catalog: Arc<SchemaCatalog>) -> Self {
        Self { registry, catalog }
    }

    /// Computes the KPI snapshot for the selected window of periods,
    /// ascending by start date.
    ///
    /// `fleet_size` overrides the fleet headcount used for occupancy
    /// and per-fleet-unit normalization; when `None`, the tenant's
    /// currently active fleet count is used.
    ///
    /// # Errors
    ///
    /// * `InvalidWindow` - the range end precedes its start.
    /// * `Persistence` - the tenant cannot be resolved or read.
    pub fn query(
        &self,
        tenant: &str,
        window: Window,
        today: Date,
        fleet_size: Option<u32>,
    ) -> Result<KpiSnapshot, AnalyticsError> {
        if let Window::Range { start, end } = window {
            if end < start {
                return Err(AnalyticsError::InvalidWindow(format!(
                    "range end {end} precedes start {start}"
                )));
            }
        }

        let tenant_id: TenantId = TenantId::new(tenant).map_err(|_| {
            AnalyticsError::Persistence(PersistenceError::TenantNotFound(tenant.to_string()))
        })?;
        let shared: SharedStore = self.registry.resolve(tenant_id.as_str())?;
        let mut store = shared.lock().map_err(|_| {
            AnalyticsError::Persistence(PersistenceError::StorageUnavailable(
                "tenant store lock poisoned".to_string(),
            ))
        })?;
        self.catalog.bind(&mut store)?;

        let periods: Vec<Period> = match window {
            Window::Range { start, end } => store.list_periods_in_range(start, end)?,
            Window::LastN(n) => store.last_n_periods(i64::try_from(n).unwrap_or(i64::MAX))?,
        };

        let mut window_data: Vec<PeriodWithLines> = Vec::with_capacity(periods.len());
        for period in periods {
            let lines = store.list_lines(period.id())?;
            window_data.push(PeriodWithLines { period, lines });
        }

        let fleet_size: u32 = match fleet_size {
            Some(size) => size,
            None => active_fleet_count(&mut store)?,
        };

        debug!(
            tenant = %tenant_id,
            periods = window_data.len(),
            fleet_size,
            "Computed KPI window"
        );
        Ok(aggregate(&window_data, fleet_size, today))
    }
}

fn active_fleet_count(store: &mut TenantStore) -> Result<u32, AnalyticsError> {
    let count: i64 = store.count_active_vehicles()?;
    Ok(u32::try_from(count).unwrap_or(0))
}
