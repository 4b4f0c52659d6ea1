// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure KPI aggregation over an ordered window of weekly periods.
//!
//! Everything here is total: sparse or empty windows produce zeroed
//! figures, never errors. Division guards return `0` for an empty fleet
//! or a week without rented vehicles, and the first period of a window
//! has a churn rate of `0` because it has no predecessor to compare
//! against.

use std::collections::HashMap;

use fleet_ledger_domain::{
    ClientRef, PeriodLine, PeriodWithLines, VehicleRef, VehicleStatus, round2,
};
use serde::Serialize;
use time::Date;

/// Days in a weekly billing cycle.
const DAYS_PER_WEEK: f64 = 7.0;

/// Maximum number of entries in a revenue ranking.
const RANKING_SIZE: usize = 10;

/// Revenue attributed to one vehicle over a period or window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRevenue {
    pub vehicle: VehicleRef,
    pub received: f64,
}

/// Revenue attributed to one client over a period or window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRevenue {
    pub client: ClientRef,
    pub received: f64,
}

/// KPI figures for one weekly period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodKpi {
    pub period_id: i64,
    pub start_date: Date,
    /// Sum of line tariffs: what a fully rented week would bill.
    pub potential: f64,
    pub forecast: f64,
    pub received: f64,
    /// Amount past due: negative balances, counted only once the
    /// period's billing window has elapsed.
    pub delinquency: f64,
    /// Rented-vehicle-days as a percentage of fleet capacity.
    pub occupancy: f64,
    pub revenue_per_rented_unit: f64,
    pub revenue_per_fleet_unit: f64,
    /// Share of the prior week's rented vehicles that were returned or
    /// re-rented to a different client this week, in percent.
    pub churn_rate: f64,
    pub top_vehicles: Vec<VehicleRevenue>,
    pub top_clients: Vec<ClientRevenue>,
}

/// Window-level KPI aggregate across an ordered period sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub periods: Vec<PeriodKpi>,
    pub mean_occupancy: f64,
    pub mean_churn_rate: f64,
    pub total_forecast: f64,
    pub total_received: f64,
    pub total_delinquency: f64,
    pub top_vehicles: Vec<VehicleRevenue>,
    pub top_clients: Vec<ClientRevenue>,
}

/// Computes the KPI snapshot for an ordered (ascending by start date)
/// window of periods.
///
/// `fleet_size` is the active fleet headcount the occupancy and
/// per-fleet-unit figures are normalized against; `today` decides which
/// periods have elapsed for delinquency purposes.
#[must_use]
pub fn aggregate(periods: &[PeriodWithLines], fleet_size: u32, today: Date) -> KpiSnapshot {
    let mut period_kpis: Vec<PeriodKpi> = Vec::with_capacity(periods.len());
    let mut prior_rentals: Option<HashMap<&VehicleRef, Option<ClientRef>>> = None;

    let mut window_vehicles: RevenueTally<VehicleRef> = RevenueTally::new();
    let mut window_clients: RevenueTally<ClientRef> = RevenueTally::new();

    for entry in periods {
        let rentals: HashMap<&VehicleRef, Option<ClientRef>> = rented_map(&entry.lines);
        let churn_rate: f64 = prior_rentals
            .as_ref()
            .map_or(0.0, |prior| churn(prior, &rentals));

        period_kpis.push(period_kpi(entry, fleet_size, today, churn_rate));

        for line in &entry.lines {
            window_vehicles.add(&line.vehicle, line.received);
            if let Some(client) = line.client {
                window_clients.add(&client, line.received);
            }
        }

        prior_rentals = Some(rentals);
    }

    let count: f64 = to_f64(period_kpis.len());
    let mean_occupancy: f64 = if period_kpis.is_empty() {
        0.0
    } else {
        round2(period_kpis.iter().map(|k| k.occupancy).sum::<f64>() / count)
    };
    let mean_churn_rate: f64 = if period_kpis.is_empty() {
        0.0
    } else {
        round2(period_kpis.iter().map(|k| k.churn_rate).sum::<f64>() / count)
    };

    KpiSnapshot {
        mean_occupancy,
        mean_churn_rate,
        total_forecast: round2(period_kpis.iter().map(|k| k.forecast).sum()),
        total_received: round2(period_kpis.iter().map(|k| k.received).sum()),
        total_delinquency: round2(period_kpis.iter().map(|k| k.delinquency).sum()),
        top_vehicles: window_vehicles.into_ranking(),
        top_clients: window_clients.into_ranking(),
        periods: period_kpis,
    }
}

fn period_kpi(entry: &PeriodWithLines, fleet_size: u32, today: Date, churn_rate: f64) -> PeriodKpi {
    let mut potential: f64 = 0.0;
    let mut forecast: f64 = 0.0;
    let mut received: f64 = 0.0;
    let mut past_due: f64 = 0.0;
    let mut rented_days: f64 = 0.0;

    let mut vehicles: RevenueTally<VehicleRef> = RevenueTally::new();
    let mut clients: RevenueTally<ClientRef> = RevenueTally::new();
    let mut rented_vehicles: Vec<&VehicleRef> = Vec::new();

    let elapsed: bool = entry.period.has_elapsed(today);

    for line in &entry.lines {
        potential += line.tariff;
        forecast += line.financials.forecast();
        received += line.received;
        if elapsed && line.financials.balance() < 0.0 {
            past_due -= line.financials.balance();
        }
        if line.status == VehicleStatus::Rented {
            rented_days += line.days_rented;
            if !rented_vehicles.contains(&&line.vehicle) {
                rented_vehicles.push(&line.vehicle);
            }
        }
        vehicles.add(&line.vehicle, line.received);
        if let Some(client) = line.client {
            clients.add(&client, line.received);
        }
    }

    let capacity: f64 = f64::from(fleet_size) * DAYS_PER_WEEK;
    let occupancy: f64 = if capacity > 0.0 {
        round2(rented_days / capacity * 100.0)
    } else {
        0.0
    };
    let revenue_per_rented_unit: f64 = if rented_vehicles.is_empty() {
        0.0
    } else {
        round2(forecast / to_f64(rented_vehicles.len()))
    };
    let revenue_per_fleet_unit: f64 = if fleet_size == 0 {
        0.0
    } else {
        round2(received / f64::from(fleet_size))
    };

    PeriodKpi {
        period_id: entry.period.id(),
        start_date: entry.period.start_date(),
        potential: round2(potential),
        forecast: round2(forecast),
        received: round2(received),
        delinquency: round2(past_due),
        occupancy,
        revenue_per_rented_unit,
        revenue_per_fleet_unit,
        churn_rate,
        top_vehicles: vehicles.into_ranking(),
        top_clients: clients.into_ranking(),
    }
}

/// The `vehicle -> client` attribution map of a period, restricted to
/// rented lines.
fn rented_map(lines: &[PeriodLine]) -> HashMap<&VehicleRef, Option<ClientRef>> {
    lines
        .iter()
        .filter(|line| line.status == VehicleStatus::Rented)
        .map(|line| (&line.vehicle, line.client))
        .collect()
}

/// Churn against the prior week: a prior rented vehicle counts as
/// churned when it is no longer rented or is rented to a different
/// client.
fn churn(
    prior: &HashMap<&VehicleRef, Option<ClientRef>>,
    current: &HashMap<&VehicleRef, Option<ClientRef>>,
) -> f64 {
    if prior.is_empty() {
        return 0.0;
    }
    let churned: usize = prior
        .iter()
        .filter(|(vehicle, client)| current.get(*vehicle) != Some(client))
        .count();
    round2(to_f64(churned) / to_f64(prior.len()) * 100.0)
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(count: usize) -> f64 {
    count as f64
}

/// Received-revenue accumulator that preserves first-seen order, so
/// ranking ties resolve to whichever key appeared first.
struct RevenueTally<K: Clone + PartialEq> {
    entries: Vec<(K, f64)>,
}

impl<K: Clone + PartialEq> RevenueTally<K> {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: &K, amount: f64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((key.clone(), amount)),
        }
    }

    /// Top entries by received revenue, descending. The sort is stable,
    /// so equal totals keep their insertion order.
    fn into_sorted(mut self) -> Vec<(K, f64)> {
        self.entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.entries.truncate(RANKING_SIZE);
        self.entries
    }
}

impl RevenueTally<VehicleRef> {
    fn into_ranking(self) -> Vec<VehicleRevenue> {
        self.into_sorted()
            .into_iter()
            .map(|(vehicle, received)| VehicleRevenue {
                vehicle,
                received: round2(received),
            })
            .collect()
    }
}

impl RevenueTally<ClientRef> {
    fn into_ranking(self) -> Vec<ClientRevenue> {
        self.into_sorted()
            .into_iter()
            .map(|(client, received)| ClientRevenue {
                client,
                received: round2(received),
            })
            .collect()
    }
}
