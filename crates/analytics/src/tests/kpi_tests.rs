// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_ledger_domain::ClientRef;
use time::macros::date;

use crate::kpi::{KpiSnapshot, aggregate};
use crate::tests::{assert_close, available, rented, week};

#[test]
fn test_churn_counts_lost_and_reassigned_vehicles() {
    // Week 1: V1 rented to client 1, V2 to client 2.
    // Week 2: V1 stays with client 1, V2 moves to client 3.
    let weeks = vec![
        week(
            1,
            date!(2026 - 03 - 02),
            vec![
                rented("V1", Some(1), 7.0, 700.0, 700.0),
                rented("V2", Some(2), 7.0, 490.0, 490.0),
            ],
        ),
        week(
            2,
            date!(2026 - 03 - 09),
            vec![
                rented("V1", Some(1), 7.0, 700.0, 700.0),
                rented("V2", Some(3), 7.0, 490.0, 490.0),
            ],
        ),
    ];

    let snapshot: KpiSnapshot = aggregate(&weeks, 2, date!(2026 - 03 - 20));

    assert_close(snapshot.periods[0].churn_rate, 0.0);
    assert_close(snapshot.periods[1].churn_rate, 50.0);
    assert_close(snapshot.mean_churn_rate, 25.0);
}

#[test]
fn test_churn_counts_vehicles_no_longer_rented() {
    let weeks = vec![
        week(
            1,
            date!(2026 - 03 - 02),
            vec![
                rented("V1", Some(1), 7.0, 700.0, 700.0),
                rented("V2", Some(2), 7.0, 490.0, 490.0),
            ],
        ),
        week(2, date!(2026 - 03 - 09), vec![available("V1", 700.0), available("V2", 490.0)]),
    ];

    let snapshot = aggregate(&weeks, 2, date!(2026 - 03 - 20));
    assert_close(snapshot.periods[1].churn_rate, 100.0);
}

#[test]
fn test_occupancy_is_rented_days_over_fleet_capacity() {
    // 42 rented-vehicle-days against a fleet of 10: 42 / 70 = 60%.
    let lines = (0..6)
        .map(|i| rented(&format!("V{i}"), Some(i64::from(i)), 7.0, 700.0, 0.0))
        .collect();
    let weeks = vec![week(1, date!(2026 - 03 - 02), lines)];

    let snapshot = aggregate(&weeks, 10, date!(2026 - 03 - 20));
    assert_close(snapshot.periods[0].occupancy, 60.0);
    assert_close(snapshot.mean_occupancy, 60.0);
}

#[test]
fn test_delinquency_counts_only_elapsed_periods() {
    // Same unpaid rented line; only the period that has already ended
    // contributes to delinquency.
    let weeks = vec![
        week(
            1,
            date!(2026 - 03 - 02),
            vec![rented("V1", Some(1), 7.0, 700.0, 0.0)],
        ),
        week(
            2,
            date!(2026 - 03 - 09),
            vec![rented("V1", Some(1), 7.0, 700.0, 0.0)],
        ),
    ];

    // 2026-03-09: week 1 ended 2026-03-08, week 2 is still running.
    let snapshot = aggregate(&weeks, 1, date!(2026 - 03 - 09));
    assert_close(snapshot.periods[0].delinquency, 700.0);
    assert_close(snapshot.periods[1].delinquency, 0.0);
    assert_close(snapshot.total_delinquency, 700.0);
}

#[test]
fn test_overpaid_lines_never_count_as_delinquent() {
    let weeks = vec![week(
        1,
        date!(2026 - 03 - 02),
        vec![rented("V1", Some(1), 7.0, 700.0, 900.0)],
    )];

    let snapshot = aggregate(&weeks, 1, date!(2026 - 03 - 20));
    assert_close(snapshot.periods[0].delinquency, 0.0);
}

#[test]
fn test_revenue_per_unit_figures() {
    let weeks = vec![week(
        1,
        date!(2026 - 03 - 02),
        vec![
            rented("V1", Some(1), 7.0, 700.0, 700.0),
            rented("V2", Some(2), 7.0, 490.0, 350.0),
            available("V3", 560.0),
        ],
    )];

    let snapshot = aggregate(&weeks, 3, date!(2026 - 03 - 20));
    let kpi = &snapshot.periods[0];
    assert_close(kpi.potential, 1750.0);
    assert_close(kpi.forecast, 1190.0);
    assert_close(kpi.received, 1050.0);
    // Forecast over the two distinct rented vehicles.
    assert_close(kpi.revenue_per_rented_unit, 595.0);
    // Received over the whole fleet.
    assert_close(kpi.revenue_per_fleet_unit, 350.0);
}

#[test]
fn test_sparse_data_yields_zeros_not_errors() {
    let empty: KpiSnapshot = aggregate(&[], 0, date!(2026 - 03 - 20));
    assert!(empty.periods.is_empty());
    assert_close(empty.mean_occupancy, 0.0);
    assert_close(empty.mean_churn_rate, 0.0);
    assert_close(empty.total_forecast, 0.0);
    assert!(empty.top_vehicles.is_empty());
    assert!(empty.top_clients.is_empty());

    // Zero active vehicles: occupancy defined as 0, no division error.
    let weeks = vec![week(1, date!(2026 - 03 - 02), vec![])];
    let snapshot = aggregate(&weeks, 0, date!(2026 - 03 - 20));
    assert_close(snapshot.periods[0].occupancy, 0.0);
    assert_close(snapshot.periods[0].revenue_per_rented_unit, 0.0);
    assert_close(snapshot.periods[0].revenue_per_fleet_unit, 0.0);
    assert_close(snapshot.periods[0].churn_rate, 0.0);
}

#[test]
fn test_rankings_order_by_received_with_first_seen_ties() {
    let weeks = vec![week(
        1,
        date!(2026 - 03 - 02),
        vec![
            rented("V1", Some(1), 7.0, 700.0, 100.0),
            rented("V2", Some(2), 7.0, 700.0, 200.0),
            rented("V3", Some(3), 7.0, 700.0, 100.0),
        ],
    )];

    let snapshot = aggregate(&weeks, 3, date!(2026 - 03 - 20));
    let ranking = &snapshot.periods[0].top_vehicles;
    assert_eq!(ranking[0].vehicle.as_str(), "V2");
    // V1 and V3 tie at 100; V1 appeared first.
    assert_eq!(ranking[1].vehicle.as_str(), "V1");
    assert_eq!(ranking[2].vehicle.as_str(), "V3");

    assert_eq!(snapshot.periods[0].top_clients[0].client, ClientRef(2));
}

#[test]
fn test_rankings_are_capped_at_ten() {
    let lines = (0..12)
        .map(|i| rented(&format!("V{i:02}"), Some(i64::from(i)), 7.0, 700.0, f64::from(i)))
        .collect();
    let weeks = vec![week(1, date!(2026 - 03 - 02), lines)];

    let snapshot = aggregate(&weeks, 12, date!(2026 - 03 - 20));
    assert_eq!(snapshot.periods[0].top_vehicles.len(), 10);
    assert_eq!(snapshot.top_clients.len(), 10);
    assert_eq!(snapshot.top_vehicles[0].vehicle.as_str(), "V11");
}

#[test]
fn test_window_rankings_accumulate_across_periods() {
    let weeks = vec![
        week(
            1,
            date!(2026 - 03 - 02),
            vec![
                rented("V1", Some(1), 7.0, 700.0, 300.0),
                rented("V2", Some(2), 7.0, 700.0, 400.0),
            ],
        ),
        week(
            2,
            date!(2026 - 03 - 09),
            vec![
                rented("V1", Some(1), 7.0, 700.0, 300.0),
                rented("V2", Some(2), 7.0, 700.0, 100.0),
            ],
        ),
    ];

    let snapshot = aggregate(&weeks, 2, date!(2026 - 03 - 20));
    // V1: 600 across the window; V2: 500.
    assert_eq!(snapshot.top_vehicles[0].vehicle.as_str(), "V1");
    assert_close(snapshot.top_vehicles[0].received, 600.0);
    assert_close(snapshot.total_received, 1100.0);
    assert_close(snapshot.total_forecast, 2800.0);
}

#[test]
fn test_snapshot_serializes_for_reporting() {
    let weeks = vec![week(
        1,
        date!(2026 - 03 - 02),
        vec![rented("V1", Some(1), 7.0, 700.0, 700.0)],
    )];
    let snapshot = aggregate(&weeks, 1, date!(2026 - 03 - 20));

    let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["periods"][0]["occupancy"], 100.0);
    assert_eq!(json["top_vehicles"][0]["vehicle"], "V1");
}
