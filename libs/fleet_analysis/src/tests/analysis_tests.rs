use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::json;

use crate::grouping::group_readings;
use crate::models::{ConsumptionUnit, FuelType, Machine, Reading};
use crate::peak::daily_totals;
use crate::{AnalysisReport, analyze};

// 2023-01-01T05:00:00Z
const T: i64 = 1_672_549_200_000;
const HOUR: i64 = 3_600_000;
const DAY: i64 = 24 * HOUR;

fn electric(id: &str, battery: f64) -> Machine {
    Machine {
        id: id.to_string(),
        manufacturer: "TestCo".to_string(),
        machine_type: "excavator".to_string(),
        fuel_type: FuelType::Electric,
        battery_size: Some(battery),
        fuel_tank_size: None,
    }
}

fn diesel(id: &str, tank: f64) -> Machine {
    Machine {
        id: id.to_string(),
        manufacturer: "TestCo".to_string(),
        machine_type: "crane".to_string(),
        fuel_type: FuelType::Diesel,
        battery_size: None,
        fuel_tank_size: Some(tank),
    }
}

fn soc(machine_id: &str, timestamp: i64, level: f64) -> Reading {
    Reading {
        timestamp,
        machine_id: machine_id.to_string(),
        fuel_level: None,
        battery_soc: Some(level),
    }
}

fn fuel(machine_id: &str, timestamp: i64, level: f64) -> Reading {
    Reading {
        timestamp,
        machine_id: machine_id.to_string(),
        fuel_level: Some(level),
        battery_soc: None,
    }
}

fn mixed_fleet() -> (Vec<Machine>, Vec<Reading>) {
    let machines = vec![
        diesel("d1", 50.0),
        electric("e1", 100.0),
        diesel("d2", 120.0),
    ];
    let readings = vec![
        fuel("d1", T, 1.0),
        fuel("d1", T + 3 * HOUR, 0.5),
        fuel("d1", T + 4 * HOUR, 0.9),
        fuel("d1", T + 9 * HOUR, 0.3),
        fuel("d1", T + DAY + HOUR, 0.25),
        soc("e1", T + 2 * HOUR, 0.95),
        soc("e1", T + 6 * HOUR, 0.35),
        soc("e1", T + DAY + 2 * HOUR, 1.0),
        soc("e1", T + DAY + 5 * HOUR, 0.7),
        fuel("d2", T + DAY, 0.8),
        fuel("d2", T + DAY + 7 * HOUR, 0.55),
    ];
    (machines, readings)
}

#[test]
fn test_electric_single_machine_scenario() {
    let machines = vec![electric("m1", 100.0)];
    let readings = vec![soc("m1", T, 0.8), soc("m1", T + 2 * HOUR, 0.4)];

    let report = analyze(&machines, &readings);

    assert_eq!(report.machine_metrics.len(), 1);
    let metrics = &report.machine_metrics[0];
    assert_eq!(metrics.consumption, 40.0);
    assert_eq!(metrics.total_hours, 2.0);
    assert_eq!(metrics.consumption_unit, ConsumptionUnit::KilowattHours);
    assert_eq!(metrics.average_start, NaiveTime::from_hms_opt(5, 0, 0));
    assert_eq!(metrics.average_end, NaiveTime::from_hms_opt(7, 0, 0));
    assert_eq!(
        report.efficiency_metrics.most_efficient_id.as_deref(),
        Some("m1")
    );
    assert_eq!(report.efficiency_metrics.avg_consumption_per_hour, 20.0);
    assert_eq!(
        report.peak_consumption_days.electric,
        NaiveDate::from_ymd_opt(2023, 1, 1)
    );
}

#[test]
fn test_refuel_scenario() {
    let machines = vec![diesel("d1", 50.0)];
    let readings = vec![
        fuel("d1", T, 1.0),
        fuel("d1", T + HOUR, 0.5),
        fuel("d1", T + 2 * HOUR, 0.9),
        fuel("d1", T + 3 * HOUR, 0.3),
    ];

    let report = analyze(&machines, &readings);

    assert_eq!(report.machine_metrics[0].consumption, 55.0);
    assert_eq!(report.machine_metrics[0].consumption_unit, ConsumptionUnit::Liters);
}

#[test]
fn test_machine_without_readings_is_omitted() {
    let machines = vec![diesel("idle", 80.0), electric("busy", 100.0)];
    let readings = vec![soc("busy", T, 0.9), soc("busy", T + HOUR, 0.8)];

    let report = analyze(&machines, &readings);

    let ids: Vec<&str> = report
        .machine_metrics
        .iter()
        .map(|m| m.machine_id.as_str())
        .collect();
    assert_eq!(ids, vec!["busy"]);
    assert_eq!(report.peak_consumption_days.diesel, None);
}

#[test]
fn test_empty_fleet() {
    assert_eq!(analyze(&[], &[]), AnalysisReport::default());
}

#[test]
fn test_peak_day_sums_across_machines() {
    let machines = vec![diesel("d1", 100.0), diesel("d2", 100.0)];
    // d1 alone burns most on day one (35 L); with d2 added day two wins.
    let readings = vec![
        fuel("d1", T, 1.0),
        fuel("d1", T + HOUR, 0.65),
        fuel("d1", T + DAY, 0.65),
        fuel("d1", T + DAY + HOUR, 0.4),
        fuel("d2", T + DAY + 2 * HOUR, 0.9),
        fuel("d2", T + DAY + 3 * HOUR, 0.6),
    ];

    let report = analyze(&machines, &readings);

    assert_eq!(
        report.peak_consumption_days.diesel,
        NaiveDate::from_ymd_opt(2023, 1, 2)
    );

    let groups = group_readings(&machines, &readings);
    let totals = daily_totals(&machines, &groups);
    let day_one = totals.diesel[&NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()];
    let day_two = totals.diesel[&NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()];
    assert!((day_one - 35.0).abs() < 1e-9);
    assert!((day_two - 55.0).abs() < 1e-9);
    assert!(totals.electric.is_empty());
}

#[test]
fn test_shuffled_readings_give_identical_report() {
    let (machines, readings) = mixed_fleet();
    let expected = analyze(&machines, &readings);

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..10 {
        let mut shuffled = readings.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(analyze(&machines, &shuffled), expected);
    }
}

#[test]
fn test_duplicate_timestamps_are_order_independent() {
    let machines = vec![diesel("d1", 100.0), electric("e1", 100.0)];
    let readings = vec![
        fuel("d1", T, 1.0),
        fuel("d1", T + HOUR, 0.9),
        fuel("d1", T + HOUR, 0.1),
        fuel("d1", T + 2 * HOUR, 0.05),
        soc("e1", T, 0.8),
        soc("e1", T + HOUR, 0.2),
        soc("e1", T + HOUR, 0.6),
        soc("e1", T + 2 * HOUR, 0.1),
    ];
    let expected = analyze(&machines, &readings);

    assert_eq!(expected.machine_metrics[0].consumption, 95.0);
    assert_eq!(expected.machine_metrics[1].consumption, 70.0);

    let mut rng = StdRng::seed_from_u64(0xd00d);
    for _ in 0..20 {
        let mut shuffled = readings.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(analyze(&machines, &shuffled), expected);
    }
}

#[test]
fn test_negative_capacity_yields_zero_consumption() {
    let machines = vec![diesel("d1", -50.0)];
    let readings = vec![fuel("d1", T, 1.0), fuel("d1", T + HOUR, 0.4)];

    let report = analyze(&machines, &readings);

    assert_eq!(report.machine_metrics[0].consumption, 0.0);
    assert_eq!(report.peak_consumption_days.diesel, None);
}

#[test]
fn test_unknown_machine_readings_have_no_effect() {
    let (machines, readings) = mixed_fleet();
    let expected = analyze(&machines, &readings);

    let mut polluted = readings.clone();
    polluted.push(fuel("ghost", T + 5 * HOUR, 1.0));
    polluted.push(fuel("ghost", T + 6 * HOUR, 0.0));
    polluted.push(soc("e1-typo", T + DAY + 3 * HOUR, 0.0));

    assert_eq!(analyze(&machines, &polluted), expected);
}

#[test]
fn test_consumption_never_negative() {
    let machines = vec![diesel("d1", 60.0), electric("e1", 40.0)];
    let mut rng = StdRng::seed_from_u64(42);
    let mut levels: Vec<f64> = (0..50).map(|i| f64::from(i) / 50.0).collect();
    levels.shuffle(&mut rng);

    let readings: Vec<Reading> = levels
        .iter()
        .enumerate()
        .flat_map(|(i, &level)| {
            let at = T + i as i64 * HOUR;
            [fuel("d1", at, level), soc("e1", at, 1.0 - level)]
        })
        .collect();

    let report = analyze(&machines, &readings);

    assert!(report.machine_metrics.iter().all(|m| m.consumption >= 0.0));
}

#[test]
fn test_efficiency_tie_prefers_first_machine() {
    let machines = vec![electric("late", 100.0), electric("early", 100.0)];
    let readings = vec![
        soc("early", T, 0.9),
        soc("early", T + HOUR, 0.8),
        soc("late", T + 2 * HOUR, 0.6),
        soc("late", T + 3 * HOUR, 0.5),
    ];

    let report = analyze(&machines, &readings);

    assert_eq!(
        report.efficiency_metrics.most_efficient_id.as_deref(),
        Some("late")
    );
}

#[test]
fn test_report_json_contract() {
    let machines = vec![electric("test1", 100.0), diesel("unused", 10.0)];
    let readings = vec![
        soc("test1", T, 0.8),
        soc("test1", T + 2 * HOUR, 0.4),
    ];

    let value = serde_json::to_value(analyze(&machines, &readings)).unwrap();

    assert_eq!(
        value,
        json!({
            "machine_metrics": [{
                "machine_id": "test1",
                "average_start": "05:00:00",
                "average_end": "07:00:00",
                "total_hours": 2.0,
                "consumption": 40.0,
                "consumption_unit": "kWh"
            }],
            "peak_consumption_days": {
                "diesel": null,
                "electric": "2023-01-01"
            },
            "efficiency_metrics": {
                "most_efficient": "test1",
                "least_efficient": "test1",
                "avg_consumption_per_hour": 20.0
            }
        })
    );
}

#[test]
fn test_run_counts_dropped_readings() {
    let (machines, mut readings) = mixed_fleet();
    let total = readings.len();
    readings.push(fuel("ghost", T, 0.5));

    let run = crate::run_analysis(&machines, &readings);

    assert_eq!(run.readings_accepted, total);
    assert_eq!(run.readings_dropped, 1);
    assert_eq!(run.report, analyze(&machines, &readings));
}
