use crate::models::{EfficiencyMetrics, MachineMetrics, round2};

/// Ranks machines by consumption per operating hour.
///
/// Machines without operating hours are left out. Ties keep the machine that
/// comes first in `metrics`.
pub fn efficiency_metrics(metrics: &[MachineMetrics]) -> EfficiencyMetrics {
    let rates: Vec<(&str, f64)> = metrics
        .iter()
        .filter(|m| m.total_hours > 0.0)
        .map(|m| (m.machine_id.as_str(), m.consumption / m.total_hours))
        .collect();

    let Some(&first) = rates.first() else {
        return EfficiencyMetrics::default();
    };

    let mut most = first;
    let mut least = first;
    for &rate in &rates[1..] {
        if rate.1 > most.1 {
            most = rate;
        }
        if rate.1 < least.1 {
            least = rate;
        }
    }

    let mean = rates.iter().map(|(_, r)| r).sum::<f64>() / rates.len() as f64;

    EfficiencyMetrics {
        most_efficient_id: Some(most.0.to_string()),
        least_efficient_id: Some(least.0.to_string()),
        avg_consumption_per_hour: round2(mean),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConsumptionUnit;
    use pretty_assertions::assert_eq;

    fn metrics(id: &str, total_hours: f64, consumption: f64) -> MachineMetrics {
        MachineMetrics {
            machine_id: id.to_string(),
            average_start: None,
            average_end: None,
            total_hours,
            consumption,
            consumption_unit: ConsumptionUnit::Liters,
        }
    }

    #[test]
    fn test_extremes_and_average() {
        let input = vec![
            metrics("a", 2.0, 40.0),
            metrics("b", 4.0, 20.0),
            metrics("c", 1.0, 30.0),
        ];

        let result = efficiency_metrics(&input);

        assert_eq!(result.most_efficient_id.as_deref(), Some("c"));
        assert_eq!(result.least_efficient_id.as_deref(), Some("b"));
        assert_eq!(result.avg_consumption_per_hour, 18.33);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![
            metrics("first", 2.0, 10.0),
            metrics("second", 4.0, 20.0),
        ];

        let result = efficiency_metrics(&input);

        assert_eq!(result.most_efficient_id.as_deref(), Some("first"));
        assert_eq!(result.least_efficient_id.as_deref(), Some("first"));
        assert_eq!(result.avg_consumption_per_hour, 5.0);
    }

    #[test]
    fn test_machines_without_hours_are_skipped() {
        let input = vec![metrics("idle", 0.0, 12.0), metrics("busy", 3.0, 9.0)];

        let result = efficiency_metrics(&input);

        assert_eq!(result.most_efficient_id.as_deref(), Some("busy"));
        assert_eq!(result.least_efficient_id.as_deref(), Some("busy"));
        assert_eq!(result.avg_consumption_per_hour, 3.0);
    }

    #[test]
    fn test_no_qualifying_machines() {
        let result = efficiency_metrics(&[metrics("idle", 0.0, 0.0)]);

        assert_eq!(result, EfficiencyMetrics::default());
        assert_eq!(result.avg_consumption_per_hour, 0.0);
    }
}
