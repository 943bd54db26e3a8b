use crate::consumption::consumption;
use crate::daily::time_metrics;
use crate::efficiency::efficiency_metrics;
use crate::grouping::group_readings;
use crate::models::{AnalysisReport, Machine, MachineMetrics, Reading, round2};
use crate::peak::peak_consumption_days;

/// Outcome of [`run_analysis`]: the report plus reading bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub report: AnalysisReport,
    pub readings_accepted: usize,
    pub readings_dropped: usize,
}

/// Runs the full analysis over one fleet snapshot.
///
/// Machines without any usable reading are left out of
/// [`AnalysisReport::machine_metrics`]; the remaining records keep the order
/// of `machines`.
pub fn analyze(machines: &[Machine], readings: &[Reading]) -> AnalysisReport {
    run_analysis(machines, readings).report
}

#[tracing::instrument(
    skip_all,
    fields(machines = machines.len(), readings = readings.len())
)]
pub fn run_analysis(machines: &[Machine], readings: &[Reading]) -> AnalysisRun {
    let groups = group_readings(machines, readings);

    let metrics: Vec<MachineMetrics> = machines
        .iter()
        .filter_map(|machine| {
            let own = groups.readings(&machine.id);
            (!own.is_empty()).then(|| machine_metrics(machine, own))
        })
        .collect();

    let report = AnalysisReport {
        efficiency_metrics: efficiency_metrics(&metrics),
        peak_consumption_days: peak_consumption_days(machines, &groups),
        machine_metrics: metrics,
    };

    tracing::debug!(
        accepted = groups.accepted(),
        dropped = groups.dropped(),
        reported = report.machine_metrics.len(),
        "Fleet analysis complete"
    );

    AnalysisRun {
        report,
        readings_accepted: groups.accepted(),
        readings_dropped: groups.dropped(),
    }
}

/// Usage and consumption of a single machine over `readings`.
pub fn machine_metrics(machine: &Machine, readings: &[&Reading]) -> MachineMetrics {
    let times = time_metrics(readings);

    MachineMetrics {
        machine_id: machine.id.clone(),
        average_start: times.average_start,
        average_end: times.average_end,
        total_hours: round2(times.total_hours),
        consumption: consumption(machine, readings),
        consumption_unit: machine.fuel_type.unit(),
    }
}
