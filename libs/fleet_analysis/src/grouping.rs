use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Machine, Reading};

/// Readings partitioned by the machine that produced them.
#[derive(Debug, Default)]
pub struct ReadingGroups<'a> {
    by_machine: HashMap<&'a str, Vec<&'a Reading>>,
    dropped: usize,
}

impl<'a> ReadingGroups<'a> {
    /// Readings of `machine_id` in input order; empty for unknown ids.
    pub fn readings(&self, machine_id: &str) -> &[&'a Reading] {
        self.by_machine
            .get(machine_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of readings excluded because their machine is unknown or their
    /// timestamp cannot be placed on the UTC calendar.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn accepted(&self) -> usize {
        self.by_machine.values().map(Vec::len).sum()
    }
}

/// Partitions `readings` by machine id, discarding readings whose machine is
/// not part of `machines`. Ordering within a group is not meaningful.
pub fn group_readings<'a>(
    machines: &'a [Machine],
    readings: &'a [Reading],
) -> ReadingGroups<'a> {
    let mut by_machine: HashMap<&'a str, Vec<&'a Reading>> = HashMap::new();
    for machine in machines {
        by_machine.entry(machine.id.as_str()).or_default();
    }

    let mut dropped = 0;
    for reading in readings {
        match by_machine.get_mut(reading.machine_id.as_str()) {
            Some(group) if reading.datetime().is_some() => group.push(reading),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(
            dropped,
            "Discarded readings of unknown machines or with invalid timestamps"
        );
    }

    ReadingGroups {
        by_machine,
        dropped,
    }
}

/// Copy of `readings` ordered by timestamp. Readings sharing a timestamp are
/// ordered by descending level, so the result never depends on input order.
pub(crate) fn sorted_by_timestamp<'a>(
    readings: &[&'a Reading],
) -> Vec<&'a Reading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| descending_level(a.fuel_level, b.fuel_level))
            .then_with(|| descending_level(a.battery_soc, b.battery_soc))
    });
    sorted
}

fn descending_level(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        // Missing levels last
        (a, b) => b.is_some().cmp(&a.is_some()),
    }
}
