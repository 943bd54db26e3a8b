use crate::grouping::sorted_by_timestamp;
use crate::models::{Machine, Reading, round2};

/// A consecutive pair of level-bearing readings where the level fell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepletionEvent<'a> {
    /// Reading at which the lower level was observed
    pub reading: &'a Reading,
    /// Absolute consumption in the machine's unit
    pub amount: f64,
}

/// Walks `readings` in timestamp order and yields every drop in level.
///
/// Rising levels (refuel, recharge) only move the reference level. Readings
/// without the level field of the machine's fuel type are skipped and leave
/// the reference level untouched.
pub fn depletion_events<'a>(
    machine: &Machine,
    readings: &[&'a Reading],
) -> Vec<DepletionEvent<'a>> {
    let capacity = machine.capacity();
    let mut previous: Option<f64> = None;
    let mut events = Vec::new();

    for reading in sorted_by_timestamp(readings) {
        let Some(level) = machine.fuel_type.level(reading) else {
            continue;
        };
        if let Some(prev) = previous
            && level < prev
        {
            events.push(DepletionEvent {
                reading,
                amount: (prev - level) * capacity,
            });
        }
        previous = Some(level);
    }

    events
}

/// Total resource consumed by `machine`, rounded to two decimals.
pub fn consumption(machine: &Machine, readings: &[&Reading]) -> f64 {
    let total: f64 = depletion_events(machine, readings)
        .iter()
        .map(|event| event.amount)
        .sum();
    round2(total)
}
