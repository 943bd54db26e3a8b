use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::consumption::depletion_events;
use crate::grouping::ReadingGroups;
use crate::models::{FuelType, Machine, PeakConsumptionDays};

/// Fleet consumption per UTC date, split into the electric class and the
/// diesel class that also takes every other fuel type.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct DailyTotals {
    pub(crate) diesel: BTreeMap<NaiveDate, f64>,
    pub(crate) electric: BTreeMap<NaiveDate, f64>,
}

/// Sums depletion per date. Each event is attributed to the date of the
/// reading that observed the lower level; zero-amount events are skipped.
pub(crate) fn daily_totals(
    machines: &[Machine],
    groups: &ReadingGroups<'_>,
) -> DailyTotals {
    let mut totals = DailyTotals::default();

    for machine in machines {
        let bucket = match machine.fuel_type {
            FuelType::Electric => &mut totals.electric,
            FuelType::Diesel | FuelType::Other(_) => &mut totals.diesel,
        };
        for event in depletion_events(machine, groups.readings(&machine.id)) {
            if event.amount <= 0.0 {
                continue;
            }
            let Some(at) = event.reading.datetime() else {
                continue;
            };
            *bucket.entry(at.date_naive()).or_default() += event.amount;
        }
    }

    totals
}

/// Finds the UTC date with the highest fleet consumption for the diesel and
/// electric classes. Ties resolve to the earliest date.
pub fn peak_consumption_days(
    machines: &[Machine],
    groups: &ReadingGroups<'_>,
) -> PeakConsumptionDays {
    let totals = daily_totals(machines, groups);

    PeakConsumptionDays {
        diesel: busiest_day(&totals.diesel),
        electric: busiest_day(&totals.electric),
    }
}

fn busiest_day(days: &BTreeMap<NaiveDate, f64>) -> Option<NaiveDate> {
    let mut best: Option<(NaiveDate, f64)> = None;
    for (&date, &total) in days {
        match best {
            Some((_, top)) if total <= top => {}
            _ => best = Some((date, total)),
        }
    }
    best.map(|(date, _)| date)
}
