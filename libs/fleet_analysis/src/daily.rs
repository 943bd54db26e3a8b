//! Per-day operating windows of a single machine.
//!
//! A machine's working day runs from its first to its last reading on a UTC
//! calendar date. The windows feed the average start/end times and the total
//! operating hours of a machine.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use crate::grouping::sorted_by_timestamp;
use crate::models::Reading;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const SECONDS_PER_HOUR: u32 = 3_600;
const SECONDS_PER_MINUTE: u32 = 60;

/// First and last reading of one machine on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_ms: i64,
}

/// Usage summary derived from a machine's daily windows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeMetrics {
    pub average_start: Option<NaiveTime>,
    pub average_end: Option<NaiveTime>,
    /// Unrounded sum of all window durations, in hours
    pub total_hours: f64,
}

/// Buckets `readings` by UTC date, returning the windows ordered by date.
/// Readings whose timestamp has no UTC datetime are skipped.
pub fn daily_windows(readings: &[&Reading]) -> Vec<DailyWindow> {
    let mut days: BTreeMap<NaiveDate, (DateTime<Utc>, DateTime<Utc>)> =
        BTreeMap::new();

    for reading in sorted_by_timestamp(readings) {
        let Some(at) = reading.datetime() else {
            continue;
        };
        days.entry(at.date_naive())
            .and_modify(|(_, last)| *last = at)
            .or_insert((at, at));
    }

    days.into_iter()
        .map(|(date, (first, last))| DailyWindow {
            date,
            start: first.time(),
            end: last.time(),
            duration_ms: (last - first).num_milliseconds(),
        })
        .collect()
}

pub fn time_metrics(readings: &[&Reading]) -> TimeMetrics {
    let windows = daily_windows(readings);
    if windows.is_empty() {
        return TimeMetrics::default();
    }

    let starts: Vec<NaiveTime> = windows.iter().map(|w| w.start).collect();
    let ends: Vec<NaiveTime> = windows.iter().map(|w| w.end).collect();
    let total_ms: i64 = windows.iter().map(|w| w.duration_ms).sum();

    TimeMetrics {
        average_start: average_time(&starts),
        average_end: average_time(&ends),
        total_hours: total_ms as f64 / MILLIS_PER_HOUR,
    }
}

/// Linear mean of times-of-day, truncated to the minute.
///
/// Times are treated as plain seconds since midnight, so a schedule that
/// straddles midnight averages towards noon (23:50 and 00:10 give 12:00).
/// Returns `None` for an empty slice.
pub fn average_time(times: &[NaiveTime]) -> Option<NaiveTime> {
    if times.is_empty() {
        return None;
    }

    let total: u64 = times
        .iter()
        .map(|t| u64::from(t.num_seconds_from_midnight()))
        .sum();
    let mean = (total / times.len() as u64) as u32;

    NaiveTime::from_hms_opt(
        mean / SECONDS_PER_HOUR,
        (mean % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
        0,
    )
}
