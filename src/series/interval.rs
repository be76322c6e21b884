//! Consumption readings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Duration assumed for an interval whose span cannot be derived.
pub const DEFAULT_INTERVAL_HOURS: f64 = 0.5;

/// Number of half-hour intervals in a day.
pub const HALF_HOURS_PER_DAY: f64 = 48.0;

/// One metered consumption reading.
///
/// A series is ordered ascending by `start`; intervals are contiguous but may
/// differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionInterval {
    /// Energy consumed during the interval (kWh, non-negative).
    pub consumption: f64,
    /// Interval start (local wall clock).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl ConsumptionInterval {
    pub fn new(consumption: f64, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            consumption,
            start,
            end,
        }
    }

    /// Interval length in hours, or [`DEFAULT_INTERVAL_HOURS`] for a non-positive span.
    pub fn duration_hours(&self) -> f64 {
        let seconds = (self.end - self.start).num_seconds();
        if seconds > 0 {
            seconds as f64 / 3600.0
        } else {
            DEFAULT_INTERVAL_HOURS
        }
    }

    /// Average power over the interval (kW).
    pub fn average_power_kw(&self) -> f64 {
        self.consumption / self.duration_hours()
    }
}

/// Sum of consumption over the series (kWh).
pub fn total_consumption(series: &[ConsumptionInterval]) -> f64 {
    series.iter().map(|i| i.consumption).sum()
}

/// Days covered by the series, from the summed interval durations.
pub fn dataset_days(series: &[ConsumptionInterval]) -> f64 {
    series
        .iter()
        .map(ConsumptionInterval::duration_hours)
        .sum::<f64>()
        / 24.0
}

/// Days covered by the series assuming half-hourly readings (`len / 48`).
pub fn half_hourly_days(series: &[ConsumptionInterval]) -> f64 {
    series.len() as f64 / HALF_HOURS_PER_DAY
}
