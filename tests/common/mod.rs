//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use tariff_sim::config::ProfileConfig;
use tariff_sim::runner::synthetic_series;
use tariff_sim::series::ConsumptionInterval;
use tariff_sim::tariff::{RatePeriod, Tariff};

/// Midnight on the given date.
pub fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// `days` of half-hourly readings of `kwh` each, starting at `start`.
pub fn flat_half_hours(start: NaiveDateTime, days: i64, kwh: f64) -> Vec<ConsumptionInterval> {
    (0..days * 48)
        .map(|k| {
            let s = start + TimeDelta::minutes(30 * k);
            ConsumptionInterval::new(kwh, s, s + TimeDelta::minutes(30))
        })
        .collect()
}

/// Seeded synthetic consumption (2024-01-01 onwards).
pub fn synthetic(days: usize, seed: u64) -> Vec<ConsumptionInterval> {
    synthetic_series(&ProfileConfig {
        days,
        seed,
        ..ProfileConfig::default()
    })
}

/// Cheap 23:30-05:30 at 0.07, standard 05:30-23:30 at 0.30.
pub fn two_rate_tariff() -> Tariff {
    Tariff::new(
        "two_rate",
        "Two rate",
        vec![
            RatePeriod::new("cheap", "Cheap", "23:30", "05:30", 0.07),
            RatePeriod::new("standard", "Standard", "05:30", "23:30", 0.30),
        ],
    )
    .unwrap_or_else(|e| panic!("{e}"))
}
