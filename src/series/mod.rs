//! Consumption series: readings, calendar aggregation, statistics and synthetic profiles.

/// Calendar bucketing by day, week, month and year.
pub mod aggregate;
pub mod interval;
pub mod stats;
/// Seeded synthetic consumption profiles.
pub mod synthetic;

pub use aggregate::{AggregatedBucket, TimeFrame, aggregate_by_time_frame};
pub use interval::{ConsumptionInterval, dataset_days, half_hourly_days, total_consumption};
pub use stats::{Statistics, calculate_statistics};
