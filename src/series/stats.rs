//! Dataset-wide consumption statistics.

use serde::Serialize;

use super::interval::ConsumptionInterval;

/// Summary statistics of per-interval consumption (kWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Computes summary statistics, or `None` for an empty series.
pub fn calculate_statistics(series: &[ConsumptionInterval]) -> Option<Statistics> {
    if series.is_empty() {
        return None;
    }

    let mut values: Vec<f64> = series.iter().map(|i| i.consumption).collect();
    let count = values.len();
    let total: f64 = values.iter().sum();
    let mean = total / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    values.sort_unstable_by(f64::total_cmp);
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    Some(Statistics {
        count,
        total,
        mean,
        min: values[0],
        max: values[count - 1],
        median,
        std_dev: variance.sqrt(),
    })
}
