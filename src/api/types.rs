//! API response and query types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::report::SimulatedStep;
use crate::series::ConsumptionInterval;

/// One interval of the timeline: the reading plus the simulated state, if any.
#[derive(Debug, Serialize)]
pub struct TimelineRecord {
    /// Interval index in the series.
    pub index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Consumption (kWh).
    pub consumption: f64,
    /// Simulated state; `null` when no battery or solar is configured.
    pub simulated: Option<SimulatedStep>,
}

impl TimelineRecord {
    pub fn new(
        index: usize,
        interval: &ConsumptionInterval,
        simulated: Option<SimulatedStep>,
    ) -> Self {
        Self {
            index,
            start: interval.start,
            end: interval.end,
            consumption: interval.consumption,
            simulated,
        }
    }
}

/// Optional index range for the timeline endpoint.
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// First interval index (inclusive).
    pub from: Option<usize>,
    /// Last interval index (inclusive).
    pub to: Option<usize>,
}

/// Calendar frame for the aggregate endpoint; defaults to `day`.
#[derive(Debug, Deserialize)]
pub struct AggregateQuery {
    pub frame: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
