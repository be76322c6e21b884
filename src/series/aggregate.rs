//! Calendar bucketing of consumption series.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::interval::ConsumptionInterval;

/// Calendar period used to bucket a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Day,
    /// Monday-anchored weeks.
    Week,
    Month,
    Year,
    /// The whole series as one bucket.
    All,
}

impl TimeFrame {
    pub const ALL_FRAMES: [Self; 5] = [Self::Day, Self::Week, Self::Month, Self::Year, Self::All];

    /// Calendar anchor of the bucket containing `date`.
    fn anchor(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day | Self::All => date,
            Self::Week => date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    fn label(self, anchor: NaiveDate) -> String {
        match self {
            Self::Day | Self::Week => anchor.format("%Y-%m-%d").to_string(),
            Self::Month => anchor.format("%Y-%m").to_string(),
            Self::Year => anchor.format("%Y").to_string(),
            Self::All => "all".to_string(),
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown time frame \"{other}\", expected day, week, month, year or all"
            )),
        }
    }
}

/// Summary of the intervals falling into one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    /// Bucket label: `yyyy-MM-dd` (day, week start), `yyyy-MM`, `yyyy` or `all`.
    pub period: String,
    /// Start of the earliest interval in the bucket.
    pub start: NaiveDateTime,
    /// End of the latest interval in the bucket.
    pub end: NaiveDateTime,
    /// Sum of consumption (kWh).
    pub total_consumption: f64,
    /// Mean consumption per interval (kWh).
    pub average_consumption: f64,
    /// Largest single-interval consumption (kWh).
    pub peak_consumption: f64,
    /// Start of the first interval reaching the peak.
    pub peak_time: NaiveDateTime,
    /// Number of intervals.
    pub count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    start: NaiveDateTime,
    end: NaiveDateTime,
    total: f64,
    peak: f64,
    peak_time: NaiveDateTime,
    count: usize,
}

impl Accumulator {
    fn new(interval: &ConsumptionInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            total: interval.consumption,
            peak: interval.consumption,
            peak_time: interval.start,
            count: 1,
        }
    }

    fn add(&mut self, interval: &ConsumptionInterval) {
        self.start = self.start.min(interval.start);
        self.end = self.end.max(interval.end);
        self.total += interval.consumption;
        if interval.consumption > self.peak {
            self.peak = interval.consumption;
            self.peak_time = interval.start;
        }
        self.count += 1;
    }

    fn into_bucket(self, period: String) -> AggregatedBucket {
        AggregatedBucket {
            period,
            start: self.start,
            end: self.end,
            total_consumption: self.total,
            average_consumption: self.total / self.count as f64,
            peak_consumption: self.peak,
            peak_time: self.peak_time,
            count: self.count,
        }
    }
}

/// Groups a series into calendar buckets, in ascending period order.
///
/// Returns an empty vector for an empty series.
pub fn aggregate_by_time_frame(
    series: &[ConsumptionInterval],
    frame: TimeFrame,
) -> Vec<AggregatedBucket> {
    if frame == TimeFrame::All {
        let mut intervals = series.iter();
        let Some(first) = intervals.next() else {
            return Vec::new();
        };
        let mut acc = Accumulator::new(first);
        intervals.for_each(|i| acc.add(i));
        return vec![acc.into_bucket(frame.label(first.start.date()))];
    }

    let mut buckets: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for interval in series {
        let anchor = frame.anchor(interval.start.date());
        buckets
            .entry(anchor)
            .and_modify(|acc| acc.add(interval))
            .or_insert_with(|| Accumulator::new(interval));
    }

    buckets
        .into_iter()
        .map(|(anchor, acc)| acc.into_bucket(frame.label(anchor)))
        .collect()
}
