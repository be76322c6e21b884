//! Rate periods and timestamp-to-rate matching.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minute-resolution wall-clock time of day, written as `"HH:mm"`.
///
/// Ordering matches lexical ordering of the zero-padded `"HH:mm"` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, `"00:00"`.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a time of day from hours and minutes.
    ///
    /// Returns `None` if `hour >= 24` or `minute >= 60`.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self(hour * 60 + minute))
    }

    /// Time of day of a timestamp, truncated to the minute.
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        // hour < 24 and minute < 60 always hold for chrono timestamps
        Self((timestamp.hour() * 60 + timestamp.minute()) as u16)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected \"HH:mm\", got \"{s}\""))?;
        let hour: u16 = hour
            .parse()
            .map_err(|_| format!("invalid hour in \"{s}\""))?;
        let minute: u16 = minute
            .parse()
            .map_err(|_| format!("invalid minute in \"{s}\""))?;
        Self::new(hour, minute).ok_or_else(|| format!("time out of range: \"{s}\""))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A named time-of-day window with a price per kWh.
///
/// A window with `start_time > end_time` wraps midnight. Equal bounds describe
/// an empty window; a single-period tariff still applies all day through the
/// first-period fallback of [`match_rate_period`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatePeriod {
    /// Unique identifier within a tariff.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Window start (inclusive).
    pub start_time: TimeOfDay,
    /// Window end (exclusive).
    pub end_time: TimeOfDay,
    /// Price per kWh imported during this window.
    pub rate_per_kwh: f64,
}

impl RatePeriod {
    /// Creates a rate period from `"HH:mm"` window bounds.
    ///
    /// # Panics
    ///
    /// Panics if either bound is not a valid `"HH:mm"` time. Intended for
    /// static tables and tests; parse [`TimeOfDay`] directly for user input.
    pub fn new(id: &str, name: &str, start: &str, end: &str, rate_per_kwh: f64) -> Self {
        let parse = |s: &str| {
            s.parse::<TimeOfDay>()
                .unwrap_or_else(|e| panic!("invalid rate period bound: {e}"))
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
            start_time: parse(start),
            end_time: parse(end),
            rate_per_kwh,
        }
    }

    /// Whether the window spans midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.start_time > self.end_time
    }

    /// Whether `time` falls inside this window.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        if self.wraps_midnight() {
            time >= self.start_time || time < self.end_time
        } else {
            self.start_time <= time && time < self.end_time
        }
    }

    /// Window length in hours (wrapping windows included).
    pub fn duration_hours(&self) -> f64 {
        let start = self.start_time.minutes();
        let end = self.end_time.minutes();
        let minutes = if self.wraps_midnight() {
            MINUTES_PER_DAY - start + end
        } else {
            end - start
        };
        f64::from(minutes) / 60.0
    }
}

/// Returns the first period whose window contains the timestamp.
///
/// Matching is first-match-wins over the slice order: with overlapping
/// windows the earlier period shadows the later one. When nothing matches,
/// the first period is returned. Returns `None` only for an empty slice.
pub fn match_rate_period<'a>(
    timestamp: &NaiveDateTime,
    periods: &'a [RatePeriod],
) -> Option<&'a RatePeriod> {
    let time = TimeOfDay::of(timestamp);
    periods
        .iter()
        .find(|period| period.contains(time))
        .or_else(|| periods.first())
}

/// A complete time-of-use tariff.
///
/// Holds a non-empty, ordered list of rate periods so that matching always
/// yields a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tariff {
    /// Identifier (preset id or `"custom"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    periods: Vec<RatePeriod>,
    /// Fixed daily charge, independent of consumption.
    pub standing_charge_per_day: f64,
    /// Price paid per exported kWh.
    pub export_rate: f64,
}

impl Tariff {
    /// Creates a tariff without standing charge or export rate.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `periods` is empty.
    pub fn new(id: &str, name: &str, periods: Vec<RatePeriod>) -> Result<Self, ConfigError> {
        if periods.is_empty() {
            return Err(ConfigError {
                field: "tariff.periods".into(),
                message: "at least one rate period is required".into(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            periods,
            standing_charge_per_day: 0.0,
            export_rate: 0.0,
        })
    }

    /// Sets the daily standing charge.
    #[must_use]
    pub fn with_standing_charge(mut self, per_day: f64) -> Self {
        self.standing_charge_per_day = per_day;
        self
    }

    /// Sets the export rate.
    #[must_use]
    pub fn with_export_rate(mut self, export_rate: f64) -> Self {
        self.export_rate = export_rate;
        self
    }

    /// Rate periods in matching order.
    pub fn periods(&self) -> &[RatePeriod] {
        &self.periods
    }

    /// Applicable period for a timestamp; see [`match_rate_period`].
    pub fn match_period(&self, timestamp: &NaiveDateTime) -> &RatePeriod {
        // periods is never empty
        match_rate_period(timestamp, &self.periods).unwrap_or(&self.periods[0])
    }

    /// The lowest-priced period; the earliest one on ties.
    pub fn cheapest(&self) -> &RatePeriod {
        self.periods
            .iter()
            .reduce(|best, p| if p.rate_per_kwh < best.rate_per_kwh { p } else { best })
            .unwrap_or(&self.periods[0])
    }

    /// Minutes of the day covered by no period.
    pub fn uncovered_minutes(&self) -> usize {
        (0..MINUTES_PER_DAY)
            .filter(|&m| !self.periods.iter().any(|p| p.contains(TimeOfDay(m))))
            .count()
    }

    /// Pairs of period ids whose windows overlap, in matching order.
    ///
    /// With overlaps, the earlier period of each pair shadows the later one
    /// for the shared minutes.
    pub fn find_overlaps(&self) -> Vec<(String, String)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.periods.iter().enumerate() {
            for b in &self.periods[i + 1..] {
                let shared = |m| a.contains(TimeOfDay(m)) && b.contains(TimeOfDay(m));
                if (0..MINUTES_PER_DAY).any(shared) {
                    overlaps.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        overlaps
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn night_and_day() -> Vec<RatePeriod> {
        vec![
            RatePeriod::new("cheap", "Off-peak", "23:30", "05:30", 0.07),
            RatePeriod::new("standard", "Standard", "05:30", "23:30", 0.30),
        ]
    }

    #[test]
    fn time_of_day_parses_and_formats() {
        let t: TimeOfDay = "07:05".parse().unwrap();
        assert_eq!(t.minutes(), 425);
        assert_eq!(t.to_string(), "07:05");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("7".parse::<TimeOfDay>().is_err());
        assert!("ab:cd".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn time_of_day_truncates_seconds() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(5, 29, 59))
            .unwrap();
        assert_eq!(TimeOfDay::of(&ts).to_string(), "05:29");
    }

    #[test]
    fn non_wrapping_window_is_half_open() {
        let p = RatePeriod::new("day", "Day", "05:30", "23:30", 0.3);
        assert!(p.contains("05:30".parse().unwrap()));
        assert!(p.contains("23:29".parse().unwrap()));
        assert!(!p.contains("23:30".parse().unwrap()));
        assert!(!p.contains("05:29".parse().unwrap()));
    }

    #[test]
    fn wrapping_window_spans_midnight() {
        let p = RatePeriod::new("night", "Night", "23:30", "05:30", 0.07);
        assert!(p.wraps_midnight());
        assert!(p.contains("23:30".parse().unwrap()));
        assert!(p.contains("00:00".parse().unwrap()));
        assert!(p.contains("05:29".parse().unwrap()));
        assert!(!p.contains("05:30".parse().unwrap()));
        assert!(!p.contains("12:00".parse().unwrap()));
        assert_eq!(p.duration_hours(), 6.0);
    }

    #[test]
    fn matches_across_midnight() {
        let periods = night_and_day();
        assert_eq!(match_rate_period(&at(0, 15), &periods).map(|p| p.id.as_str()), Some("cheap"));
        assert_eq!(match_rate_period(&at(23, 30), &periods).map(|p| p.id.as_str()), Some("cheap"));
        assert_eq!(
            match_rate_period(&at(12, 0), &periods).map(|p| p.id.as_str()),
            Some("standard")
        );
    }

    #[test]
    fn falls_back_to_first_period() {
        let periods = vec![
            RatePeriod::new("a", "A", "08:00", "09:00", 0.2),
            RatePeriod::new("b", "B", "09:00", "10:00", 0.3),
        ];
        assert_eq!(match_rate_period(&at(3, 0), &periods).map(|p| p.id.as_str()), Some("a"));
        assert!(match_rate_period(&at(3, 0), &[]).is_none());
        let tariff = Tariff::new("t", "T", periods).unwrap();
        assert_eq!(tariff.match_period(&at(3, 0)).id, "a");
        assert_eq!(tariff.match_period(&at(9, 30)).id, "b");
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let periods = vec![
            RatePeriod::new("wide", "Wide", "00:00", "12:00", 0.2),
            RatePeriod::new("narrow", "Narrow", "06:00", "07:00", 0.1),
        ];
        assert_eq!(match_rate_period(&at(6, 30), &periods).map(|p| p.id.as_str()), Some("wide"));
        let tariff = Tariff::new("t", "T", periods).unwrap();
        assert_eq!(tariff.match_period(&at(6, 30)).id, "wide");
        assert_eq!(
            tariff.find_overlaps(),
            vec![("wide".to_string(), "narrow".to_string())]
        );
    }

    #[test]
    fn every_minute_matches_a_containing_period() {
        let tariff = Tariff::new("t", "T", night_and_day()).unwrap();
        assert_eq!(tariff.uncovered_minutes(), 0);
        assert!(tariff.find_overlaps().is_empty());
        for minute in 0..MINUTES_PER_DAY {
            let time = TimeOfDay(minute);
            let ts = at(u32::from(minute / 60), u32::from(minute % 60));
            assert!(tariff.match_period(&ts).contains(time));
        }
    }

    #[test]
    fn cheapest_prefers_earliest_on_ties() {
        let tariff = Tariff::new(
            "t",
            "T",
            vec![
                RatePeriod::new("a", "A", "00:00", "08:00", 0.1),
                RatePeriod::new("b", "B", "08:00", "16:00", 0.1),
                RatePeriod::new("c", "C", "16:00", "00:00", 0.3),
            ],
        )
        .unwrap();
        assert_eq!(tariff.cheapest().id, "a");
    }

    #[test]
    fn empty_tariff_is_rejected() {
        let err = Tariff::new("t", "T", Vec::new()).unwrap_err();
        assert_eq!(err.field, "tariff.periods");
    }

    #[test]
    fn rate_period_deserializes_from_toml() {
        let p: RatePeriod = toml::from_str(
            r#"
id = "peak"
name = "Peak"
start_time = "16:00"
end_time = "19:00"
rate_per_kwh = 0.4
"#,
        )
        .unwrap();
        assert_eq!(p.start_time.to_string(), "16:00");
        assert_eq!(p.duration_hours(), 3.0);
    }
}
