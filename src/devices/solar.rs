use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::SolarConfig;
use crate::series::{ConsumptionInterval, dataset_days};

/// Average daily peak-sun hours per calendar month for a UK latitude.
const MONTHLY_PEAK_SUN_HOURS: [f64; 12] =
    [0.8, 1.5, 2.5, 3.6, 4.6, 4.9, 4.7, 4.0, 3.0, 1.9, 1.0, 0.6];

/// First hour of the generation window (inclusive).
const SUNRISE_HOUR: f64 = 6.0;
/// End of the generation window (exclusive).
const SUNSET_HOUR: f64 = 20.0;
/// Hour at which output peaks.
const SOLAR_NOON_HOUR: f64 = 13.0;
/// Hours from solar noon at which the parabolic curve reaches zero.
const HALF_DAY_HOURS: f64 = 7.0;

/// Tilt with the best year-round yield at UK latitudes (degrees).
const OPTIMAL_TILT: f64 = 35.0;
/// Panel efficiency the model is calibrated against (%).
const REFERENCE_PANEL_EFFICIENCY: f64 = 20.0;
/// System efficiency the model is calibrated against (%).
const REFERENCE_SYSTEM_EFFICIENCY: f64 = 85.0;

/// Compass direction a solar array faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    South,
    SouthEast,
    SouthWest,
    East,
    West,
    North,
}

impl Orientation {
    /// Fraction of a south-facing array's yield.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::South => 1.0,
            Self::SouthEast | Self::SouthWest => 0.95,
            Self::East | Self::West => 0.8,
            Self::North => 0.5,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::South => "south",
            Self::SouthEast => "south-east",
            Self::SouthWest => "south-west",
            Self::East => "east",
            Self::West => "west",
            Self::North => "north",
        };
        f.write_str(name)
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "south" => Ok(Self::South),
            "south-east" | "southeast" => Ok(Self::SouthEast),
            "south-west" | "southwest" => Ok(Self::SouthWest),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "north" => Ok(Self::North),
            other => Err(format!("unknown orientation \"{other}\"")),
        }
    }
}

/// Seasonal factor in `(0, 1]`: the month's peak-sun hours relative to the sunniest month.
fn seasonal_factor(month0: usize) -> f64 {
    let peak = MONTHLY_PEAK_SUN_HOURS
        .iter()
        .copied()
        .fold(f64::MIN, f64::max);
    MONTHLY_PEAK_SUN_HOURS.get(month0).copied().unwrap_or(0.0) / peak
}

/// Parabolic intraday factor, 1 at solar noon and 0 seven hours either side.
fn daylight_factor(hour: f64) -> f64 {
    if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
        return 0.0;
    }
    let d = (hour - SOLAR_NOON_HOUR).abs();
    if d >= HALF_DAY_HOURS {
        return 0.0;
    }
    1.0 - (d / HALF_DAY_HOURS).powi(2)
}

/// Expected instantaneous output (kW) of an array at `timestamp`.
///
/// Output is zero outside 06:00-20:00 and never negative. The
/// `scaling_factor` comes from [`calculate_scaling_factor`] and is 1.0 when
/// no annual target is configured.
pub fn estimate_generation(
    timestamp: &NaiveDateTime,
    config: &SolarConfig,
    scaling_factor: f64,
) -> f64 {
    let hour = f64::from(timestamp.hour()) + f64::from(timestamp.minute()) / 60.0;
    let daylight = daylight_factor(hour);
    if daylight <= 0.0 {
        return 0.0;
    }

    let season = seasonal_factor(timestamp.month0() as usize);
    let tilt = 1.0 - (config.tilt - OPTIMAL_TILT).abs() / 100.0;
    let efficiency = (config.panel_efficiency / REFERENCE_PANEL_EFFICIENCY)
        * (config.system_efficiency / REFERENCE_SYSTEM_EFFICIENCY);

    let kw = config.capacity_kwp
        * season
        * daylight
        * config.orientation.multiplier()
        * tilt
        * efficiency
        * scaling_factor;
    kw.max(0.0)
}

/// Factor that rescales the model so its annualized output over `series`
/// matches `config.predicted_annual_output`.
///
/// Returns 1.0 when no target is set or when the unscaled estimate (or
/// the dataset span) is zero.
pub fn calculate_scaling_factor(series: &[ConsumptionInterval], config: &SolarConfig) -> f64 {
    let Some(target) = config.predicted_annual_output else {
        return 1.0;
    };

    let days = dataset_days(series);
    if days <= 0.0 {
        return 1.0;
    }

    let estimate: f64 = series
        .iter()
        .map(|i| estimate_generation(&i.start, config, 1.0) * i.duration_hours())
        .sum();
    let annual = estimate / days * 365.0;
    if annual <= 0.0 {
        return 1.0;
    }
    target / annual
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;

    fn at(month: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, 15)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn half_hours(days: i64) -> Vec<ConsumptionInterval> {
        let t0 = at(1, 0, 0) - TimeDelta::days(14);
        (0..days * 48)
            .map(|k| {
                let s = t0 + TimeDelta::minutes(30 * k);
                ConsumptionInterval::new(0.4, s, s + TimeDelta::minutes(30))
            })
            .collect()
    }

    #[test]
    fn no_generation_at_night() {
        let cfg = SolarConfig::default();
        assert_eq!(estimate_generation(&at(6, 5, 30), &cfg, 1.0), 0.0);
        assert_eq!(estimate_generation(&at(6, 20, 0), &cfg, 1.0), 0.0);
        assert_eq!(estimate_generation(&at(6, 23, 0), &cfg, 1.0), 0.0);
    }

    #[test]
    fn peak_at_solar_noon_in_june() {
        let cfg = SolarConfig::default();
        assert_relative_eq!(estimate_generation(&at(6, 13, 0), &cfg, 1.0), 4.0);
        let morning = estimate_generation(&at(6, 9, 0), &cfg, 1.0);
        let afternoon = estimate_generation(&at(6, 17, 0), &cfg, 1.0);
        assert_relative_eq!(morning, afternoon, epsilon = 1e-12);
        assert!(morning < 4.0);
    }

    #[test]
    fn winter_yields_less_than_summer() {
        let cfg = SolarConfig::default();
        assert!(
            estimate_generation(&at(12, 13, 0), &cfg, 1.0)
                < estimate_generation(&at(6, 13, 0), &cfg, 1.0)
        );
    }

    #[test]
    fn orientation_and_tilt_reduce_output() {
        let south = SolarConfig::default();
        let north = SolarConfig {
            orientation: Orientation::North,
            ..SolarConfig::default()
        };
        let flat = SolarConfig {
            tilt: 0.0,
            ..SolarConfig::default()
        };
        let noon = at(6, 13, 0);
        assert_relative_eq!(
            estimate_generation(&noon, &north, 1.0),
            estimate_generation(&noon, &south, 1.0) * 0.5
        );
        assert_relative_eq!(estimate_generation(&noon, &flat, 1.0), 4.0 * 0.65);
    }

    #[test]
    fn orientation_parses_and_displays() {
        assert_eq!("South-West".parse::<Orientation>(), Ok(Orientation::SouthWest));
        assert_eq!("south_east".parse::<Orientation>(), Ok(Orientation::SouthEast));
        assert!("up".parse::<Orientation>().is_err());
        assert_eq!(Orientation::SouthEast.to_string(), "south-east");
    }

    #[test]
    fn scaling_factor_defaults_to_one() {
        let cfg = SolarConfig::default();
        assert_eq!(calculate_scaling_factor(&half_hours(7), &cfg), 1.0);
        let target = SolarConfig {
            predicted_annual_output: Some(3500.0),
            ..SolarConfig::default()
        };
        assert_eq!(calculate_scaling_factor(&[], &target), 1.0);
    }

    #[test]
    fn scaling_factor_hits_annual_target() {
        let series = half_hours(28);
        let cfg = SolarConfig {
            predicted_annual_output: Some(3500.0),
            ..SolarConfig::default()
        };
        let factor = calculate_scaling_factor(&series, &cfg);
        let generated: f64 = series
            .iter()
            .map(|i| estimate_generation(&i.start, &cfg, factor) * i.duration_hours())
            .sum();
        let annual = generated / dataset_days(&series) * 365.0;
        assert_relative_eq!(annual, 3500.0, max_relative = 0.01);
    }
}
