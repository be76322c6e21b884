//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::devices::solar::Orientation;
use crate::sim::economics::{DEFAULT_BATTERY_COST_PER_KWH, DEFAULT_SOLAR_COST_PER_KWP};
use crate::tariff::{RatePeriod, Tariff, presets};

/// Top-level scenario configuration parsed from TOML.
///
/// Battery and solar sections are optional: an absent section means the
/// system is not installed. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`]
/// for the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Tariff selection.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Battery storage parameters, if a battery is installed.
    #[serde(default)]
    pub battery: Option<BatteryConfig>,
    /// Solar PV parameters, if panels are installed.
    #[serde(default)]
    pub solar: Option<SolarConfig>,
    /// Synthetic consumption profile used when no readings are supplied.
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Tariff selection: a preset, or custom periods that replace it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Preset id from the tariff catalog.
    pub preset: String,
    /// Custom rate periods; when non-empty they replace the preset's.
    pub periods: Vec<RatePeriod>,
    /// Overrides the preset's daily standing charge.
    pub standing_charge_per_day: Option<f64>,
    /// Overrides the preset's export rate.
    pub export_rate: Option<f64>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            preset: "intelligent_octopus_go".to_string(),
            periods: Vec::new(),
            standing_charge_per_day: None,
            export_rate: None,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Maximum charging power (kW).
    pub charge_rate_kw: f64,
    /// Maximum discharging power (kW).
    pub discharge_rate_kw: f64,
    /// Round-trip efficiency (%).
    pub roundtrip_efficiency: f64,
    /// Lowest allowed state of charge (% of capacity).
    pub minimum_soc: f64,
    /// Highest allowed state of charge (% of capacity).
    pub maximum_soc: f64,
    /// Installed cost; defaults to a per-kWh estimate.
    pub cost: Option<f64>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 10.0,
            charge_rate_kw: 5.0,
            discharge_rate_kw: 5.0,
            roundtrip_efficiency: 90.0,
            minimum_soc: 10.0,
            maximum_soc: 100.0,
            cost: None,
        }
    }
}

impl BatteryConfig {
    /// Lowest allowed stored energy (kWh).
    pub fn min_soc_kwh(&self) -> f64 {
        self.capacity_kwh * self.minimum_soc / 100.0
    }

    /// Highest allowed stored energy (kWh).
    pub fn max_soc_kwh(&self) -> f64 {
        self.capacity_kwh * self.maximum_soc / 100.0
    }

    /// Round-trip efficiency as a fraction.
    pub fn efficiency(&self) -> f64 {
        self.roundtrip_efficiency / 100.0
    }

    /// Configured cost, or `capacity × DEFAULT_BATTERY_COST_PER_KWH`.
    pub fn system_cost(&self) -> f64 {
        self.cost
            .unwrap_or(self.capacity_kwh * DEFAULT_BATTERY_COST_PER_KWH)
    }
}

/// Solar PV parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Peak capacity (kWp).
    pub capacity_kwp: f64,
    /// Panel efficiency (%).
    pub panel_efficiency: f64,
    /// Inverter and wiring efficiency (%).
    pub system_efficiency: f64,
    /// Compass direction the panels face.
    pub orientation: Orientation,
    /// Panel tilt from horizontal (degrees, 0-90).
    pub tilt: f64,
    /// Expected annual generation (kWh); rescales the model when set.
    pub predicted_annual_output: Option<f64>,
    /// Price paid per exported kWh.
    pub export_rate: f64,
    /// Installed cost; defaults to a per-kWp estimate.
    pub cost: Option<f64>,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            capacity_kwp: 4.0,
            panel_efficiency: 20.0,
            system_efficiency: 85.0,
            orientation: Orientation::South,
            tilt: 35.0,
            predicted_annual_output: None,
            export_rate: 0.15,
            cost: None,
        }
    }
}

impl SolarConfig {
    /// Configured cost, or `capacity × DEFAULT_SOLAR_COST_PER_KWP`.
    pub fn system_cost(&self) -> f64 {
        self.cost
            .unwrap_or(self.capacity_kwp * DEFAULT_SOLAR_COST_PER_KWP)
    }
}

/// Synthetic consumption profile parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// First day of the generated series.
    pub start_date: NaiveDate,
    /// Number of days to generate (must be > 0).
    pub days: usize,
    /// Random seed.
    pub seed: u64,
    /// Baseline draw (kW).
    pub base_kw: f64,
    /// Daily sinusoid amplitude (kW).
    pub amp_kw: f64,
    /// Daily sinusoid phase (radians).
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (kW).
    pub noise_std: f64,
    /// Relative baseline increase at midwinter.
    pub seasonal_amplitude: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 365,
            seed: 42,
            base_kw: 0.35,
            amp_kw: 0.25,
            phase_rad: std::f64::consts::PI,
            noise_std: 0.05,
            seasonal_amplitude: 0.25,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 10 kWh battery on a two-rate EV tariff.
    pub fn baseline() -> Self {
        Self {
            tariff: TariffConfig::default(),
            battery: Some(BatteryConfig {
                cost: Some(6000.0),
                ..BatteryConfig::default()
            }),
            solar: None,
            profile: ProfileConfig::default(),
        }
    }

    /// Returns the tariff-only preset: no storage or generation, Economy 7.
    pub fn tariff_only() -> Self {
        Self {
            tariff: TariffConfig {
                preset: "economy_7".to_string(),
                ..TariffConfig::default()
            },
            battery: None,
            solar: None,
            profile: ProfileConfig::default(),
        }
    }

    /// Returns the solar-only preset: 4 kWp south-facing array.
    pub fn solar_only() -> Self {
        Self {
            tariff: TariffConfig {
                preset: "octopus_go".to_string(),
                ..TariffConfig::default()
            },
            battery: None,
            solar: Some(SolarConfig::default()),
            profile: ProfileConfig::default(),
        }
    }

    /// Returns the solar-plus-battery preset on a three-tier tariff.
    pub fn solar_battery() -> Self {
        Self {
            tariff: TariffConfig {
                preset: "octopus_flux".to_string(),
                ..TariffConfig::default()
            },
            battery: Some(BatteryConfig {
                capacity_kwh: 13.5,
                charge_rate_kw: 5.0,
                discharge_rate_kw: 5.0,
                ..BatteryConfig::default()
            }),
            solar: Some(SolarConfig {
                capacity_kwp: 5.0,
                predicted_annual_output: Some(4250.0),
                export_rate: 0.25,
                ..SolarConfig::default()
            }),
            profile: ProfileConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "tariff_only", "solar_only", "solar_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "tariff_only" => Ok(Self::tariff_only()),
            "solar_only" => Ok(Self::solar_only()),
            "solar_battery" => Ok(Self::solar_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Builds the tariff: custom periods when given, otherwise the preset,
    /// with standing-charge and export-rate overrides applied.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset is unknown.
    pub fn build_tariff(&self) -> Result<Tariff, ConfigError> {
        let t = &self.tariff;
        let mut tariff = if t.periods.is_empty() {
            presets::preset(&t.preset).ok_or_else(|| {
                ConfigError::new(
                    "tariff.preset",
                    format!(
                        "unknown tariff \"{}\", available: {}",
                        t.preset,
                        presets::PRESET_IDS.join(", ")
                    ),
                )
            })?
        } else {
            Tariff::new("custom", "Custom tariff", t.periods.clone())?
        };

        if let Some(standing) = t.standing_charge_per_day {
            tariff.standing_charge_per_day = standing;
        }
        if let Some(export_rate) = t.export_rate {
            tariff.export_rate = export_rate;
        }
        Ok(tariff)
    }

    /// Export rate used for solar simulations against `tariff`, the result
    /// of [`ScenarioConfig::build_tariff`].
    ///
    /// A `[tariff]` override wins, then the tariff's own export rate, then
    /// the solar section's. Custom tariffs carry no export rate of their own.
    pub fn export_rate(&self, tariff: &Tariff) -> f64 {
        if let Some(rate) = self.tariff.export_rate {
            return rate;
        }
        if tariff.export_rate > 0.0 {
            tariff.export_rate
        } else {
            self.solar.as_ref().map_or(0.0, |s| s.export_rate)
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        self.validate_tariff(&mut errors);
        if let Some(bat) = &self.battery {
            validate_battery(bat, &mut errors);
        }
        if let Some(sol) = &self.solar {
            validate_solar(sol, &mut errors);
        }
        if self.profile.days == 0 {
            errors.push(ConfigError::new("profile.days", "must be > 0"));
        }

        errors
    }

    fn validate_tariff(&self, errors: &mut Vec<ConfigError>) {
        let t = &self.tariff;

        if t.periods.is_empty() {
            if presets::preset(&t.preset).is_none() {
                errors.push(ConfigError::new(
                    "tariff.preset",
                    format!("unknown tariff \"{}\"", t.preset),
                ));
            }
        } else {
            let mut seen = HashSet::new();
            for (i, p) in t.periods.iter().enumerate() {
                if !seen.insert(p.id.as_str()) {
                    errors.push(ConfigError::new(
                        format!("tariff.periods[{i}].id"),
                        format!("duplicate id \"{}\"", p.id),
                    ));
                }
                if p.rate_per_kwh < 0.0 {
                    errors.push(ConfigError::new(
                        format!("tariff.periods[{i}].rate_per_kwh"),
                        "must be >= 0",
                    ));
                }
            }

            if let Ok(tariff) = Tariff::new("custom", "Custom tariff", t.periods.clone()) {
                for (first, second) in tariff.find_overlaps() {
                    errors.push(ConfigError::new(
                        "tariff.periods",
                        format!("\"{first}\" overlaps \"{second}\""),
                    ));
                }
                let uncovered = tariff.uncovered_minutes();
                if t.periods.len() > 1 && uncovered > 0 {
                    errors.push(ConfigError::new(
                        "tariff.periods",
                        format!("must cover all 24 hours ({uncovered} minutes uncovered)"),
                    ));
                }
            }
        }

        if t.standing_charge_per_day.is_some_and(|v| v < 0.0) {
            errors.push(ConfigError::new("tariff.standing_charge_per_day", "must be >= 0"));
        }
        if t.export_rate.is_some_and(|v| v < 0.0) {
            errors.push(ConfigError::new("tariff.export_rate", "must be >= 0"));
        }
    }
}

fn validate_battery(bat: &BatteryConfig, errors: &mut Vec<ConfigError>) {
    if bat.capacity_kwh <= 0.0 {
        errors.push(ConfigError::new("battery.capacity_kwh", "must be > 0"));
    }
    if bat.charge_rate_kw <= 0.0 {
        errors.push(ConfigError::new("battery.charge_rate_kw", "must be > 0"));
    }
    if bat.discharge_rate_kw <= 0.0 {
        errors.push(ConfigError::new("battery.discharge_rate_kw", "must be > 0"));
    }
    if !(bat.roundtrip_efficiency > 0.0 && bat.roundtrip_efficiency <= 100.0) {
        errors.push(ConfigError::new(
            "battery.roundtrip_efficiency",
            "must be in (0, 100]",
        ));
    }
    if !(0.0..=100.0).contains(&bat.minimum_soc) {
        errors.push(ConfigError::new("battery.minimum_soc", "must be in [0, 100]"));
    }
    if !(0.0..=100.0).contains(&bat.maximum_soc) {
        errors.push(ConfigError::new("battery.maximum_soc", "must be in [0, 100]"));
    }
    if bat.minimum_soc >= bat.maximum_soc {
        errors.push(ConfigError::new(
            "battery.minimum_soc",
            "must be < battery.maximum_soc",
        ));
    }
    if bat.cost.is_some_and(|c| c < 0.0) {
        errors.push(ConfigError::new("battery.cost", "must be >= 0"));
    }
}

fn validate_solar(sol: &SolarConfig, errors: &mut Vec<ConfigError>) {
    if sol.capacity_kwp <= 0.0 {
        errors.push(ConfigError::new("solar.capacity_kwp", "must be > 0"));
    }
    if !(sol.panel_efficiency > 0.0 && sol.panel_efficiency <= 100.0) {
        errors.push(ConfigError::new("solar.panel_efficiency", "must be in (0, 100]"));
    }
    if !(sol.system_efficiency > 0.0 && sol.system_efficiency <= 100.0) {
        errors.push(ConfigError::new(
            "solar.system_efficiency",
            "must be in (0, 100]",
        ));
    }
    if !(0.0..=90.0).contains(&sol.tilt) {
        errors.push(ConfigError::new("solar.tilt", "must be in [0, 90]"));
    }
    if sol.predicted_annual_output.is_some_and(|v| v <= 0.0) {
        errors.push(ConfigError::new(
            "solar.predicted_annual_output",
            "must be > 0 when set",
        ));
    }
    if sol.export_rate < 0.0 {
        errors.push(ConfigError::new("solar.export_rate", "must be >= 0"));
    }
    if sol.cost.is_some_and(|c| c < 0.0) {
        errors.push(ConfigError::new("solar.cost", "must be >= 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn export_rate_prefers_override_then_tariff_then_solar() {
        let mut cfg = ScenarioConfig::solar_only();
        cfg.tariff.preset = "octopus_flux".to_string();
        let flux = cfg.build_tariff().unwrap();
        assert_eq!(cfg.export_rate(&flux), 0.25);

        cfg.tariff.export_rate = Some(0.04);
        let overridden = cfg.build_tariff().unwrap();
        assert_eq!(cfg.export_rate(&overridden), 0.04);

        cfg.tariff.export_rate = None;
        cfg.tariff.periods = vec![RatePeriod::new("flat", "Flat", "00:00", "00:00", 0.2)];
        let custom = cfg.build_tariff().unwrap();
        assert_eq!(cfg.export_rate(&custom), 0.15);

        assert_eq!(ScenarioConfig::tariff_only().export_rate(&custom), 0.0);
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
            assert!(cfg.unwrap().build_tariff().is_ok());
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[tariff]
standing_charge_per_day = 0.5
export_rate = 0.12

[[tariff.periods]]
id = "night"
name = "Night"
start_time = "00:30"
end_time = "04:30"
rate_per_kwh = 0.09

[[tariff.periods]]
id = "day"
name = "Day"
start_time = "04:30"
end_time = "00:30"
rate_per_kwh = 0.28

[battery]
capacity_kwh = 5.2
charge_rate_kw = 3.0
discharge_rate_kw = 3.0
roundtrip_efficiency = 92.0
cost = 3500.0

[solar]
capacity_kwp = 3.6
orientation = "south-west"
tilt = 30.0
predicted_annual_output = 3100.0

[profile]
start_date = "2023-06-01"
days = 30
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
        assert_eq!(cfg.battery.as_ref().map(|b| b.minimum_soc), Some(10.0));
        assert_eq!(cfg.solar.as_ref().map(|s| s.orientation), Some(Orientation::SouthWest));
        assert_eq!(cfg.profile.days, 30);
        let tariff = cfg.build_tariff().unwrap();
        assert_eq!(cfg.export_rate(&tariff), 0.12);
        assert_eq!(tariff.id, "custom");
        assert_eq!(tariff.periods().len(), 2);
        assert_eq!(tariff.standing_charge_per_day, 0.5);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_kwh = 10.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[battery]
capacity_kwh = 13.5
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        let bat = cfg.battery.unwrap();
        assert_eq!(bat.capacity_kwh, 13.5);
        assert_eq!(bat.charge_rate_kw, 5.0);
        assert!(cfg.solar.is_none());
        assert_eq!(cfg.tariff.preset, "intelligent_octopus_go");
    }

    #[test]
    fn validation_catches_unknown_tariff() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.tariff.preset = "bogus".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "tariff.preset"));
        assert!(cfg.build_tariff().is_err());
    }

    #[test]
    fn validation_rejects_overlapping_periods() {
        let mut cfg = ScenarioConfig::tariff_only();
        cfg.tariff.periods = vec![
            RatePeriod::new("a", "A", "00:00", "13:00", 0.1),
            RatePeriod::new("b", "B", "12:00", "00:00", 0.3),
        ];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("overlaps")), "{errors:?}");
    }

    #[test]
    fn validation_rejects_gaps_and_duplicate_ids() {
        let mut cfg = ScenarioConfig::tariff_only();
        cfg.tariff.periods = vec![
            RatePeriod::new("a", "A", "00:00", "06:00", 0.1),
            RatePeriod::new("a", "B", "07:00", "00:00", 0.3),
        ];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.periods[1].id"));
        assert!(errors.iter().any(|e| e.message.contains("60 minutes uncovered")));
    }

    #[test]
    fn validation_catches_bad_battery_envelope() {
        let mut cfg = ScenarioConfig::baseline();
        if let Some(bat) = cfg.battery.as_mut() {
            bat.capacity_kwh = 0.0;
            bat.minimum_soc = 90.0;
            bat.maximum_soc = 80.0;
        }
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
        assert!(errors.iter().any(|e| e.field == "battery.minimum_soc"));
    }

    #[test]
    fn validation_catches_bad_solar_tilt() {
        let mut cfg = ScenarioConfig::solar_only();
        if let Some(sol) = cfg.solar.as_mut() {
            sol.tilt = 120.0;
        }
        assert!(cfg.validate().iter().any(|e| e.field == "solar.tilt"));
    }

    #[test]
    fn default_costs_follow_capacity() {
        let bat = BatteryConfig::default();
        assert_eq!(bat.system_cost(), 10.0 * DEFAULT_BATTERY_COST_PER_KWH);
        let sol = SolarConfig::default();
        assert_eq!(sol.system_cost(), 4.0 * DEFAULT_SOLAR_COST_PER_KWP);
        assert_eq!(bat.min_soc_kwh(), 1.0);
        assert_eq!(bat.max_soc_kwh(), 10.0);
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::new("battery.capacity_kwh", "must be > 0");
        assert_eq!(e.to_string(), "config error: battery.capacity_kwh: must be > 0");
    }
}
