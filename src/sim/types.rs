//! Simulation result types: per-interval states and run-level analyses.
//!
//! Every type here is produced by a simulator and read-only to consumers.
//! Payback periods are `f64::INFINITY` when a system never pays back, which
//! JSON serializes as `null`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// What the battery did in one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryAction {
    Charge,
    Discharge,
    Idle,
}

impl fmt::Display for BatteryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Charge => "charge",
            Self::Discharge => "discharge",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// Battery state after one interval of tariff-arbitrage dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryState {
    /// Start of the interval.
    pub timestamp: NaiveDateTime,
    /// Stored energy at the end of the interval (kWh).
    pub soc_kwh: f64,
    /// Stored energy as a percentage of capacity.
    pub soc_percent: f64,
    pub action: BatteryAction,
    /// Average power over the interval (kW; + charge, - discharge).
    pub power_kw: f64,
    /// Energy drawn or delivered (kWh, non-negative).
    pub energy_kwh: f64,
    /// Id of the matched rate period.
    pub period_id: String,
    /// Savings realized in this interval; negative while charging.
    pub savings: f64,
}

/// Share of a day's consumption covered by battery discharge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayCoverage {
    pub date: NaiveDate,
    /// Consumption on the day (kWh).
    pub consumption: f64,
    /// Energy discharged to the load on the day (kWh).
    pub discharged: f64,
    /// `discharged / consumption`.
    pub coverage: f64,
}

/// Outcome of a battery-only simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryAnalysis {
    /// Net savings over the dataset.
    pub total_savings: f64,
    /// Savings scaled to a year of half-hourly intervals.
    pub annual_savings: f64,
    pub system_cost: f64,
    pub payback_years: f64,
    /// Discharged energy over total consumption.
    pub self_consumption_rate: f64,
    /// Estimated reduction of the peak interval's consumption (kWh).
    pub peak_shaving_kwh: f64,
    pub total_charged_kwh: f64,
    pub total_discharged_kwh: f64,
    /// Discharged energy over capacity.
    pub equivalent_full_cycles: f64,
    /// Day with the lowest discharge coverage, skipping days without consumption.
    pub worst_day: Option<DayCoverage>,
    pub timeline: Vec<BatteryState>,
}

/// Energy flows of one interval in a solar-only system (kWh).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarGeneration {
    pub timestamp: NaiveDateTime,
    pub generation: f64,
    pub consumption: f64,
    pub self_consumed: f64,
    pub exported: f64,
    pub grid_import: f64,
    pub period_id: String,
    /// Import cost avoided by self-consumption.
    pub import_savings: f64,
    pub export_earnings: f64,
}

/// Outcome of a solar-only simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarAnalysis {
    pub total_generation: f64,
    /// Generation annualized over the dataset's days.
    pub annual_generation: f64,
    pub total_consumption: f64,
    pub total_self_consumed: f64,
    pub total_exported: f64,
    pub total_grid_import: f64,
    pub import_savings: f64,
    pub export_earnings: f64,
    pub total_savings: f64,
    pub annual_savings: f64,
    /// Self-consumed share of generation.
    pub self_consumption_rate: f64,
    /// Self-consumed share of consumption.
    pub self_sufficiency_rate: f64,
    pub system_cost: f64,
    pub payback_years: f64,
    /// Factor applied to the generation model.
    pub scaling_factor: f64,
    pub timeline: Vec<SolarGeneration>,
}

/// Energy flows of one interval in a solar-plus-battery system (kWh).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedState {
    pub timestamp: NaiveDateTime,
    pub consumption: f64,
    pub generation: f64,
    pub solar_to_load: f64,
    pub solar_to_battery: f64,
    pub battery_to_load: f64,
    pub grid_to_battery: f64,
    pub grid_import: f64,
    pub exported: f64,
    pub soc_kwh: f64,
    pub soc_percent: f64,
    pub period_id: String,
    /// Net savings of the interval after grid-charging cost.
    pub savings: f64,
}

/// Outcome of a combined solar-plus-battery simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedAnalysis {
    pub total_generation: f64,
    pub total_consumption: f64,
    pub total_self_consumed: f64,
    pub total_discharged: f64,
    pub total_solar_charged: f64,
    pub total_grid_charged: f64,
    pub total_exported: f64,
    pub total_grid_import: f64,
    pub import_savings: f64,
    pub export_earnings: f64,
    pub grid_charging_cost: f64,
    pub total_savings: f64,
    pub annual_savings: f64,
    /// Share of consumption met by solar or the battery.
    pub self_sufficiency_rate: f64,
    /// Share of generation used on site, directly or via the battery.
    pub self_consumption_rate: f64,
    pub system_cost: f64,
    pub payback_years: f64,
    pub scaling_factor: f64,
    pub timeline: Vec<CombinedState>,
}
