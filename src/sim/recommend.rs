//! Sizing advisors for batteries and solar arrays.

use serde::Serialize;

use super::battery::simulate_battery;
use super::economics::{DEFAULT_SOLAR_COST_PER_KWP, annualize};
use crate::config::BatteryConfig;
use crate::series::{ConsumptionInterval, dataset_days, total_consumption};
use crate::tariff::Tariff;

/// Commonly sold battery capacities (kWh), ascending.
pub const STANDARD_BATTERY_SIZES: [f64; 7] = [2.5, 5.0, 7.5, 10.0, 13.5, 15.0, 20.0];

/// Share of nominal capacity usable between the default SoC limits.
const USABLE_FRACTION: f64 = 0.9;
const MIN_CHARGE_RATE_KW: f64 = 2.5;

/// Fraction of annual consumption a recommended array aims to generate.
const SOLAR_TARGET_COVERAGE: f64 = 0.8;
/// Expected yearly yield per installed kWp (kWh).
const SPECIFIC_YIELD_KWH_PER_KWP: f64 = 900.0;
const MIN_SOLAR_KWP: f64 = 1.0;
const MAX_SOLAR_KWP: f64 = 10.0;
const PANEL_KWP: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryRecommendation {
    pub capacity_kwh: f64,
    pub charge_rate_kw: f64,
    /// Average daily consumption outside the cheapest period (kWh).
    pub daily_shiftable_kwh: f64,
    pub estimated_annual_savings: f64,
    pub estimated_cost: f64,
    pub payback_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarRecommendation {
    pub capacity_kwp: f64,
    pub panel_count: u32,
    pub annual_consumption: f64,
    pub expected_annual_generation: f64,
    pub estimated_cost: f64,
}

/// Suggests a battery large enough to shift a typical day's non-cheap consumption.
///
/// The capacity is the next standard size above the daily shiftable energy
/// divided by the usable fraction, capped at the largest size. The charge
/// rate fills that energy within the cheapest window, between 2.5 kW and the
/// capacity itself. Savings come from simulating the recommended battery.
///
/// Returns `None` for an empty series.
pub fn recommend_battery_size(
    series: &[ConsumptionInterval],
    tariff: &Tariff,
) -> Option<BatteryRecommendation> {
    let days = dataset_days(series);
    if series.is_empty() || days <= 0.0 {
        return None;
    }

    let cheapest = tariff.cheapest();
    let shiftable: f64 = series
        .iter()
        .filter(|i| tariff.match_period(&i.start).id != cheapest.id)
        .map(|i| i.consumption)
        .sum();
    let daily_shiftable_kwh = shiftable / days;

    let needed = daily_shiftable_kwh / USABLE_FRACTION;
    let largest = STANDARD_BATTERY_SIZES[STANDARD_BATTERY_SIZES.len() - 1];
    let capacity_kwh = STANDARD_BATTERY_SIZES
        .iter()
        .copied()
        .find(|&size| size >= needed)
        .unwrap_or(largest);

    let window = cheapest.duration_hours();
    let charge_rate_kw = if window > 0.0 {
        (capacity_kwh * USABLE_FRACTION / window).clamp(MIN_CHARGE_RATE_KW, capacity_kwh)
    } else {
        capacity_kwh
    };

    let config = BatteryConfig {
        capacity_kwh,
        charge_rate_kw,
        discharge_rate_kw: charge_rate_kw,
        ..BatteryConfig::default()
    };
    let analysis = simulate_battery(series, &config, tariff);

    Some(BatteryRecommendation {
        capacity_kwh,
        charge_rate_kw,
        daily_shiftable_kwh,
        estimated_annual_savings: analysis.annual_savings,
        estimated_cost: analysis.system_cost,
        payback_years: analysis.payback_years,
    })
}

/// Suggests an array generating about 80 % of annual consumption.
///
/// Returns `None` for an empty series.
pub fn recommend_solar_size(series: &[ConsumptionInterval]) -> Option<SolarRecommendation> {
    let days = dataset_days(series);
    if series.is_empty() || days <= 0.0 {
        return None;
    }

    let annual_consumption = annualize(total_consumption(series), days);
    let raw_kwp = annual_consumption * SOLAR_TARGET_COVERAGE / SPECIFIC_YIELD_KWH_PER_KWP;
    let capacity_kwp = ((raw_kwp * 2.0).round() / 2.0).clamp(MIN_SOLAR_KWP, MAX_SOLAR_KWP);
    let panel_count = (capacity_kwp / PANEL_KWP).ceil() as u32;
    let estimated_cost = capacity_kwp * DEFAULT_SOLAR_COST_PER_KWP;

    Some(SolarRecommendation {
        capacity_kwp,
        panel_count,
        annual_consumption,
        expected_annual_generation: capacity_kwp * SPECIFIC_YIELD_KWH_PER_KWP,
        estimated_cost,
    })
}
