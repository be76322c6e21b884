//! Cost of a consumption series under a tariff.

use std::collections::BTreeMap;

use serde::Serialize;

use super::rate::Tariff;
use crate::series::{ConsumptionInterval, dataset_days};

/// Consumption and cost attributed to one rate period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodCost {
    /// Energy consumed inside the period (kWh).
    pub consumption: f64,
    /// Energy cost inside the period.
    pub cost: f64,
}

/// Total energy cost: `Σ consumption × matched rate`.
pub fn calculate_total_cost(series: &[ConsumptionInterval], tariff: &Tariff) -> f64 {
    series
        .iter()
        .map(|interval| interval.consumption * tariff.match_period(&interval.start).rate_per_kwh)
        .sum()
}

/// Consumption and cost per rate period id.
///
/// Every period of the tariff has an entry, including unused ones.
pub fn calculate_cost_breakdown(
    series: &[ConsumptionInterval],
    tariff: &Tariff,
) -> BTreeMap<String, PeriodCost> {
    let mut breakdown: BTreeMap<String, PeriodCost> = tariff
        .periods()
        .iter()
        .map(|p| (p.id.clone(), PeriodCost::default()))
        .collect();

    for interval in series {
        let period = tariff.match_period(&interval.start);
        let entry = breakdown.entry(period.id.clone()).or_default();
        entry.consumption += interval.consumption;
        entry.cost += interval.consumption * period.rate_per_kwh;
    }

    breakdown
}

/// Energy cost annualized over the dataset span, plus a year of standing charges.
pub fn calculate_annual_cost(series: &[ConsumptionInterval], tariff: &Tariff) -> f64 {
    let days = dataset_days(series);
    let energy = if days > 0.0 {
        calculate_total_cost(series, tariff) / days * 365.0
    } else {
        0.0
    };
    energy + tariff.standing_charge_per_day * 365.0
}

/// Average price paid per kWh; 0 when nothing was consumed.
pub fn calculate_average_cost_per_kwh(series: &[ConsumptionInterval], tariff: &Tariff) -> f64 {
    let consumption: f64 = series.iter().map(|i| i.consumption).sum();
    if consumption > 0.0 {
        calculate_total_cost(series, tariff) / consumption
    } else {
        0.0
    }
}
