//! Tariff-arbitrage battery dispatch: charge in the cheapest period, discharge when pricier.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::economics::{PEAK_SHAVING_FACTOR, annualize, payback_years, ratio};
use super::types::{BatteryAction, BatteryAnalysis, BatteryState, DayCoverage};
use crate::config::BatteryConfig;
use crate::devices::Battery;
use crate::series::{ConsumptionInterval, half_hourly_days};
use crate::tariff::Tariff;

/// Simulates a battery charging in the tariff's cheapest period and discharging
/// against the load whenever the matched rate is higher.
///
/// Charging and discharging are both capped by the interval's consumption.
/// The battery starts at its minimum state of charge. Annual savings assume
/// half-hourly data (`n / 48` days).
pub fn simulate_battery(
    series: &[ConsumptionInterval],
    config: &BatteryConfig,
    tariff: &Tariff,
) -> BatteryAnalysis {
    let mut battery = Battery::from_config(config);
    let cheapest = tariff.cheapest();
    let cheap_rate = cheapest.rate_per_kwh;

    let mut timeline = Vec::with_capacity(series.len());
    let mut total_savings = 0.0;
    let mut total_charged = 0.0;
    let mut total_discharged = 0.0;
    let mut total_consumption = 0.0;
    let mut peak_consumption = 0.0_f64;
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for interval in series {
        let hours = interval.duration_hours();
        let period = tariff.match_period(&interval.start);
        let rate = period.rate_per_kwh;

        let (action, energy, savings) = if period.id == cheapest.id && battery.can_charge() {
            let amount = battery.charge(interval.consumption, hours);
            (BatteryAction::Charge, amount, -amount * rate)
        } else if rate > cheap_rate && battery.can_discharge() {
            let amount = battery.discharge(interval.consumption, hours);
            (BatteryAction::Discharge, amount, amount * (rate - cheap_rate))
        } else {
            (BatteryAction::Idle, 0.0, 0.0)
        };

        let power_kw = match action {
            BatteryAction::Charge => energy / hours,
            BatteryAction::Discharge => -energy / hours,
            BatteryAction::Idle => 0.0,
        };

        match action {
            BatteryAction::Charge => total_charged += energy,
            BatteryAction::Discharge => total_discharged += energy,
            BatteryAction::Idle => {}
        }
        total_savings += savings;
        total_consumption += interval.consumption;
        peak_consumption = peak_consumption.max(interval.consumption);

        let day = days.entry(interval.start.date()).or_insert((0.0, 0.0));
        day.0 += interval.consumption;
        if action == BatteryAction::Discharge {
            day.1 += energy;
        }

        timeline.push(BatteryState {
            timestamp: interval.start,
            soc_kwh: battery.soc_kwh,
            soc_percent: battery.soc_percent(),
            action,
            power_kw,
            energy_kwh: energy,
            period_id: period.id.clone(),
            savings,
        });
    }

    let annual_savings = annualize(total_savings, half_hourly_days(series));
    let system_cost = config.system_cost();
    debug!(
        intervals = series.len(),
        total_savings, annual_savings, total_charged, total_discharged, "battery dispatch simulated"
    );

    BatteryAnalysis {
        total_savings,
        annual_savings,
        system_cost,
        payback_years: payback_years(system_cost, annual_savings),
        self_consumption_rate: ratio(total_discharged, total_consumption),
        peak_shaving_kwh: PEAK_SHAVING_FACTOR * peak_consumption,
        total_charged_kwh: total_charged,
        total_discharged_kwh: total_discharged,
        equivalent_full_cycles: ratio(total_discharged, config.capacity_kwh),
        worst_day: worst_day(&days),
        timeline,
    }
}

/// Day with the lowest discharge coverage; days without consumption are skipped.
fn worst_day(days: &BTreeMap<NaiveDate, (f64, f64)>) -> Option<DayCoverage> {
    days.iter()
        .filter(|(_, (consumption, _))| *consumption > 0.0)
        .map(|(date, (consumption, discharged))| DayCoverage {
            date: *date,
            consumption: *consumption,
            discharged: *discharged,
            coverage: discharged / consumption,
        })
        .min_by(|a, b| a.coverage.total_cmp(&b.coverage))
}
