//! Combined solar-plus-battery dispatch under a fixed priority order.

use tracing::debug;

use super::economics::{annualize, payback_years, ratio};
use super::types::{CombinedAnalysis, CombinedState};
use crate::config::{BatteryConfig, SolarConfig};
use crate::devices::Battery;
use crate::devices::solar::{calculate_scaling_factor, estimate_generation};
use crate::series::{ConsumptionInterval, dataset_days};
use crate::tariff::Tariff;

/// Simulates a solar array feeding a battery and the load.
///
/// Each interval is dispatched in order:
///
/// 1. solar covers the load directly;
/// 2. surplus solar charges the battery;
/// 3. outside the cheapest period the battery covers the remaining demand;
/// 4. in the cheapest period, if the battery neither charged from solar nor
///    discharged, it charges from the grid;
/// 5. whatever surplus is left is exported.
///
/// Grid-charging cost is subtracted from the savings.
pub fn simulate_solar_with_battery(
    series: &[ConsumptionInterval],
    solar: &SolarConfig,
    battery_config: &BatteryConfig,
    tariff: &Tariff,
    export_rate: f64,
) -> CombinedAnalysis {
    let scaling_factor = calculate_scaling_factor(series, solar);
    let cheapest_id = tariff.cheapest().id.as_str();
    let mut battery = Battery::from_config(battery_config);

    let mut timeline = Vec::with_capacity(series.len());
    let mut total_generation = 0.0;
    let mut total_consumption = 0.0;
    let mut total_self_consumed = 0.0;
    let mut total_discharged = 0.0;
    let mut total_solar_charged = 0.0;
    let mut total_grid_charged = 0.0;
    let mut total_exported = 0.0;
    let mut total_grid_import = 0.0;
    let mut import_savings = 0.0;
    let mut export_earnings = 0.0;
    let mut grid_charging_cost = 0.0;

    for interval in series {
        let hours = interval.duration_hours();
        let period = tariff.match_period(&interval.start);
        let rate = period.rate_per_kwh;
        let in_cheapest = period.id == cheapest_id;
        let generation = estimate_generation(&interval.start, solar, scaling_factor) * hours;

        let solar_to_load = generation.min(interval.consumption);
        let surplus = generation - solar_to_load;
        let demand = interval.consumption - solar_to_load;

        let solar_to_battery = if surplus > 0.0 {
            battery.charge(surplus, hours)
        } else {
            0.0
        };

        let battery_to_load = if !in_cheapest && demand > 0.0 && battery.can_discharge() {
            battery.discharge(demand, hours)
        } else {
            0.0
        };

        let grid_to_battery = if in_cheapest
            && solar_to_battery == 0.0
            && battery_to_load == 0.0
            && battery.can_charge()
        {
            battery.charge(battery.headroom_kwh(), hours)
        } else {
            0.0
        };

        let exported = surplus - solar_to_battery;
        let grid_import = demand - battery_to_load;

        let interval_import_savings = (solar_to_load + battery_to_load) * rate;
        let interval_export_earnings = exported * export_rate;
        let interval_grid_cost = grid_to_battery * rate;

        total_generation += generation;
        total_consumption += interval.consumption;
        total_self_consumed += solar_to_load;
        total_discharged += battery_to_load;
        total_solar_charged += solar_to_battery;
        total_grid_charged += grid_to_battery;
        total_exported += exported;
        total_grid_import += grid_import;
        import_savings += interval_import_savings;
        export_earnings += interval_export_earnings;
        grid_charging_cost += interval_grid_cost;

        timeline.push(CombinedState {
            timestamp: interval.start,
            consumption: interval.consumption,
            generation,
            solar_to_load,
            solar_to_battery,
            battery_to_load,
            grid_to_battery,
            grid_import,
            exported,
            soc_kwh: battery.soc_kwh,
            soc_percent: battery.soc_percent(),
            period_id: period.id.clone(),
            savings: interval_import_savings + interval_export_earnings - interval_grid_cost,
        });
    }

    let total_savings = import_savings + export_earnings - grid_charging_cost;
    let annual_savings = annualize(total_savings, dataset_days(series));
    let system_cost = solar.system_cost() + battery_config.system_cost();
    debug!(
        intervals = series.len(),
        total_generation,
        total_discharged,
        total_grid_charged,
        total_savings,
        "combined dispatch simulated"
    );

    CombinedAnalysis {
        total_generation,
        total_consumption,
        total_self_consumed,
        total_discharged,
        total_solar_charged,
        total_grid_charged,
        total_exported,
        total_grid_import,
        import_savings,
        export_earnings,
        grid_charging_cost,
        total_savings,
        annual_savings,
        self_sufficiency_rate: ratio(total_self_consumed + total_discharged, total_consumption),
        self_consumption_rate: ratio(total_self_consumed + total_solar_charged, total_generation),
        system_cost,
        payback_years: payback_years(system_cost, annual_savings),
        scaling_factor,
        timeline,
    }
}
