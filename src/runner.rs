//! Scenario execution: picks the simulator matching the configured systems.

use tracing::{info, instrument};

use crate::config::{ConfigError, ProfileConfig, ScenarioConfig};
use crate::report::{CostSummary, ScenarioReport, Simulation};
use crate::series::synthetic::ProfileGenerator;
use crate::series::{ConsumptionInterval, calculate_statistics};
use crate::sim::{
    recommend_battery_size, recommend_solar_size, simulate_battery, simulate_solar,
    simulate_solar_with_battery,
};
use crate::tariff::{
    calculate_annual_cost, calculate_average_cost_per_kwh, calculate_cost_breakdown,
    calculate_total_cost,
};

/// Generates the synthetic consumption series described by a `[profile]` section.
pub fn synthetic_series(profile: &ProfileConfig) -> Vec<ConsumptionInterval> {
    ProfileGenerator::from_config(profile).generate(profile.start_date, profile.days)
}

/// Runs a scenario against a consumption series.
///
/// The battery simulator runs when only a battery is configured, the solar
/// simulator when only panels are, and the combined simulator when both are.
///
/// # Errors
///
/// Returns a `ConfigError` if the scenario's tariff cannot be built.
#[instrument(skip_all, fields(intervals = series.len()))]
pub fn run_scenario(
    series: &[ConsumptionInterval],
    scenario: &ScenarioConfig,
) -> Result<ScenarioReport, ConfigError> {
    let tariff = scenario.build_tariff()?;
    info!(tariff = %tariff.id, periods = tariff.periods().len(), "running scenario");

    let cost = CostSummary {
        total_cost: calculate_total_cost(series, &tariff),
        annual_cost: calculate_annual_cost(series, &tariff),
        average_cost_per_kwh: calculate_average_cost_per_kwh(series, &tariff),
        breakdown: calculate_cost_breakdown(series, &tariff),
    };

    let export_rate = scenario.export_rate(&tariff);
    let simulation = match (&scenario.battery, &scenario.solar) {
        (None, None) => Simulation::TariffOnly,
        (Some(battery), None) => Simulation::Battery(simulate_battery(series, battery, &tariff)),
        (None, Some(solar)) => {
            Simulation::Solar(simulate_solar(series, solar, &tariff, export_rate))
        }
        (Some(battery), Some(solar)) => Simulation::Combined(simulate_solar_with_battery(
            series,
            solar,
            battery,
            &tariff,
            export_rate,
        )),
    };
    info!(
        system = simulation.kind(),
        annual_savings = simulation.annual_savings(),
        "simulation finished"
    );

    Ok(ScenarioReport {
        statistics: calculate_statistics(series),
        cost,
        simulation,
        battery_recommendation: recommend_battery_size(series, &tariff),
        solar_recommendation: recommend_solar_size(series),
        tariff,
    })
}
