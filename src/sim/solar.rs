//! Solar-only self-consumption and export.

use tracing::debug;

use super::economics::{annualize, payback_years, ratio};
use super::types::{SolarAnalysis, SolarGeneration};
use crate::config::SolarConfig;
use crate::devices::solar::{calculate_scaling_factor, estimate_generation};
use crate::series::{ConsumptionInterval, dataset_days};
use crate::tariff::Tariff;

/// Simulates a solar array without storage.
///
/// Generation first covers the interval's consumption; the surplus is
/// exported at `export_rate` and any shortfall is imported at the matched
/// tariff rate. Annual figures are scaled over the dataset's days.
pub fn simulate_solar(
    series: &[ConsumptionInterval],
    config: &SolarConfig,
    tariff: &Tariff,
    export_rate: f64,
) -> SolarAnalysis {
    let scaling_factor = calculate_scaling_factor(series, config);

    let mut timeline = Vec::with_capacity(series.len());
    let mut total_generation = 0.0;
    let mut total_consumption = 0.0;
    let mut total_self_consumed = 0.0;
    let mut total_exported = 0.0;
    let mut total_grid_import = 0.0;
    let mut import_savings = 0.0;
    let mut export_earnings = 0.0;

    for interval in series {
        let period = tariff.match_period(&interval.start);
        let hours = interval.duration_hours();
        let generation = estimate_generation(&interval.start, config, scaling_factor) * hours;

        let self_consumed = generation.min(interval.consumption);
        let exported = generation - self_consumed;
        let grid_import = interval.consumption - self_consumed;
        let interval_import_savings = self_consumed * period.rate_per_kwh;
        let interval_export_earnings = exported * export_rate;

        total_generation += generation;
        total_consumption += interval.consumption;
        total_self_consumed += self_consumed;
        total_exported += exported;
        total_grid_import += grid_import;
        import_savings += interval_import_savings;
        export_earnings += interval_export_earnings;

        timeline.push(SolarGeneration {
            timestamp: interval.start,
            generation,
            consumption: interval.consumption,
            self_consumed,
            exported,
            grid_import,
            period_id: period.id.clone(),
            import_savings: interval_import_savings,
            export_earnings: interval_export_earnings,
        });
    }

    let days = dataset_days(series);
    let total_savings = import_savings + export_earnings;
    let annual_savings = annualize(total_savings, days);
    let system_cost = config.system_cost();
    debug!(
        intervals = series.len(),
        scaling_factor, total_generation, total_savings, "solar simulated"
    );

    SolarAnalysis {
        total_generation,
        annual_generation: annualize(total_generation, days),
        total_consumption,
        total_self_consumed,
        total_exported,
        total_grid_import,
        import_savings,
        export_earnings,
        total_savings,
        annual_savings,
        self_consumption_rate: ratio(total_self_consumed, total_generation),
        self_sufficiency_rate: ratio(total_self_consumed, total_consumption),
        system_cost,
        payback_years: payback_years(system_cost, annual_savings),
        scaling_factor,
        timeline,
    }
}
