//! Solar and solar-plus-battery simulation over synthetic years.

mod common;

use approx::assert_relative_eq;

use tariff_sim::config::{BatteryConfig, ScenarioConfig, SolarConfig};
use tariff_sim::devices::{Orientation, calculate_scaling_factor};
use tariff_sim::sim::{recommend_solar_size, simulate_solar, simulate_solar_with_battery};
use tariff_sim::tariff::presets;

#[test]
fn scaled_generation_matches_annual_target() {
    let series = common::synthetic(120, 8);
    let tariff = presets::preset("octopus_go").unwrap();
    let config = SolarConfig {
        predicted_annual_output: Some(3200.0),
        ..SolarConfig::default()
    };

    let analysis = simulate_solar(&series, &config, &tariff, config.export_rate);
    assert!((analysis.annual_generation - 3200.0).abs() / 3200.0 < 0.01);
    assert_relative_eq!(
        analysis.scaling_factor,
        calculate_scaling_factor(&series, &config),
        epsilon = 1e-12
    );
}

#[test]
fn full_year_generation_lands_on_annual_target() {
    let series = common::synthetic(365, 11);
    let tariff = presets::preset("octopus_flux").unwrap();
    let config = SolarConfig {
        capacity_kwp: 5.0,
        predicted_annual_output: Some(4250.0),
        ..SolarConfig::default()
    };

    let analysis = simulate_solar(&series, &config, &tariff, config.export_rate);
    assert!((analysis.total_generation - 4250.0).abs() / 4250.0 < 0.01);
    assert!((analysis.annual_generation - 4250.0).abs() / 4250.0 < 0.01);
    let summed: f64 = analysis.timeline.iter().map(|g| g.generation).sum();
    assert_relative_eq!(summed, analysis.total_generation, epsilon = 1e-6);
}

#[test]
fn orientation_only_reduces_yield() {
    let series = common::synthetic(30, 8);
    let tariff = presets::preset("octopus_go").unwrap();
    let yield_of = |orientation| {
        let config = SolarConfig {
            orientation,
            ..SolarConfig::default()
        };
        simulate_solar(&series, &config, &tariff, 0.15).total_generation
    };

    let south = yield_of(Orientation::South);
    assert!(south > 0.0);
    assert!(yield_of(Orientation::SouthEast) < south);
    assert!(yield_of(Orientation::North) < yield_of(Orientation::East));
}

#[test]
fn solar_flows_close_and_rates_stay_in_unit_range() {
    let series = common::synthetic(60, 13);
    let tariff = presets::preset("cosy_octopus").unwrap();
    let analysis = simulate_solar(&series, &SolarConfig::default(), &tariff, 0.15);

    assert_relative_eq!(
        analysis.total_self_consumed + analysis.total_exported,
        analysis.total_generation,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        analysis.total_self_consumed + analysis.total_grid_import,
        analysis.total_consumption,
        epsilon = 1e-6
    );
    assert!((0.0..=1.0).contains(&analysis.self_consumption_rate));
    assert!((0.0..=1.0).contains(&analysis.self_sufficiency_rate));
    assert_relative_eq!(analysis.export_earnings, analysis.total_exported * 0.15, epsilon = 1e-6);
}

#[test]
fn battery_raises_self_sufficiency_over_solar_alone() {
    let series = common::synthetic(90, 21);
    let scenario = ScenarioConfig::solar_battery();
    let tariff = scenario.build_tariff().unwrap();
    let solar = scenario.solar.clone().unwrap();
    let battery = scenario.battery.clone().unwrap();
    let export_rate = scenario.export_rate(&tariff);

    let alone = simulate_solar(&series, &solar, &tariff, export_rate);
    let combined = simulate_solar_with_battery(&series, &solar, &battery, &tariff, export_rate);

    assert_relative_eq!(combined.total_generation, alone.total_generation, epsilon = 1e-9);
    assert!(combined.self_sufficiency_rate >= alone.self_sufficiency_rate);
    assert!(combined.total_exported <= alone.total_exported + 1e-9);
    assert_relative_eq!(
        combined.system_cost,
        solar.system_cost() + battery.system_cost(),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        combined.total_savings,
        combined.import_savings + combined.export_earnings - combined.grid_charging_cost,
        epsilon = 1e-9
    );
}

#[test]
fn combined_soc_stays_in_bounds_and_grid_charges_only_when_cheap() {
    let series = common::synthetic(30, 17);
    let tariff = presets::preset("octopus_flux").unwrap();
    let battery = BatteryConfig::default();
    let analysis =
        simulate_solar_with_battery(&series, &SolarConfig::default(), &battery, &tariff, 0.15);

    for state in &analysis.timeline {
        assert!(state.soc_kwh >= battery.min_soc_kwh() - 1e-9);
        assert!(state.soc_kwh <= battery.max_soc_kwh() + 1e-9);
        if state.grid_to_battery > 0.0 {
            assert_eq!(state.period_id, "flux_cheap");
            assert_eq!(state.solar_to_battery, 0.0);
            assert_eq!(state.battery_to_load, 0.0);
        }
        if state.battery_to_load > 0.0 {
            assert_ne!(state.period_id, "flux_cheap");
        }
    }
}

#[test]
fn solar_recommendation_covers_most_consumption() {
    let series = common::synthetic(365, 42);
    let rec = recommend_solar_size(&series).unwrap();

    assert!((1.0..=10.0).contains(&rec.capacity_kwp));
    assert_eq!((rec.capacity_kwp * 2.0).fract(), 0.0);
    assert!(f64::from(rec.panel_count) * 0.4 >= rec.capacity_kwp - 1e-9);
    assert_relative_eq!(rec.expected_annual_generation, rec.capacity_kwp * 900.0);
    assert_relative_eq!(rec.estimated_cost, rec.capacity_kwp * 1200.0);
}
