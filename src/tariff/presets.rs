//! Built-in tariff presets.
//!
//! Prices are indicative UK domestic rates (GBP per kWh) and are meant as
//! starting points for scenarios, not live quotes.

use super::rate::{RatePeriod, Tariff};

/// Available preset ids, in catalog order.
pub const PRESET_IDS: &[&str] = &[
    "flat",
    "economy_7",
    "octopus_go",
    "intelligent_octopus_go",
    "octopus_flux",
    "cosy_octopus",
];

/// Returns every preset tariff.
pub fn presets() -> Vec<Tariff> {
    PRESET_IDS.iter().filter_map(|id| preset(id)).collect()
}

/// Looks up a preset by id.
pub fn preset(id: &str) -> Option<Tariff> {
    let (name, periods, standing, export) = match id {
        "flat" => (
            "Flat rate",
            vec![RatePeriod::new("flat", "All day", "00:00", "00:00", 0.245)],
            0.60,
            0.15,
        ),
        "economy_7" => (
            "Economy 7",
            vec![
                RatePeriod::new("night", "Night", "00:00", "07:00", 0.135),
                RatePeriod::new("day", "Day", "07:00", "00:00", 0.285),
            ],
            0.58,
            0.15,
        ),
        "octopus_go" => (
            "Octopus Go",
            vec![
                RatePeriod::new("go", "Go", "00:30", "05:30", 0.085),
                RatePeriod::new("standard", "Standard", "05:30", "00:30", 0.27),
            ],
            0.55,
            0.15,
        ),
        "intelligent_octopus_go" => (
            "Intelligent Octopus Go",
            vec![
                RatePeriod::new("off_peak", "Off-peak", "23:30", "05:30", 0.07),
                RatePeriod::new("standard", "Standard", "05:30", "23:30", 0.30),
            ],
            0.55,
            0.15,
        ),
        "octopus_flux" => (
            "Octopus Flux",
            vec![
                RatePeriod::new("flux_cheap", "Night", "02:00", "05:00", 0.17),
                RatePeriod::new("flux_peak", "Peak", "16:00", "19:00", 0.39),
                RatePeriod::new("flux_day_am", "Day", "05:00", "16:00", 0.28),
                RatePeriod::new("flux_day_pm", "Day", "19:00", "02:00", 0.28),
            ],
            0.55,
            0.25,
        ),
        "cosy_octopus" => (
            "Cosy Octopus",
            vec![
                RatePeriod::new("cosy_early", "Cosy", "04:00", "07:00", 0.14),
                RatePeriod::new("cosy_afternoon", "Cosy", "13:00", "16:00", 0.14),
                RatePeriod::new("cosy_late", "Cosy", "22:00", "00:00", 0.14),
                RatePeriod::new("peak", "Peak", "16:00", "19:00", 0.41),
                RatePeriod::new("standard_night", "Standard", "00:00", "04:00", 0.27),
                RatePeriod::new("standard_morning", "Standard", "07:00", "13:00", 0.27),
                RatePeriod::new("standard_evening", "Standard", "19:00", "22:00", 0.27),
            ],
            0.55,
            0.15,
        ),
        _ => return None,
    };

    Tariff::new(id, name, periods)
        .ok()
        .map(|t| t.with_standing_charge(standing).with_export_rate(export))
}
