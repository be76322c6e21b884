//! Cost heuristics and payback arithmetic shared by the simulators.

/// Installed cost assumed per kWh of battery capacity when none is configured.
pub const DEFAULT_BATTERY_COST_PER_KWH: f64 = 500.0;

/// Installed cost assumed per kWp of solar capacity when none is configured.
pub const DEFAULT_SOLAR_COST_PER_KWP: f64 = 1200.0;

/// Fraction of the peak interval's consumption assumed to be shaved by a battery.
pub const PEAK_SHAVING_FACTOR: f64 = 0.2;

const DAYS_PER_YEAR: f64 = 365.0;

/// Scales a total observed over `days` to a full year; 0 when `days` is not positive.
pub fn annualize(total: f64, days: f64) -> f64 {
    if days > 0.0 {
        total / days * DAYS_PER_YEAR
    } else {
        0.0
    }
}

/// Years until `annual_savings` repay `system_cost`.
///
/// Returns `f64::INFINITY` when the system never pays back.
pub fn payback_years(system_cost: f64, annual_savings: f64) -> f64 {
    if annual_savings > 0.0 {
        system_cost / annual_savings
    } else {
        f64::INFINITY
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
