//! Time-of-use tariffs: rate periods, matching, costing and presets.

pub mod cost;
pub mod presets;
pub mod rate;

pub use cost::{
    PeriodCost, calculate_annual_cost, calculate_average_cost_per_kwh, calculate_cost_breakdown,
    calculate_total_cost,
};
pub use rate::{RatePeriod, Tariff, TimeOfDay, match_rate_period};
