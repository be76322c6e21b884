/// Tariff-arbitrage battery dispatch.
pub mod battery;
/// Solar plus battery dispatch.
pub mod combined;
pub mod economics;
/// Battery and solar sizing advisors.
pub mod recommend;
/// Solar-only self-consumption.
pub mod solar;
pub mod types;

pub use battery::simulate_battery;
pub use combined::simulate_solar_with_battery;
pub use recommend::{
    BatteryRecommendation, SolarRecommendation, recommend_battery_size, recommend_solar_size,
};
pub use solar::simulate_solar;
pub use types::{
    BatteryAction, BatteryAnalysis, BatteryState, CombinedAnalysis, CombinedState, DayCoverage,
    SolarAnalysis, SolarGeneration,
};
