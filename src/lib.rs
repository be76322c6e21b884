//! Time-of-use tariff, battery and solar consumption simulator.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
/// TOML scenario configuration and presets.
pub mod config;
/// Battery and solar device models.
pub mod devices;
/// CSV import and export.
pub mod io;
pub mod report;
pub mod runner;
/// Consumption series, aggregation and statistics.
pub mod series;
/// Dispatch simulators and sizing advisors.
pub mod sim;
pub mod tables;
/// Tariffs, rate matching and costing.
pub mod tariff;
