//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};

use crate::series::TimeFrame;

#[derive(Parser, Debug)]
#[command(author, version, about = "Time-of-use tariff, battery and solar simulator")]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Scenario TOML file.
    #[clap(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in scenario preset (baseline, tariff_only, solar_only, solar_battery).
    #[clap(long)]
    pub preset: Option<String>,

    /// Tariff preset id overriding the scenario's tariff.
    #[clap(long)]
    pub tariff: Option<String>,

    /// Calendar period for the consumption table.
    #[clap(long, default_value = "month", value_parser = parse_frame)]
    pub frame: TimeFrame,

    /// Write the simulated timeline to this CSV file.
    #[clap(long)]
    pub timeline_out: Option<PathBuf>,

    /// Write the aggregated buckets to this CSV file.
    #[clap(long)]
    pub buckets_out: Option<PathBuf>,

    /// Serve the report over HTTP after the run.
    #[cfg(feature = "api")]
    #[clap(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[clap(long, default_value_t = 3000)]
    pub port: u16,

    /// Log at debug level.
    #[clap(long, short)]
    pub verbose: bool,
}

/// Where the consumption series comes from.
#[derive(ClapArgs, Debug)]
pub struct InputArgs {
    /// Consumption CSV with `Consumption (kWh), Start, End` columns.
    #[clap(long, conflicts_with = "synthetic_days")]
    pub consumption: Option<PathBuf>,

    /// Generate this many days of synthetic consumption instead.
    #[clap(long)]
    pub synthetic_days: Option<usize>,

    /// Seed for the synthetic generator.
    #[clap(long)]
    pub seed: Option<u64>,
}

fn parse_frame(s: &str) -> Result<TimeFrame, String> {
    s.parse()
}
