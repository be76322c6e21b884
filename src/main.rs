//! Tariff simulator entry point: loads consumption and a scenario, runs it and prints the report.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{Level, info, warn};

use tariff_sim::cli::Args;
use tariff_sim::config::ScenarioConfig;
use tariff_sim::io::export::{export_to_path, write_buckets};
use tariff_sim::io::import::read_consumption_file;
use tariff_sim::report::Simulation;
use tariff_sim::runner::{run_scenario, synthetic_series};
use tariff_sim::series::{ConsumptionInterval, aggregate_by_time_frame};
use tariff_sim::tables::build_buckets_table;

fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(tariff) = &args.tariff {
        scenario.tariff.preset.clone_from(tariff);
        scenario.tariff.periods.clear();
    }
    if let Some(days) = args.input.synthetic_days {
        scenario.profile.days = days;
    }
    if let Some(seed) = args.input.seed {
        scenario.profile.seed = seed;
    }
    Ok(scenario)
}

fn load_series(args: &Args, scenario: &ScenarioConfig) -> Result<Vec<ConsumptionInterval>> {
    let Some(path) = &args.input.consumption else {
        info!(
            days = scenario.profile.days,
            seed = scenario.profile.seed,
            "generating synthetic consumption"
        );
        return Ok(synthetic_series(&scenario.profile));
    };

    let parsed = read_consumption_file(path)
        .with_context(|| format!("failed to import {}", path.display()))?;
    for error in &parsed.errors {
        warn!(line = error.line, reason = %error.message, "rejected row");
    }
    if parsed.intervals.is_empty() {
        bail!("{} contains no valid readings", path.display());
    }
    Ok(parsed.intervals)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).without_time().compact().init();

    let scenario = load_scenario(&args)?;
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }

    let series = load_series(&args, &scenario)?;
    let report = run_scenario(&series, &scenario)?;
    let buckets = aggregate_by_time_frame(&series, args.frame);

    println!("{}", build_buckets_table(&buckets));
    println!("\n{report}");

    if let Some(path) = &args.timeline_out {
        if report.simulation == Simulation::TariffOnly {
            warn!("no battery or solar configured, skipping timeline export");
        } else {
            export_to_path(path, |w| report.simulation.write_timeline(w).map(|_| ()))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "timeline written");
        }
    }

    if let Some(path) = &args.buckets_out {
        export_to_path(path, |w| write_buckets(&buckets, w))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), frame = %args.frame, "buckets written");
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(tariff_sim::api::AppState { series, report });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(tariff_sim::api::serve(state, addr))?;
    }

    Ok(())
}
