//! CSV export for simulated timelines and aggregated buckets.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::series::AggregatedBucket;
use crate::sim::types::{BatteryState, CombinedState, SolarGeneration};

const BATTERY_HEADER: &[&str] = &[
    "timestamp",
    "period",
    "action",
    "power_kw",
    "energy_kwh",
    "soc_kwh",
    "soc_percent",
    "savings",
];

const SOLAR_HEADER: &[&str] = &[
    "timestamp",
    "period",
    "consumption_kwh",
    "generation_kwh",
    "self_consumed_kwh",
    "exported_kwh",
    "grid_import_kwh",
    "import_savings",
    "export_earnings",
];

const COMBINED_HEADER: &[&str] = &[
    "timestamp",
    "period",
    "consumption_kwh",
    "generation_kwh",
    "solar_to_load_kwh",
    "solar_to_battery_kwh",
    "battery_to_load_kwh",
    "grid_to_battery_kwh",
    "grid_import_kwh",
    "exported_kwh",
    "soc_kwh",
    "soc_percent",
    "savings",
];

const BUCKET_HEADER: &[&str] = &[
    "period",
    "start",
    "end",
    "total_kwh",
    "average_kwh",
    "peak_kwh",
    "peak_time",
    "count",
];

fn timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Creates `path` and hands a buffered writer to `write`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_to_path<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(io::BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path)?;
    write(io::BufWriter::new(file))
}

/// Writes a battery dispatch timeline, one row per interval.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_battery_timeline(timeline: &[BatteryState], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BATTERY_HEADER)?;

    for s in timeline {
        wtr.write_record(&[
            timestamp(&s.timestamp),
            s.period_id.clone(),
            s.action.to_string(),
            format!("{:.4}", s.power_kw),
            format!("{:.4}", s.energy_kwh),
            format!("{:.4}", s.soc_kwh),
            format!("{:.2}", s.soc_percent),
            format!("{:.4}", s.savings),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a solar-only timeline, one row per interval.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_solar_timeline(timeline: &[SolarGeneration], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SOLAR_HEADER)?;

    for g in timeline {
        wtr.write_record(&[
            timestamp(&g.timestamp),
            g.period_id.clone(),
            format!("{:.4}", g.consumption),
            format!("{:.4}", g.generation),
            format!("{:.4}", g.self_consumed),
            format!("{:.4}", g.exported),
            format!("{:.4}", g.grid_import),
            format!("{:.4}", g.import_savings),
            format!("{:.4}", g.export_earnings),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a combined solar-plus-battery timeline, one row per interval.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_combined_timeline(timeline: &[CombinedState], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(COMBINED_HEADER)?;

    for s in timeline {
        wtr.write_record(&[
            timestamp(&s.timestamp),
            s.period_id.clone(),
            format!("{:.4}", s.consumption),
            format!("{:.4}", s.generation),
            format!("{:.4}", s.solar_to_load),
            format!("{:.4}", s.solar_to_battery),
            format!("{:.4}", s.battery_to_load),
            format!("{:.4}", s.grid_to_battery),
            format!("{:.4}", s.grid_import),
            format!("{:.4}", s.exported),
            format!("{:.4}", s.soc_kwh),
            format!("{:.2}", s.soc_percent),
            format!("{:.4}", s.savings),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes aggregated buckets, one row per calendar period.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_buckets(buckets: &[AggregatedBucket], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BUCKET_HEADER)?;

    for b in buckets {
        wtr.write_record(&[
            b.period.clone(),
            timestamp(&b.start),
            timestamp(&b.end),
            format!("{:.4}", b.total_consumption),
            format!("{:.4}", b.average_consumption),
            format!("{:.4}", b.peak_consumption),
            timestamp(&b.peak_time),
            b.count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
