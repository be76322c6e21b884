//! Consumption CSV import with row-level error reporting.
//!
//! Expected columns (header names are matched case- and
//! whitespace-insensitively, in any order):
//!
//! ```text
//! Consumption (kWh), Start, End
//! 0.245, 2024-01-01T00:00:00Z, 2024-01-01T00:30:00Z
//! ```
//!
//! Timestamps may be RFC 3339 (the wall-clock time is kept, the offset is
//! dropped) or `yyyy-MM-dd HH:mm[:ss]`.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::series::ConsumptionInterval;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A rejected data row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based line number in the input.
    pub line: u64,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of importing a consumption file: accepted intervals sorted by
/// start, plus every rejected row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConsumption {
    pub intervals: Vec<ConsumptionInterval>,
    pub errors: Vec<RowError>,
}

/// File-level import failure.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be opened or is not valid CSV.
    #[error("cannot read consumption CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A required column is absent from the header row.
    #[error("missing column \"{0}\"")]
    MissingColumn(&'static str),
}

struct Columns {
    consumption: usize,
    start: usize,
    end: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ImportError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase())
            .collect();
        let find = |names: &[&str], label: &'static str| {
            normalized
                .iter()
                .position(|h| names.contains(&h.as_str()))
                .ok_or(ImportError::MissingColumn(label))
        };
        Ok(Self {
            consumption: find(&["consumption(kwh)", "consumption"], "Consumption (kWh)")?,
            start: find(&["start"], "Start")?,
            end: find(&["end"], "End")?,
        })
    }
}

/// Parses a timestamp in any accepted format.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<ConsumptionInterval, String> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let raw = field(columns.consumption);
    let consumption: f64 = raw
        .parse()
        .map_err(|_| format!("invalid consumption \"{raw}\""))?;
    if !consumption.is_finite() || consumption < 0.0 {
        return Err(format!("consumption must be a non-negative number, got {raw}"));
    }

    let start_raw = field(columns.start);
    let start = parse_timestamp(start_raw).ok_or_else(|| format!("invalid start \"{start_raw}\""))?;
    let end_raw = field(columns.end);
    let end = parse_timestamp(end_raw).ok_or_else(|| format!("invalid end \"{end_raw}\""))?;
    if end <= start {
        return Err(format!("end {end} is not after start {start}"));
    }

    Ok(ConsumptionInterval::new(consumption, start, end))
}

/// Parses consumption readings from CSV.
///
/// Bad rows are reported in [`ParsedConsumption::errors`] and skipped;
/// parsing continues with the next row.
///
/// # Errors
///
/// Returns an `ImportError` if the header row cannot be read or lacks a
/// required column.
pub fn parse_consumption_csv(reader: impl Read) -> Result<ParsedConsumption, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut parsed = ParsedConsumption::default();
    for (index, result) in rdr.records().enumerate() {
        // header is line 1
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                parsed.errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());

        match parse_row(&record, &columns) {
            Ok(interval) => parsed.intervals.push(interval),
            Err(message) => {
                debug!(line, reason = %message, "skipping consumption row");
                parsed.errors.push(RowError { line, message });
            }
        }
    }

    parsed.intervals.sort_by_key(|i| i.start);
    info!(
        intervals = parsed.intervals.len(),
        rejected = parsed.errors.len(),
        "imported consumption"
    );
    Ok(parsed)
}

/// Opens and parses a consumption CSV file.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be opened or its header is invalid.
pub fn read_consumption_file(path: &Path) -> Result<ParsedConsumption, ImportError> {
    let file = File::open(path).map_err(|e| ImportError::Csv(csv::Error::from(e)))?;
    parse_consumption_csv(file)
}
