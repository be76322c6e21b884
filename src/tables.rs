//! Terminal tables.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::series::AggregatedBucket;

/// Renders aggregated buckets, highlighting those above the mean total.
pub fn build_buckets_table(buckets: &[AggregatedBucket]) -> Table {
    let mean_total = if buckets.is_empty() {
        0.0
    } else {
        buckets.iter().map(|b| b.total_consumption).sum::<f64>() / buckets.len() as f64
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["Period", "Total kWh", "Average kWh", "Peak kWh", "Peak at", "Readings"]);
    for bucket in buckets {
        table.add_row(vec![
            Cell::new(&bucket.period),
            Cell::new(format!("{:.2}", bucket.total_consumption))
                .set_alignment(CellAlignment::Right)
                .fg(if bucket.total_consumption > mean_total {
                    Color::Red
                } else {
                    Color::Green
                }),
            Cell::new(format!("{:.3}", bucket.average_consumption))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", bucket.peak_consumption))
                .set_alignment(CellAlignment::Right),
            Cell::new(bucket.peak_time.format("%Y-%m-%d %H:%M")).add_attribute(Attribute::Dim),
            Cell::new(bucket.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::series::{ConsumptionInterval, TimeFrame, aggregate_by_time_frame};

    #[test]
    fn one_row_per_bucket() {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let series: Vec<ConsumptionInterval> = (0..96)
            .map(|k| {
                let s = t0 + TimeDelta::minutes(30 * k);
                ConsumptionInterval::new(0.5, s, s + TimeDelta::minutes(30))
            })
            .collect();
        let table = build_buckets_table(&aggregate_by_time_frame(&series, TimeFrame::Day));
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("2024-01-02"));
        assert!(rendered.contains("24.00"));
    }
}
