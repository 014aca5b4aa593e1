//! Formatted terminal output for completed runs.

use crate::app::pipeline::ReportOutput;
use crate::domain::{FetchOutcome, MetricSeries, ReportConfig};

/// Format the run summary: area, chart files written, fetch failures.
///
/// The failure list is part of the summary on purpose: the fetch stage
/// records failures instead of aborting, and this is where they surface.
pub fn format_run_summary(config: &ReportConfig, output: &ReportOutput) -> String {
    let mut out = String::new();

    out.push_str("=== covid - daily chart report ===\n");
    out.push_str(&format!(
        "Area: {} ({})\n",
        config.area_name, config.area_type
    ));

    out.push_str(&format!("Charts written: {}\n", output.charts.len()));
    for path in &output.charts {
        out.push_str(&format!("- {}\n", path.display()));
    }

    let failures: Vec<&FetchOutcome> = output.failures().collect();
    out.push_str(&format!("Fetch failures: {}\n", failures.len()));
    for outcome in failures {
        if let FetchOutcome::Missing { metric, reason } = outcome {
            out.push_str(&format!("- {metric}: {reason}\n"));
        }
    }

    out
}

/// Format a series as `date,count` CSV (header + rows, series order).
pub fn format_series_csv(series: &MetricSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("date,{}\n", series.metric.api_field()));
    for (date, count) in &series.points {
        out.push_str(&format!("{date},{count}\n"));
    }
    out
}
