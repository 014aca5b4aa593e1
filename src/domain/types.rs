//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built once by the fetch stage and passed forward unchanged
//! - converted to tables/charts without extra bookkeeping
//! - printed or exported as CSV

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Date format used by the dashboard API (`2021-01-01`).
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// The two daily metrics tracked by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Daily new cases by specimen date.
    Cases,
    /// Daily deaths (NSO) by death date.
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Cases, Metric::Deaths];

    /// Field name used by the dashboard API, both as the `metric` query
    /// parameter and as the per-record value key in the response body.
    pub fn api_field(&self) -> &'static str {
        match self {
            Metric::Cases => "newCasesBySpecimenDate",
            Metric::Deaths => "newDailyNsoDeathsByDeathDate",
        }
    }

    /// Short series-kind slug used in output file names (`cases_daily_...`).
    pub fn slug(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
        }
    }

    /// Human-readable category, used in chart titles and y-axis labels.
    pub fn category_label(&self) -> &'static str {
        match self {
            Metric::Cases => "Cases",
            Metric::Deaths => "Deaths",
        }
    }

    /// Chart title for a given area, e.g. `England COVID-19 Cases by Date`.
    pub fn chart_title(&self, area_name: &str) -> String {
        format!("{area_name} COVID-19 {} by Date", self.category_label())
    }

    /// Output file stem for a run date, e.g. `cases_daily_06-08-2026`.
    ///
    /// The name is date-of-run based, so re-runs on the same day produce the
    /// same name and overwrite prior output.
    pub fn daily_file_stem(&self, run_date: NaiveDate) -> String {
        format!("{}_daily_{}", self.slug(), run_date.format("%d-%m-%Y"))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// One fetched time series: date string -> daily count, in API response order.
///
/// Dates are unique within a series (a property of the dashboard data, not
/// enforced here) and counts are non-negative.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub metric: Metric,
    pub points: Vec<(String, u64)>,
}

impl MetricSeries {
    pub fn new(metric: Metric, points: Vec<(String, u64)>) -> Self {
        Self { metric, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Two-column (date, count) table with the date column parsed.
///
/// Row order equals the input series' order; nothing is sorted, filtered,
/// or deduplicated on the way in.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    pub metric: Metric,
    pub rows: Vec<(NaiveDate, u64)>,
}

impl SeriesTable {
    /// Convert a fetched series into a table by parsing the date column.
    ///
    /// A malformed date is an error; the pipeline has no use for a row it
    /// cannot place on the x-axis.
    pub fn from_series(series: &MetricSeries) -> Result<Self, AppError> {
        let mut rows = Vec::with_capacity(series.points.len());
        for (raw_date, count) in &series.points {
            let date = NaiveDate::parse_from_str(raw_date, API_DATE_FORMAT).map_err(|e| {
                AppError::new(
                    4,
                    format!("Invalid date '{raw_date}' in {} series: {e}", series.metric),
                )
            })?;
            rows.push((date, *count));
        }
        Ok(Self {
            metric: series.metric,
            rows,
        })
    }
}

/// Result of fetching one metric.
///
/// The fetch stage never aborts the run: a failed metric is carried forward
/// as `Missing` and the caller decides how to aggregate and report it.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(MetricSeries),
    Missing { metric: Metric, reason: String },
}

impl FetchOutcome {
    pub fn metric(&self) -> Metric {
        match self {
            FetchOutcome::Fetched(series) => series.metric,
            FetchOutcome::Missing { metric, .. } => *metric,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FetchOutcome::Missing { .. })
    }

    /// The explicit "is there data?" check for downstream stages.
    pub fn require_series(&self) -> Result<&MetricSeries, AppError> {
        match self {
            FetchOutcome::Fetched(series) => Ok(series),
            FetchOutcome::Missing { metric, reason } => Err(AppError::new(
                4,
                format!("No data for metric {metric}: {reason}"),
            )),
        }
    }
}

/// Configuration for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Dashboard `areaType` query parameter.
    pub area_type: String,
    /// Dashboard `areaName` query parameter; also used in chart titles.
    pub area_name: String,
    /// Directory the chart files are written to.
    pub graphs_dir: PathBuf,
    /// Directory reserved for raw series exports.
    pub stats_dir: PathBuf,
    /// Write fetched series as CSV into `stats_dir`.
    pub export_stats: bool,
}
