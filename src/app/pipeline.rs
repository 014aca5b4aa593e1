//! Shared report pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dashboard fetch -> table -> chart file, per metric
//!
//! The CLI can then focus on presentation (progress marks and the summary).
//! Stage order mirrors the report flow: prepare the stats directory, fetch
//! every metric, prepare the graphs directory, then transform and render.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::data::DashboardClient;
use crate::domain::{FetchOutcome, Metric, ReportConfig, SeriesTable};
use crate::error::AppError;
use crate::io;
use crate::plot::{self, ChartSpec};
use crate::report::Progress;

/// All outputs of a single `covid report` run.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// One outcome per requested metric, in fetch order.
    pub outcomes: Vec<FetchOutcome>,
    /// Chart files written, in render order.
    pub charts: Vec<PathBuf>,
}

impl ReportOutput {
    pub fn failures(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes.iter().filter(|o| o.is_missing())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Execute the full report pipeline: fetch every metric, then render.
pub fn run_report(config: &ReportConfig, progress: &Progress) -> Result<ReportOutput, AppError> {
    prepare_dir(&config.stats_dir, "stats", progress)?;

    let client = DashboardClient::from_env(&config.area_type, &config.area_name);
    let mut outcomes = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        progress.begin(&format!("Downloading COVID-19 daily {metric}"));
        let outcome = fetch_outcome(&client, metric);
        if outcome.is_missing() {
            progress.fail();
        } else {
            progress.ok();
        }
        outcomes.push(outcome);
    }

    run_report_with_outcomes(config, outcomes, progress)
}

/// Execute the transform/render stages with pre-fetched outcomes.
///
/// This is what the tests drive: everything downstream of the network is
/// covered without a live dashboard.
pub fn run_report_with_outcomes(
    config: &ReportConfig,
    outcomes: Vec<FetchOutcome>,
    progress: &Progress,
) -> Result<ReportOutput, AppError> {
    prepare_dir(&config.graphs_dir, "graphs", progress)?;

    let run_date = Local::now().date_naive();
    let charts = render_all(config, &outcomes, run_date)?;

    Ok(ReportOutput { outcomes, charts })
}

/// Fetch one metric, folding every failure mode into a `FetchOutcome`.
///
/// A non-200 status has already been reported by the client at this point;
/// transport and decode errors carry their message into the outcome.
pub fn fetch_outcome(client: &DashboardClient, metric: Metric) -> FetchOutcome {
    match client.fetch_series(metric) {
        Ok(Some(series)) => FetchOutcome::Fetched(series),
        Ok(None) => FetchOutcome::Missing {
            metric,
            reason: "dashboard returned a non-200 status".to_string(),
        },
        Err(e) => FetchOutcome::Missing {
            metric,
            reason: e.to_string(),
        },
    }
}

fn prepare_dir(path: &Path, label: &str, progress: &Progress) -> Result<(), AppError> {
    progress.begin(&format!("Checking if '{label}' folder is present"));
    match io::ensure_dir(path) {
        // The cross mark means "was not present" (it gets created anyway),
        // matching the check-then-create reporting of each run.
        Ok(created) => {
            if created {
                progress.fail();
            } else {
                progress.ok();
            }
            Ok(())
        }
        Err(e) => {
            progress.fail();
            Err(e)
        }
    }
}

/// Render one chart per fetched metric; missing metrics are skipped here and
/// surfaced by the caller from the outcome list.
fn render_all(
    config: &ReportConfig,
    outcomes: &[FetchOutcome],
    run_date: NaiveDate,
) -> Result<Vec<PathBuf>, AppError> {
    let mut charts = Vec::new();
    for outcome in outcomes {
        let FetchOutcome::Fetched(series) = outcome else {
            continue;
        };

        if config.export_stats {
            io::ensure_dir(&config.stats_dir)?;
            io::write_series_csv(&config.stats_dir, series, run_date)?;
        }

        let table = SeriesTable::from_series(series)?;
        let spec = ChartSpec {
            title: series.metric.chart_title(&config.area_name),
            y_label: series.metric.category_label().to_string(),
            out_path: config
                .graphs_dir
                .join(format!("{}.svg", series.metric.daily_file_stem(run_date))),
        };
        plot::render_chart(&table, &spec)?;
        charts.push(spec.out_path);
    }
    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MetricSeries;

    fn config(root: &Path, export_stats: bool) -> ReportConfig {
        ReportConfig {
            area_type: "nation".to_string(),
            area_name: "England".to_string(),
            graphs_dir: root.join("graphs"),
            stats_dir: root.join("stats"),
            export_stats,
        }
    }

    fn cases_series(days: u64) -> MetricSeries {
        let points = (1..=days)
            .map(|d| (format!("2021-01-{d:02}"), d * 5))
            .collect();
        MetricSeries::new(Metric::Cases, points)
    }

    #[test]
    fn renders_fetched_metrics_and_records_missing_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), false);
        let outcomes = vec![
            FetchOutcome::Fetched(cases_series(20)),
            FetchOutcome::Missing {
                metric: Metric::Deaths,
                reason: "request timed out".to_string(),
            },
        ];

        let output =
            run_report_with_outcomes(&config, outcomes, &Progress::quiet()).unwrap();

        assert_eq!(output.charts.len(), 1);
        assert_eq!(output.failure_count(), 1);

        let expected = format!(
            "cases_daily_{}.svg",
            Local::now().date_naive().format("%d-%m-%Y")
        );
        assert_eq!(
            output.charts[0].file_name().unwrap().to_str().unwrap(),
            expected
        );
        assert!(output.charts[0].is_file());

        // The stats directory stays untouched without --export-stats.
        assert!(!config.stats_dir.join("any").exists());
    }

    #[test]
    fn export_stats_writes_csv_alongside_charts() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), true);
        let outcomes = vec![FetchOutcome::Fetched(cases_series(5))];

        let output =
            run_report_with_outcomes(&config, outcomes, &Progress::quiet()).unwrap();

        assert_eq!(output.charts.len(), 1);
        let expected = format!(
            "cases_daily_{}.csv",
            Local::now().date_naive().format("%d-%m-%Y")
        );
        let csv = config.stats_dir.join(expected);
        assert!(csv.is_file());

        let contents = std::fs::read_to_string(csv).unwrap();
        assert!(contents.starts_with("date,newCasesBySpecimenDate\n"));
        assert!(contents.contains("2021-01-01,5\n"));
    }

    #[test]
    fn rerun_on_the_same_day_overwrites_the_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), false);

        for _ in 0..2 {
            let outcomes = vec![FetchOutcome::Fetched(cases_series(10))];
            run_report_with_outcomes(&config, outcomes, &Progress::quiet()).unwrap();
        }

        let entries: Vec<_> = std::fs::read_dir(&config.graphs_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn malformed_date_in_a_fetched_series_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), false);
        let series = MetricSeries::new(
            Metric::Cases,
            vec![("garbage".to_string(), 1)],
        );
        let outcomes = vec![FetchOutcome::Fetched(series)];

        let err =
            run_report_with_outcomes(&config, outcomes, &Progress::quiet()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
