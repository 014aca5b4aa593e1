//! Plotters-powered daily line chart with moving-average overlays.
//!
//! Why Plotters?
//! - nicer axis + mesh rendering than hand-rolled SVG
//! - less manual work for ticks/labels
//! - easy to extend later (more overlays, annotations, other backends, etc.)
//!
//! The SVG backend keeps the crate free of native font/bitmap dependencies
//! and handles the large canvas cheaply.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::domain::SeriesTable;
use crate::error::AppError;
use crate::math::moving_average;

/// Canvas: 25in x 6in at 1000 dpi.
const CHART_WIDTH_PX: u32 = 25_000;
const CHART_HEIGHT_PX: u32 = 6_000;

/// X-axis tick spacing in days.
const DATE_BREAK_DAYS: i64 = 21;

/// Smoothing windows (days).
const SHORT_WINDOW: usize = 3;
const LONG_WINDOW: usize = 7;

const SHORT_WINDOW_COLOR: RGBColor = RGBColor(0, 255, 255); // cyan
const LONG_WINDOW_COLOR: RGBColor = RGBColor(0, 0, 255); // blue
const GRID_COLOR: RGBColor = RGBColor(235, 235, 235);

/// Stroke widths scaled for the high-resolution canvas.
const RAW_STROKE: u32 = 6;
const SMOOTH_STROKE: u32 = 10;

/// Everything the renderer needs besides the data itself.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub y_label: String,
    pub out_path: PathBuf,
}

/// Render one series table as a line chart and write it to `spec.out_path`.
///
/// Writes exactly one file per call, silently replacing an existing file of
/// the same name. Any drawing or save failure is fatal to the run.
pub fn render_chart(table: &SeriesTable, spec: &ChartSpec) -> Result<(), AppError> {
    if table.rows.is_empty() {
        return Err(AppError::new(
            4,
            format!("No rows to plot for {} series.", table.metric),
        ));
    }

    let dates: Vec<NaiveDate> = table.rows.iter().map(|(d, _)| *d).collect();
    let values: Vec<f64> = table.rows.iter().map(|(_, v)| *v as f64).collect();

    let mut x_min = dates[0];
    let mut x_max = dates[0];
    for d in &dates {
        x_min = x_min.min(*d);
        x_max = x_max.max(*d);
    }
    // A single-date series still needs a non-degenerate axis.
    if x_min == x_max {
        x_max = x_max + Duration::days(1);
    }

    let y_peak = values.iter().copied().fold(0.0, f64::max);
    let y_upper = if y_peak > 0.0 { y_peak * 1.05 } else { 1.0 };

    let span_days = (x_max - x_min).num_days();
    let x_label_count = (span_days / DATE_BREAK_DAYS).max(1) as usize + 1;

    let root =
        SVGBackend::new(&spec.out_path, (CHART_WIDTH_PX, CHART_HEIGHT_PX)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(&spec.out_path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 160))
        .margin(60)
        .set_label_area_size(LabelAreaPosition::Left, 340)
        .set_label_area_size(LabelAreaPosition::Bottom, 440)
        .build_cartesian_2d(x_min..x_max, 0f64..y_upper)
        .map_err(|e| draw_err(&spec.out_path, e))?;

    chart
        .configure_mesh()
        .light_line_style(&GRID_COLOR)
        .bold_line_style(&GRID_COLOR)
        .x_labels(x_label_count)
        .x_desc("Date")
        .y_desc(&spec.y_label)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_label_style(
            ("sans-serif", 80)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_style(("sans-serif", 80))
        .axis_desc_style(("sans-serif", 110))
        .draw()
        .map_err(|e| draw_err(&spec.out_path, e))?;

    // Raw daily counts.
    chart
        .draw_series(LineSeries::new(
            dates.iter().copied().zip(values.iter().copied()),
            BLACK.stroke_width(RAW_STROKE),
        ))
        .map_err(|e| draw_err(&spec.out_path, e))?;

    // Smoothing overlays. Each window-w average lines up with the input
    // starting at index w-1.
    let short = moving_average(&values, SHORT_WINDOW);
    let has_legend = !short.is_empty();
    if has_legend {
        chart
            .draw_series(LineSeries::new(
                dates[SHORT_WINDOW - 1..].iter().copied().zip(short),
                SHORT_WINDOW_COLOR.stroke_width(SMOOTH_STROKE),
            ))
            .map_err(|e| draw_err(&spec.out_path, e))?
            .label(format!("{SHORT_WINDOW}-day moving average"))
            .legend(|(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 80, y)],
                    SHORT_WINDOW_COLOR.stroke_width(SMOOTH_STROKE),
                )
            });
    }

    let long = moving_average(&values, LONG_WINDOW);
    if !long.is_empty() {
        chart
            .draw_series(LineSeries::new(
                dates[LONG_WINDOW - 1..].iter().copied().zip(long),
                LONG_WINDOW_COLOR.stroke_width(SMOOTH_STROKE),
            ))
            .map_err(|e| draw_err(&spec.out_path, e))?;
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 90))
            .draw()
            .map_err(|e| draw_err(&spec.out_path, e))?;
    }

    root.present().map_err(|e| draw_err(&spec.out_path, e))?;

    Ok(())
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(
        2,
        format!("Failed to render chart '{}': {e}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;

    fn table(n: u64) -> SeriesTable {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let rows = (0..n)
            .map(|i| (start + Duration::days(i as i64), 10 + i * 3))
            .collect();
        SeriesTable {
            metric: Metric::Cases,
            rows,
        }
    }

    fn spec(out_path: PathBuf) -> ChartSpec {
        ChartSpec {
            title: "England COVID-19 Cases by Date".to_string(),
            y_label: "Cases".to_string(),
            out_path,
        }
    }

    #[test]
    fn renders_chart_with_overlays_and_legend() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cases_daily_01-02-2021.svg");

        render_chart(&table(60), &spec(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"), "not an SVG file");
        assert!(contents.contains("England COVID-19 Cases by Date"));
        assert!(contents.contains("3-day moving average"));
    }

    #[test]
    fn short_series_renders_without_overlays() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiny.svg");

        render_chart(&table(2), &spec(path.clone())).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn rerun_overwrites_rather_than_duplicating() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cases_daily_01-02-2021.svg");

        render_chart(&table(30), &spec(path.clone())).unwrap();
        render_chart(&table(30), &spec(path.clone())).unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn empty_table_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = SeriesTable {
            metric: Metric::Deaths,
            rows: vec![],
        };

        let err = render_chart(&empty, &spec(tmp.path().join("deaths.svg"))).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("deaths"), "{err}");
    }
}
