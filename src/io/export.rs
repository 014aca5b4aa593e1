//! Export fetched series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts; the default report flow leaves it switched off.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::MetricSeries;
use crate::error::AppError;

/// Write one series to `<dir>/<slug>_daily_<DD-MM-YYYY>.csv`.
///
/// Rows are written in series order, one `date,count` pair per line.
pub fn write_series_csv(
    dir: &Path,
    series: &MetricSeries,
    run_date: NaiveDate,
) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{}.csv", series.metric.daily_file_stem(run_date)));
    let mut file = File::create(&path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create stats CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "date,{}", series.metric.api_field())
        .map_err(|e| AppError::new(2, format!("Failed to write stats CSV header: {e}")))?;

    for (date, count) in &series.points {
        writeln!(file, "{date},{count}")
            .map_err(|e| AppError::new(2, format!("Failed to write stats CSV row: {e}")))?;
    }

    Ok(path)
}
