//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the tracked metrics (`Metric`)
//! - fetched series and their tabular form (`MetricSeries`, `SeriesTable`)
//! - per-metric fetch results (`FetchOutcome`)
//! - run configuration (`ReportConfig`)

pub mod types;

pub use types::*;
