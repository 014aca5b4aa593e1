//! Command-line parsing for the dashboard chart reporter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fetch/chart code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Metric;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "Daily COVID-19 chart reporter (UK dashboard)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the daily series and write one smoothed chart per metric.
    Report(ReportArgs),
    /// Print one metric's series as `date,count` CSV (useful for scripting).
    Fetch(FetchArgs),
}

/// Options for a report run. The defaults reproduce the plain `covid`
/// invocation: England nation-level data, `graphs/` and `stats/` in the
/// working directory.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Dashboard area type.
    #[arg(long, default_value = "nation")]
    pub area_type: String,

    /// Dashboard area name; also used in chart titles.
    #[arg(long, default_value = "England")]
    pub area_name: String,

    /// Directory the chart files are written to.
    #[arg(long, default_value = "graphs")]
    pub graphs_dir: PathBuf,

    /// Directory reserved for raw series exports.
    #[arg(long, default_value = "stats")]
    pub stats_dir: PathBuf,

    /// Also write each fetched series as CSV into the stats directory.
    #[arg(long)]
    pub export_stats: bool,

    /// Suppress per-stage progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Options for printing a single metric.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Which metric to fetch.
    #[arg(value_enum)]
    pub metric: Metric,

    /// Dashboard area type.
    #[arg(long, default_value = "nation")]
    pub area_type: String,

    /// Dashboard area name.
    #[arg(long, default_value = "England")]
    pub area_name: String,
}
