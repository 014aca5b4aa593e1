//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fetch/transform/render pipeline
//! - prints progress and the run summary

use clap::Parser;

use crate::cli::{Command, FetchArgs, ReportArgs};
use crate::data::DashboardClient;
use crate::domain::ReportConfig;
use crate::error::AppError;
use crate::report::Progress;

pub mod pipeline;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `covid` (and `covid --quiet`, etc.) to behave like
    // `covid report ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the flagless UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Fetch(args) => handle_fetch(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args);
    let progress = if args.quiet {
        Progress::quiet()
    } else {
        Progress::stderr()
    };

    let output = pipeline::run_report(&config, &progress)?;

    println!("{}", crate::report::format_run_summary(&config, &output));

    // A metric with no data still fails the run, but only after everything
    // that could be produced has been written.
    if let Some(missing) = output.failures().next() {
        missing.require_series()?;
    }
    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let client = DashboardClient::from_env(&args.area_type, &args.area_name);
    let outcome = pipeline::fetch_outcome(&client, args.metric);
    let series = outcome.require_series()?;

    print!("{}", crate::report::format_series_csv(series));
    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    ReportConfig {
        area_type: args.area_type.clone(),
        area_name: args.area_name.clone(),
        graphs_dir: args.graphs_dir.clone(),
        stats_dir: args.stats_dir.clone(),
        export_stats: args.export_stats,
    }
}

/// Rewrite argv so `covid` defaults to `covid report`.
///
/// Rules:
/// - `covid`                      -> `covid report`
/// - `covid --quiet ...`          -> `covid report --quiet ...`
/// - `covid --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "fetch");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
