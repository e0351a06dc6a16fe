//! CLI entry point for the tidelab rater.
//!
//! Provides subcommands for checking a single student submission and for
//! aggregating accumulated result rows into a graded cohort summary.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tidelab_rater::checks::aggregate::{aggregate_cohort, load_rows};
use tidelab_rater::checks::runner::{Submission, run_all};
use tidelab_rater::config::GraderConfig;
use tidelab_rater::report::{append_record, print_summary, write_cohort_json, write_json_report};
use tidelab_rater::stats::SubmissionStats;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tidelab_rater")]
#[command(about = "Automated checks for the time-series analysis exercise", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full check battery against one submission directory
    Check {
        /// Path to the submission directory
        #[arg(value_name = "SUBMISSION_DIR", default_value = ".")]
        submission_dir: String,

        /// CSV file to append the result row to
        #[arg(short, long, default_value = "results.csv")]
        output: String,

        /// Optional path for a detailed JSON report
        #[arg(long)]
        report: Option<String>,

        /// Submission identifier; defaults to the directory name
        #[arg(long)]
        submission_id: Option<String>,
    },
    /// Aggregate accumulated result rows into a cohort summary
    Aggregate {
        /// Results CSV written by `check`
        #[arg(short, long, default_value = "results.csv")]
        input: String,

        /// Path for the cohort summary JSON
        #[arg(short, long, default_value = "cohort.json")]
        output: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/tidelab_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tidelab_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            submission_dir,
            output,
            report,
            submission_id,
        } => {
            let failed = check_submission(&submission_dir, &output, report, submission_id)?;
            if failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Aggregate { input, output } => {
            let rows = load_rows(Path::new(&input))?;
            info!(rows = rows.len(), input, "Result rows loaded");
            let aggregate = aggregate_cohort(rows)?;
            write_cohort_json(&output, &aggregate)?;
        }
    }

    Ok(())
}

/// Runs the battery on one submission, persists the outcome, and returns the
/// number of failed checks.
#[tracing::instrument(skip(report_path, submission_id), fields(submission_dir, output))]
fn check_submission(
    submission_dir: &str,
    output: &str,
    report_path: Option<String>,
    submission_id: Option<String>,
) -> Result<usize> {
    let root = Path::new(submission_dir);
    let submission_id = submission_id.or_else(|| {
        root.canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    });

    if !root.is_dir() {
        error!(submission_dir, "Submission directory not found");
        let mut stats = SubmissionStats::from_error(
            "missing_submission",
            &format!("{submission_dir} is not a directory"),
        );
        if let Some(id) = &submission_id {
            stats = stats.with_submission_id(id);
        }
        append_record(output, &stats)?;
        return Ok(1);
    }

    let submission = Submission::new(root, GraderConfig::from_env());
    let report = run_all(&submission, submission_id);

    print_summary(&report);
    append_record(output, &SubmissionStats::from_report(&report))?;

    if let Some(path) = report_path {
        write_json_report(&path, &report)?;
    }

    Ok(report.failed)
}
