//! Output formatting and persistence for check results.
//!
//! Supports pretty-printing, a JSON report per submission, CSV append for
//! the cohort results file, and the aggregated cohort JSON.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::checks::types::{CheckStatus, CohortAggregate, SubmissionReport};
use crate::stats::SubmissionStats;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a submission's statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &SubmissionStats) {
    debug!("{:#?}", stats);
}

/// Logs a one-line-per-check summary of a report.
pub fn print_summary(report: &SubmissionReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            CheckStatus::Passed => info!("PASS  {}", outcome.name),
            CheckStatus::Failed(message) => info!("FAIL  {} - {message}", outcome.name),
            CheckStatus::Skipped(reason) => info!("SKIP  {} - {reason}", outcome.name),
        }
    }
    info!(
        "{} passed, {} failed, {} skipped",
        report.passed, report.failed, report.skipped
    );
}

/// Writes the full per-submission report as pretty JSON.
pub fn write_json_report(path: &str, report: &SubmissionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("writing report to {path}"))?;
    info!(path, "JSON report written");
    Ok(())
}

/// Writes the aggregated cohort summary as pretty JSON.
pub fn write_cohort_json(path: &str, aggregate: &CohortAggregate) -> Result<()> {
    let json = serde_json::to_string_pretty(aggregate)?;
    std::fs::write(path, json).with_context(|| format!("writing cohort summary to {path}"))?;
    info!(path, "Cohort summary written");
    Ok(())
}

/// Appends a [`SubmissionStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &SubmissionStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::aggregate::load_rows;
    use crate::checks::types::CheckOutcome;

    fn sample_report() -> SubmissionReport {
        SubmissionReport::new(
            Some("s01".to_string()),
            vec![
                CheckOutcome::passed("harmonic_fitting"),
                CheckOutcome::failed("teos10", "missing gsw calls"),
            ],
        )
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SubmissionStats::default());
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        print_summary(&sample_report());
    }

    #[test]
    fn test_append_creates_file_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let path_str = path.to_str().unwrap();

        let stats = SubmissionStats::from_report(&sample_report());
        append_record(path_str, &stats).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,submission_id"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_append_twice_writes_headers_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let path_str = path.to_str().unwrap();

        let stats = SubmissionStats::from_report(&sample_report());
        append_record(path_str, &stats).unwrap();
        append_record(path_str, &stats).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("timestamp").count(), 1);
    }

    #[test]
    fn test_csv_round_trips_into_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let path_str = path.to_str().unwrap();

        let stats = SubmissionStats::from_report(&sample_report());
        append_record(path_str, &stats).unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_json_report(path.to_str().unwrap(), &sample_report()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["outcomes"][1]["status"], "failed");
    }
}
