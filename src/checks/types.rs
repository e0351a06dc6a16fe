//! Data types shared by the check battery and the cohort aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a single independent check.
///
/// `Skipped` is informational: a prerequisite (usually an optional file) was
/// missing, so the check neither passed nor failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

impl CheckStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckStatus::Passed)
    }
}

/// A named check result. Names are stable identifiers used as CSV columns.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: &'static str,
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckOutcome {
    pub fn new(name: &'static str, status: CheckStatus) -> Self {
        Self { name, status }
    }

    pub fn passed(name: &'static str) -> Self {
        Self::new(name, CheckStatus::Passed)
    }

    pub fn failed(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Failed(message.into()))
    }

    pub fn skipped(name: &'static str, reason: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Skipped(reason.into()))
    }
}

/// Full result of running the battery against one submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    pub submission_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub outcomes: Vec<CheckOutcome>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SubmissionReport {
    pub fn new(submission_id: Option<String>, outcomes: Vec<CheckOutcome>) -> Self {
        let passed = outcomes
            .iter()
            .filter(|o| matches!(o.status, CheckStatus::Passed))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o.status, CheckStatus::Failed(_)))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.status, CheckStatus::Skipped(_)))
            .count();

        Self {
            submission_id,
            generated_at: Utc::now(),
            outcomes,
            passed,
            failed,
            skipped,
        }
    }
}

/// A single row deserialized from a results CSV file.
///
/// Must stay in sync with [`crate::stats::SubmissionStats`], which writes
/// these rows.
#[derive(Debug, Deserialize)]
pub struct SubmissionRow {
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) submission_id: Option<String>,
    pub(crate) error_type: Option<String>,

    pub(crate) model_invariants: bool,
    pub(crate) fit_recovery: bool,
    pub(crate) notebook_found: bool,
    pub(crate) student_info: bool,
    pub(crate) harmonic_fitting: bool,
    pub(crate) teos10: bool,
    pub(crate) filtering: bool,
    pub(crate) analysis_questions: bool,
    pub(crate) ctd_file: bool,
    pub(crate) ctd_variables: bool,
    pub(crate) velocity_file: bool,
    pub(crate) velocity_variables: bool,
    pub(crate) figures_present: bool,
    pub(crate) figure_naming: bool,
    pub(crate) figure_sizes: bool,
    pub(crate) figure_content: bool,
}

/// Aggregated statistics for a single check across a cohort.
#[derive(Debug, Serialize)]
pub struct CheckAggregate {
    pub(crate) pass_rate: f64,
    pub(crate) stddev: f64,
    pub(crate) grade: String,
}

/// Overall weighted score and letter grade for a cohort.
#[derive(Debug, Serialize)]
pub struct OverallAggregate {
    pub(crate) score: f64,
    pub(crate) grade: String,
}

/// Complete aggregation result over all submissions in a results CSV.
#[derive(Debug, Serialize)]
pub struct CohortAggregate {
    pub(crate) schema_version: u8,
    pub(crate) algorithm_version: u8,
    pub(crate) generated_at: DateTime<Utc>,
    pub submissions: usize,
    pub(crate) error_rows: usize,
    pub(crate) checks: HashMap<String, CheckAggregate>,
    pub(crate) overall: OverallAggregate,
}
