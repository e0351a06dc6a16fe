//! Per-submission result record, one CSV row per checker run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::checks::types::{CheckStatus, SubmissionReport};

#[derive(Debug, Default, Serialize)]
pub struct SubmissionStats {
    pub timestamp: DateTime<Utc>,
    pub submission_id: Option<String>,

    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,

    // one column per named check; a skip counts as not passed
    pub model_invariants: bool,
    pub fit_recovery: bool,
    pub notebook_found: bool,
    pub student_info: bool,
    pub harmonic_fitting: bool,
    pub teos10: bool,
    pub filtering: bool,
    pub analysis_questions: bool,
    pub ctd_file: bool,
    pub ctd_variables: bool,
    pub velocity_file: bool,
    pub velocity_variables: bool,
    pub figures_present: bool,
    pub figure_naming: bool,
    pub figure_sizes: bool,
    pub figure_content: bool,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl SubmissionStats {
    /// Flattens a [`SubmissionReport`] into one row.
    pub fn from_report(report: &SubmissionReport) -> Self {
        let mut s = SubmissionStats {
            timestamp: report.generated_at,
            submission_id: report.submission_id.clone(),
            total_checks: report.outcomes.len(),
            passed: report.passed,
            failed: report.failed,
            skipped: report.skipped,
            ..Default::default()
        };

        for outcome in &report.outcomes {
            let passed = matches!(outcome.status, CheckStatus::Passed);
            match outcome.name {
                "model_invariants" => s.model_invariants = passed,
                "fit_recovery" => s.fit_recovery = passed,
                "notebook_found" => s.notebook_found = passed,
                "student_info" => s.student_info = passed,
                "harmonic_fitting" => s.harmonic_fitting = passed,
                "teos10" => s.teos10 = passed,
                "filtering" => s.filtering = passed,
                "analysis_questions" => s.analysis_questions = passed,
                "ctd_file" => s.ctd_file = passed,
                "ctd_variables" => s.ctd_variables = passed,
                "velocity_file" => s.velocity_file = passed,
                "velocity_variables" => s.velocity_variables = passed,
                "figures_present" => s.figures_present = passed,
                "figure_naming" => s.figure_naming = passed,
                "figure_sizes" => s.figure_sizes = passed,
                "figure_content" => s.figure_content = passed,
                _ => {}
            }
        }

        s
    }

    /// Create an error record for a submission that could not be processed.
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        SubmissionStats {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set the submission id after construction.
    pub fn with_submission_id(mut self, submission_id: &str) -> Self {
        self.submission_id = Some(submission_id.to_string());
        self
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of checks passed, skips counting against the total.
    pub fn pass_pct(&self) -> f64 {
        Self::pct(self.passed, self.total_checks)
    }
}
