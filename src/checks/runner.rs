//! Drives the full check battery over one submission directory.
//!
//! Checks are a flat list and fully independent: a failure in one never
//! prevents the rest from running, and missing optional inputs surface as
//! skips. This mirrors the per-test isolation the exercise runner relied on.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::checks::types::{CheckStatus, SubmissionReport};
use crate::checks::{datasets, figures, model, notebook};
use crate::config::GraderConfig;

/// A student submission: a directory expected to contain the notebook,
/// a `data/` directory with the two mooring NetCDF files, and a `figures/`
/// directory with the four required plots.
#[derive(Debug)]
pub struct Submission {
    pub root: PathBuf,
    pub config: GraderConfig,
}

impl Submission {
    pub fn new(root: impl Into<PathBuf>, config: GraderConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// First existing notebook location: the submission root, then `src/`.
    pub fn notebook_path(&self) -> Option<PathBuf> {
        let candidates = [
            self.root.join(&self.config.notebook_name),
            self.root.join("src").join(&self.config.notebook_name),
        ];
        candidates.into_iter().find(|p| p.exists())
    }

    /// Location of a data file: `data/<name>`, falling back to the root for
    /// submissions that keep the NetCDF files unsorted.
    pub fn data_path(&self, filename: &str) -> PathBuf {
        let primary = self.root.join("data").join(filename);
        if primary.exists() {
            return primary;
        }
        let fallback = self.root.join(filename);
        if fallback.exists() { fallback } else { primary }
    }

    pub fn ctd_path(&self) -> PathBuf {
        self.data_path(&self.config.ctd_filename)
    }

    pub fn velocity_path(&self) -> PathBuf {
        self.data_path(&self.config.velocity_filename)
    }

    pub fn figures_dir(&self) -> PathBuf {
        self.root.join("figures")
    }
}

/// Runs every check against `submission` and collects the outcomes into a
/// [`SubmissionReport`]. Never returns an error: anything that goes wrong
/// inside a check is that check's failure, not the runner's.
pub fn run_all(submission: &Submission, submission_id: Option<String>) -> SubmissionReport {
    let mut outcomes = vec![model::invariants_check(), model::fit_recovery_check()];
    outcomes.extend(notebook::checks(submission));
    outcomes.extend(datasets::checks(submission));
    outcomes.extend(figures::checks(submission));

    for outcome in &outcomes {
        match &outcome.status {
            CheckStatus::Passed => info!(check = outcome.name, "passed"),
            CheckStatus::Failed(message) => {
                warn!(check = outcome.name, %message, "failed");
            }
            CheckStatus::Skipped(reason) => info!(check = outcome.name, %reason, "skipped"),
        }
    }

    let report = SubmissionReport::new(submission_id, outcomes);
    info!(
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        submission = %submission.root.display(),
        "Check battery complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_prefers_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/mooredCTD1_raw.nc"), b"x").unwrap();
        std::fs::write(dir.path().join("mooredCTD1_raw.nc"), b"x").unwrap();

        let submission = Submission::new(dir.path(), GraderConfig::default());
        assert_eq!(
            submission.ctd_path(),
            dir.path().join("data/mooredCTD1_raw.nc")
        );
    }

    #[test]
    fn test_data_path_falls_back_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mooring1velocity.nc"), b"x").unwrap();

        let submission = Submission::new(dir.path(), GraderConfig::default());
        assert_eq!(
            submission.velocity_path(),
            dir.path().join("mooring1velocity.nc")
        );
    }

    #[test]
    fn test_notebook_path_checks_src() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/assignment.ipynb"), b"{}").unwrap();

        let submission = Submission::new(dir.path(), GraderConfig::default());
        assert_eq!(
            submission.notebook_path(),
            Some(dir.path().join("src/assignment.ipynb"))
        );
    }

    #[test]
    fn test_run_all_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let submission = Submission::new(dir.path(), GraderConfig::default());
        let report = run_all(&submission, Some("s01".to_string()));

        // The two self-checks pass regardless of the submission contents.
        assert!(report.passed >= 2);
        // Notebook and data files are missing.
        assert!(report.failed >= 3);
        assert!(report.skipped > 0);
        assert_eq!(report.outcomes.len(), 16);
    }
}
