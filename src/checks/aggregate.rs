//! Cohort aggregation over per-submission result rows.
//!
//! Reads the CSV rows the `check` subcommand appends, computes a pass rate
//! and standard deviation per check, assigns letter grades, and folds the
//! rates into one weighted overall score for the cohort.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::info;

use crate::checks::grade::grade;
use crate::checks::types::{CheckAggregate, CohortAggregate, OverallAggregate, SubmissionRow};
use crate::checks::utility::{mean, stddev};

/// Weights used in the weighted average for each check.
/// The analysis checks carry more weight than file bookkeeping.
static WEIGHTS: &[(&str, f64)] = &[
    ("model_invariants", 0.5),
    ("fit_recovery", 0.5),
    ("notebook_found", 1.0),
    ("student_info", 1.0),
    ("harmonic_fitting", 3.0),
    ("teos10", 2.0),
    ("filtering", 2.0),
    ("analysis_questions", 2.0),
    ("ctd_file", 1.0),
    ("ctd_variables", 1.0),
    ("velocity_file", 1.0),
    ("velocity_variables", 1.0),
    ("figures_present", 2.0),
    ("figure_naming", 1.0),
    ("figure_sizes", 1.0),
    ("figure_content", 2.0),
];

/// Reads every row of a results CSV file.
pub fn load_rows(path: &Path) -> Result<Vec<SubmissionRow>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: SubmissionRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Aggregates a series of [`SubmissionRow`]s into a single [`CohortAggregate`].
///
/// Rows carrying an error record (a submission that could not be processed
/// at all) are excluded from the rates and reported separately.
pub fn aggregate_cohort(rows: Vec<SubmissionRow>) -> Result<CohortAggregate> {
    if rows.is_empty() {
        bail!("no result rows to aggregate");
    }

    let (error_rows, graded): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.error_type.is_some());

    // Students re-run the checker; only the most recent row per submission
    // id counts. Rows without an id are all kept.
    let mut graded = graded;
    graded.sort_by_key(|r| r.timestamp);
    let mut latest: HashMap<String, SubmissionRow> = HashMap::new();
    let mut anonymous = Vec::new();
    for row in graded {
        match row.submission_id.clone() {
            Some(id) => {
                latest.insert(id, row);
            }
            None => anonymous.push(row),
        }
    }
    let graded: Vec<SubmissionRow> = latest.into_values().chain(anonymous).collect();

    let mut check_series: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in &graded {
        macro_rules! push_check {
            ($name:expr, $value:expr) => {
                check_series
                    .entry($name)
                    .or_default()
                    .push(if $value { 1.0 } else { 0.0 });
            };
        }

        push_check!("model_invariants", row.model_invariants);
        push_check!("fit_recovery", row.fit_recovery);
        push_check!("notebook_found", row.notebook_found);
        push_check!("student_info", row.student_info);
        push_check!("harmonic_fitting", row.harmonic_fitting);
        push_check!("teos10", row.teos10);
        push_check!("filtering", row.filtering);
        push_check!("analysis_questions", row.analysis_questions);
        push_check!("ctd_file", row.ctd_file);
        push_check!("ctd_variables", row.ctd_variables);
        push_check!("velocity_file", row.velocity_file);
        push_check!("velocity_variables", row.velocity_variables);
        push_check!("figures_present", row.figures_present);
        push_check!("figure_naming", row.figure_naming);
        push_check!("figure_sizes", row.figure_sizes);
        push_check!("figure_content", row.figure_content);
    }

    let weights: HashMap<&str, f64> = WEIGHTS.iter().copied().collect();

    let mut checks = HashMap::new();
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for (name, series) in check_series {
        let rate = mean(&series);
        let sd = stddev(&series);

        let weight = *weights.get(name).unwrap_or(&1.0);
        weighted_total += rate * weight;
        weight_sum += weight;

        checks.insert(
            name.to_string(),
            CheckAggregate {
                pass_rate: rate,
                stddev: sd,
                grade: grade(rate),
            },
        );
    }

    let score = if weight_sum == 0.0 {
        0.0
    } else {
        weighted_total / weight_sum
    };

    info!(
        submissions = graded.len(),
        error_rows = error_rows.len(),
        score,
        "Cohort aggregation complete"
    );

    Ok(CohortAggregate {
        schema_version: 1,
        algorithm_version: 1,
        generated_at: Utc::now(),
        submissions: graded.len(),
        error_rows: error_rows.len(),
        checks,
        overall: OverallAggregate {
            score,
            grade: grade(score),
        },
    })
}
