//! Notebook content checks.
//!
//! Scans the submitted `assignment.ipynb` for the text the completed
//! exercise must contain: filled-in student information, harmonic fitting
//! code, TEOS-10 conversions, filtering, and the analysis-question section.
//! The notebook itself stays a Python notebook; the indicator strings below
//! are what the students' code is expected to use.

use crate::checks::runner::Submission;
use crate::checks::types::CheckOutcome;
use crate::notebook::Notebook;

const NOTEBOOK_FOUND: &str = "notebook_found";
const STUDENT_INFO: &str = "student_info";
const HARMONIC_FITTING: &str = "harmonic_fitting";
const TEOS10: &str = "teos10";
const FILTERING: &str = "filtering";
const ANALYSIS_QUESTIONS: &str = "analysis_questions";

/// Markdown placeholders the handout ships with; all must be replaced.
const PLACEHOLDERS: &[&str] = &[
    "[REPLACE WITH YOUR ACTUAL NAME]",
    "[REPLACE WITH TODAY'S DATE]",
    "[REPLACE WITH YOUR STUDENT ID]",
];

/// Every one of these must appear in the code cells.
const FITTING_INDICATORS: &[&str] = &[
    "curve_fit",
    "semi_diurnal_cosine",
    "amplitude",
    "phase",
    "fitted_",
];

/// At least two of these must appear in the code cells.
const TEOS10_INDICATORS: &[&str] = &["gsw.SA_from_SP", "gsw.CT_from_t", "'SA'", "'CT'"];

/// At least two of these must appear in the code cells.
const FILTERING_INDICATORS: &[&str] = &["rolling", "filter", "SA_filtered", "boxcar"];

/// Runs all notebook checks. When the notebook is absent the content checks
/// come back Skipped; when it exists but cannot be parsed they fail with the
/// parse error.
pub fn checks(submission: &Submission) -> Vec<CheckOutcome> {
    let Some(path) = submission.notebook_path() else {
        let reason = format!(
            "{} not found at the submission root or under src/",
            submission.config.notebook_name
        );
        let mut outcomes = vec![CheckOutcome::failed(NOTEBOOK_FOUND, reason.clone())];
        for name in [
            STUDENT_INFO,
            HARMONIC_FITTING,
            TEOS10,
            FILTERING,
            ANALYSIS_QUESTIONS,
        ] {
            outcomes.push(CheckOutcome::skipped(name, reason.clone()));
        }
        return outcomes;
    };

    let notebook = match Notebook::open(&path) {
        Ok(nb) => nb,
        Err(e) => {
            let message = format!("{e:#}");
            let mut outcomes = vec![CheckOutcome::passed(NOTEBOOK_FOUND)];
            for name in [
                STUDENT_INFO,
                HARMONIC_FITTING,
                TEOS10,
                FILTERING,
                ANALYSIS_QUESTIONS,
            ] {
                outcomes.push(CheckOutcome::failed(name, message.clone()));
            }
            return outcomes;
        }
    };

    let code = notebook.code_text();

    vec![
        CheckOutcome::passed(NOTEBOOK_FOUND),
        student_info(&notebook),
        all_indicators(HARMONIC_FITTING, &code, FITTING_INDICATORS),
        min_indicators(TEOS10, &code, TEOS10_INDICATORS, 2),
        min_indicators(FILTERING, &code, FILTERING_INDICATORS, 2),
        analysis_questions(&notebook),
    ]
}

/// The student-information markdown cell exists and carries no leftover
/// handout placeholders.
fn student_info(notebook: &Notebook) -> CheckOutcome {
    let info_cell = notebook
        .markdown_texts()
        .find(|text| text.contains("Your Name:") || text.contains("Complete your information"));

    let Some(text) = info_cell else {
        return CheckOutcome::failed(STUDENT_INFO, "student information cell not found");
    };

    for placeholder in PLACEHOLDERS {
        if text.contains(placeholder) {
            return CheckOutcome::failed(
                STUDENT_INFO,
                format!("placeholder still present: {placeholder}"),
            );
        }
    }

    CheckOutcome::passed(STUDENT_INFO)
}

fn all_indicators(name: &'static str, code: &str, indicators: &[&str]) -> CheckOutcome {
    match indicators.iter().find(|i| !code.contains(**i)) {
        None => CheckOutcome::passed(name),
        Some(missing) => {
            CheckOutcome::failed(name, format!("'{missing}' not found in any code cell"))
        }
    }
}

fn min_indicators(name: &'static str, code: &str, indicators: &[&str], min: usize) -> CheckOutcome {
    let found = indicators.iter().filter(|i| code.contains(**i)).count();
    if found >= min {
        CheckOutcome::passed(name)
    } else {
        CheckOutcome::failed(
            name,
            format!("only {found} of {} indicators present, need {min}", indicators.len()),
        )
    }
}

/// Some markdown cell mentions both "analysis" and "question".
fn analysis_questions(notebook: &Notebook) -> CheckOutcome {
    let found = notebook.markdown_texts().any(|text| {
        let lower = text.to_lowercase();
        lower.contains("analysis") && lower.contains("question")
    });

    if found {
        CheckOutcome::passed(ANALYSIS_QUESTIONS)
    } else {
        CheckOutcome::failed(ANALYSIS_QUESTIONS, "analysis questions section not found")
    }
}
