//! The submission check battery and cohort aggregation.
//!
//! Each check is an independent pass/fail assertion over the submission's
//! files; the runner collects them into a report, and the aggregate module
//! rolls per-submission CSV rows up into a graded cohort summary.

pub mod aggregate;
pub mod datasets;
pub mod figures;
pub mod grade;
pub mod model;
pub mod notebook;
pub mod runner;
pub mod types;
pub mod utility;
