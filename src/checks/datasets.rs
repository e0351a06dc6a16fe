//! NetCDF dataset checks for the moored CTD and velocity records.
//!
//! Presence is a hard requirement; the variable-level checks skip when the
//! file is absent so one missing download does not cascade into four
//! failures.

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::checks::runner::Submission;
use crate::checks::types::{CheckOutcome, CheckStatus};
use crate::config::GraderConfig;

const CTD_FILE: &str = "ctd_file";
const CTD_VARIABLES: &str = "ctd_variables";
const VELOCITY_FILE: &str = "velocity_file";
const VELOCITY_VARIABLES: &str = "velocity_variables";

const CTD_REQUIRED_VARS: &[&str] = &["PSAL", "TEMP", "PRES", "time"];
const VELOCITY_REQUIRED_VARS: &[&str] = &["UVEL", "VVEL", "time"];

/// Practical salinity bounds for a plausible moored record, in PSU.
const PSAL_MIN: f64 = 15.0;
const PSAL_MAX: f64 = 40.0;

/// Upper bound on plausible horizontal current speed, in m/s.
const VELOCITY_LIMIT: f64 = 5.0;

pub fn checks(submission: &Submission) -> Vec<CheckOutcome> {
    let ctd = submission.ctd_path();
    let velocity = submission.velocity_path();

    vec![
        presence(CTD_FILE, &ctd, &submission.config.ctd_filename),
        variables(CTD_VARIABLES, &ctd, |path| {
            validate_ctd(path, &submission.config)
        }),
        presence(VELOCITY_FILE, &velocity, &submission.config.velocity_filename),
        variables(VELOCITY_VARIABLES, &velocity, |path| {
            validate_velocity(path, &submission.config)
        }),
    ]
}

fn presence(name: &'static str, path: &Path, filename: &str) -> CheckOutcome {
    if path.exists() {
        CheckOutcome::passed(name)
    } else {
        CheckOutcome::failed(name, format!("{filename} not found - required for analysis"))
    }
}

fn variables(
    name: &'static str,
    path: &Path,
    validate: impl Fn(&Path) -> Result<()>,
) -> CheckOutcome {
    if !path.exists() {
        return CheckOutcome::skipped(name, format!("{} not present", path.display()));
    }
    match validate(path) {
        Ok(()) => CheckOutcome::passed(name),
        Err(e) => CheckOutcome::new(name, CheckStatus::Failed(format!("{e:#}"))),
    }
}

fn validate_ctd(path: &Path, config: &GraderConfig) -> Result<()> {
    let file = netcdf::open(path).with_context(|| format!("opening {}", path.display()))?;

    for var in CTD_REQUIRED_VARS {
        if file.variable(var).is_none() {
            return Err(anyhow!("required CTD variable '{var}' missing from dataset"));
        }
    }

    let time_len = series_len(&file)?;
    if time_len <= config.min_series_len {
        return Err(anyhow!(
            "CTD dataset has only {time_len} time samples, expected more than {}",
            config.min_series_len
        ));
    }

    let psal_max = var_max(&file, "PSAL")?;
    if psal_max <= PSAL_MIN {
        return Err(anyhow!("salinity data appears invalid (max {psal_max:.2} PSU too low)"));
    }
    if psal_max >= PSAL_MAX {
        return Err(anyhow!("salinity data appears invalid (max {psal_max:.2} PSU too high)"));
    }

    Ok(())
}

fn validate_velocity(path: &Path, config: &GraderConfig) -> Result<()> {
    let file = netcdf::open(path).with_context(|| format!("opening {}", path.display()))?;

    for var in VELOCITY_REQUIRED_VARS {
        if file.variable(var).is_none() {
            return Err(anyhow!(
                "required velocity variable '{var}' missing from dataset"
            ));
        }
    }

    let time_len = series_len(&file)?;
    if time_len <= config.min_series_len {
        return Err(anyhow!(
            "velocity dataset has only {time_len} time samples, expected more than {}",
            config.min_series_len
        ));
    }

    for component in ["UVEL", "VVEL"] {
        let max = var_max(&file, component)?;
        if max.abs() >= VELOCITY_LIMIT {
            return Err(anyhow!(
                "{component} data appears unrealistic (max {max:.2} m/s)"
            ));
        }
    }

    Ok(())
}

/// Length of the time axis, read from the `time` dimension or, failing that,
/// the `time` variable itself.
fn series_len(file: &netcdf::File) -> Result<usize> {
    if let Some(dim) = file.dimension("time") {
        return Ok(dim.len());
    }
    let var = file
        .variable("time")
        .ok_or_else(|| anyhow!("dataset has no time axis"))?;
    Ok(var.len())
}

/// Largest finite value of a variable; NaN fill values are ignored.
fn var_max(file: &netcdf::File, name: &str) -> Result<f64> {
    let var = file
        .variable(name)
        .ok_or_else(|| anyhow!("variable '{name}' missing"))?;
    let values: Vec<f64> = var
        .get_values(..)
        .with_context(|| format!("reading variable '{name}'"))?;

    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .ok_or_else(|| anyhow!("variable '{name}' holds no finite values"))
}
