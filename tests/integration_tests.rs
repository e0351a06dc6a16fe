//! End-to-end test: assemble a complete synthetic submission on disk and run
//! the full check battery over it, then push the result through the CSV and
//! cohort aggregation path.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use tidelab_rater::checks::aggregate::{aggregate_cohort, load_rows};
use tidelab_rater::checks::runner::{Submission, run_all};
use tidelab_rater::checks::types::CheckStatus;
use tidelab_rater::config::GraderConfig;
use tidelab_rater::fit::fit_semi_diurnal;
use tidelab_rater::harmonic::{linspace, semi_diurnal_cosine};
use tidelab_rater::report::append_record;
use tidelab_rater::stats::SubmissionStats;

const SAMPLES: usize = 480; // 10 days hourly at 2 samples/hour

fn write_notebook(path: &Path, completed: bool) {
    let info = if completed {
        "**Your Name:** Ada Lovelace\n**Date:** 2026-06-01\n**Student ID:** 123456"
    } else {
        "**Your Name:** [REPLACE WITH YOUR ACTUAL NAME]"
    };

    let notebook = json!({
        "cells": [
            {"cell_type": "markdown", "source": info},
            {"cell_type": "code", "source": [
                "import gsw\n",
                "ds['SA'] = gsw.SA_from_SP(ds.PSAL, ds.PRES, lon, lat)\n",
                "ds['CT'] = gsw.CT_from_t(ds['SA'], ds.TEMP, ds.PRES)\n"
            ]},
            {"cell_type": "code", "source": [
                "popt, pcov = curve_fit(semi_diurnal_cosine, t_days, ds['SA'], p0=p0)\n",
                "fitted_amplitude, fitted_phase, fitted_offset = popt\n",
                "print(fitted_amplitude, fitted_phase)\n"
            ]},
            {"cell_type": "code", "source": [
                "SA_filtered = ds['SA'].rolling(time=25, center=True).mean()\n",
                "# boxcar filter removes the tidal band\n"
            ]},
            {"cell_type": "markdown", "source": "## Analysis Questions\n1. Why does the residual..."}
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    });

    std::fs::write(path, serde_json::to_string_pretty(&notebook).unwrap()).unwrap();
}

/// Moored CTD record with an M2 signal in salinity.
fn write_ctd(path: &Path) {
    let t = linspace(0.0, (SAMPLES - 1) as f64 / 48.0, SAMPLES);
    let mut rng = StdRng::seed_from_u64(3);
    let psal: Vec<f64> = semi_diurnal_cosine(&t, 0.5, 0.8, 34.0)
        .into_iter()
        .map(|v| v + 0.01 * (rng.random::<f64>() - 0.5))
        .collect();
    let temp: Vec<f64> = t.iter().map(|ti| 8.0 + 0.2 * (ti * 0.5).cos()).collect();
    let pres = vec![55.0; SAMPLES];

    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", SAMPLES).unwrap();
    for name in ["time", "PSAL", "TEMP", "PRES"] {
        file.add_variable::<f64>(name, &["time"]).unwrap();
    }
    file.variable_mut("time").unwrap().put_values(&t, ..).unwrap();
    file.variable_mut("PSAL").unwrap().put_values(&psal, ..).unwrap();
    file.variable_mut("TEMP").unwrap().put_values(&temp, ..).unwrap();
    file.variable_mut("PRES").unwrap().put_values(&pres, ..).unwrap();
}

fn write_velocity(path: &Path) {
    let t = linspace(0.0, (SAMPLES - 1) as f64 / 48.0, SAMPLES);
    let uvel = semi_diurnal_cosine(&t, 0.3, 0.0, 0.05);
    let vvel = semi_diurnal_cosine(&t, 0.2, 1.2, -0.02);

    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", SAMPLES).unwrap();
    for name in ["time", "UVEL", "VVEL"] {
        file.add_variable::<f64>(name, &["time"]).unwrap();
    }
    file.variable_mut("time").unwrap().put_values(&t, ..).unwrap();
    file.variable_mut("UVEL").unwrap().put_values(&uvel, ..).unwrap();
    file.variable_mut("VVEL").unwrap().put_values(&vvel, ..).unwrap();
}

fn write_figure(path: &Path) {
    let edge = 320u32;
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(file, edge, edge);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    let data: Vec<u8> = (0..(edge as usize * edge as usize * 3))
        .map(|_| rng.random_range(20..=200))
        .collect();
    writer.write_image_data(&data).unwrap();
}

fn build_submission(dir: &Path, completed: bool) {
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::create_dir_all(dir.join("data")).unwrap();
    std::fs::create_dir_all(dir.join("figures")).unwrap();

    write_notebook(&dir.join("src/assignment.ipynb"), completed);
    write_ctd(&dir.join("data/mooredCTD1_raw.nc"));
    write_velocity(&dir.join("data/mooring1velocity.nc"));
    for n in 1..=4 {
        write_figure(&dir.join(format!("figures/ex3fig{n}-Ada-Messfern.png")));
    }
}

#[test]
fn test_complete_submission_passes_every_check() {
    let dir = tempfile::tempdir().unwrap();
    build_submission(dir.path(), true);

    let submission = Submission::new(dir.path(), GraderConfig::default());
    let report = run_all(&submission, Some("ada".to_string()));

    for outcome in &report.outcomes {
        assert!(
            outcome.status.is_passed(),
            "check {} did not pass: {:?}",
            outcome.name,
            outcome.status
        );
    }
    assert_eq!(report.passed, 16);
}

#[test]
fn test_incomplete_submission_fails_student_info_only_there() {
    let dir = tempfile::tempdir().unwrap();
    build_submission(dir.path(), false);

    let submission = Submission::new(dir.path(), GraderConfig::default());
    let report = run_all(&submission, Some("late".to_string()));

    let info = report
        .outcomes
        .iter()
        .find(|o| o.name == "student_info")
        .unwrap();
    assert!(matches!(info.status, CheckStatus::Failed(_)));
    assert_eq!(report.failed, 1);
    assert_eq!(report.passed, 15);
}

#[test]
fn test_fit_recovers_signal_from_ctd_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ctd.nc");
    write_ctd(&path);

    let file = netcdf::open(&path).unwrap();
    let t: Vec<f64> = file.variable("time").unwrap().get_values(..).unwrap();
    let psal: Vec<f64> = file.variable("PSAL").unwrap().get_values(..).unwrap();

    let fit = fit_semi_diurnal(&t, &psal).unwrap();
    assert!((fit.amplitude - 0.5).abs() < 0.02);
    assert!((fit.phase - 0.8).abs() < 0.05);
    assert!((fit.offset - 34.0).abs() < 0.02);
    assert!(fit.rmse < 0.01);
}

#[test]
fn test_results_csv_feeds_cohort_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    let complete = dir.path().join("ada");
    let incomplete = dir.path().join("late");
    build_submission(&complete, true);
    build_submission(&incomplete, false);

    let csv_path = dir.path().join("results.csv");
    let csv_str = csv_path.to_str().unwrap();

    for (root, id) in [(&complete, "ada"), (&incomplete, "late")] {
        let submission = Submission::new(root, GraderConfig::default());
        let report = run_all(&submission, Some(id.to_string()));
        append_record(csv_str, &SubmissionStats::from_report(&report)).unwrap();
    }

    let rows = load_rows(&csv_path).unwrap();
    assert_eq!(rows.len(), 2);

    let aggregate = aggregate_cohort(rows).unwrap();
    assert_eq!(aggregate.submissions, 2);

    let cohort_path = dir.path().join("cohort.json");
    tidelab_rater::report::write_cohort_json(cohort_path.to_str().unwrap(), &aggregate).unwrap();

    let raw = std::fs::read_to_string(&cohort_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["checks"]["student_info"]["pass_rate"], 0.5);
    assert_eq!(value["checks"]["harmonic_fitting"]["pass_rate"], 1.0);
}

#[test]
fn test_half_submission_mix_of_skips_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    // Notebook only: no data, no figures.
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    write_notebook(&dir.path().join("src/assignment.ipynb"), true);

    let submission = Submission::new(dir.path(), GraderConfig::default());
    let report = run_all(&submission, None);

    // Data presence checks fail hard; variable and figure checks skip.
    assert_eq!(report.failed, 2);
    assert_eq!(report.skipped, 6);
    assert_eq!(report.passed, 8);
}
