//! Least-squares recovery of semi-diurnal cosine parameters.
//!
//! A small Levenberg-Marquardt loop over the three free parameters
//! (amplitude, phase, offset) with the M2 period held fixed. The Jacobian is
//! analytic, so no numeric differentiation is involved.

use anyhow::{Result, bail};
use nalgebra::{DMatrix, DVector, Vector3};
use std::f64::consts::PI;

use crate::harmonic::{M2_PERIOD_DAYS, semi_diurnal_cosine_at};

const MAX_ITERATIONS: usize = 100;
const COST_TOLERANCE: f64 = 1e-12;
const STEP_TOLERANCE: f64 = 1e-10;

/// Result of fitting the semi-diurnal cosine to a time series.
///
/// Normalized so that `amplitude >= 0` and `phase` lies in `(-π, π]`.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicFit {
    pub amplitude: f64,
    pub phase: f64,
    pub offset: f64,
    /// Root-mean-square residual of the converged fit.
    pub rmse: f64,
    pub iterations: usize,
}

/// Fits `amplitude * cos(2π·t/period + phase) + offset` to `(t, values)`
/// with an initial guess derived from the data: half the observed range,
/// zero phase, and the sample mean.
///
/// # Errors
///
/// Fails when `t` and `values` differ in length, fewer than three samples
/// are supplied, any input is non-finite, or the solver does not converge.
pub fn fit_semi_diurnal(t: &[f64], values: &[f64]) -> Result<HarmonicFit> {
    let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);

    let amplitude_guess = ((max - min) / 2.0).max(f64::EPSILON);
    fit_semi_diurnal_with_guess(t, values, amplitude_guess, 0.0, mean)
}

/// Same as [`fit_semi_diurnal`] with an explicit starting point.
pub fn fit_semi_diurnal_with_guess(
    t: &[f64],
    values: &[f64],
    amplitude: f64,
    phase: f64,
    offset: f64,
) -> Result<HarmonicFit> {
    if t.len() != values.len() {
        bail!(
            "time and value lengths differ: {} vs {}",
            t.len(),
            values.len()
        );
    }
    if t.len() < 3 {
        bail!("need at least 3 samples to fit 3 parameters, got {}", t.len());
    }
    if t.iter().chain(values).any(|v| !v.is_finite()) {
        bail!("non-finite sample in fit input");
    }

    let n = t.len();
    let y = DVector::from_column_slice(values);
    let mut params = Vector3::new(amplitude, phase, offset);
    let mut lambda = 1e-3;
    let mut cost = residual_cost(t, &y, &params);

    for iteration in 0..MAX_ITERATIONS {
        let jacobian = jacobian(t, &params);
        let residuals = residuals(t, &y, &params);

        let jtj = jacobian.transpose() * &jacobian;
        let jtr = jacobian.transpose() * residuals;

        // Damped normal equations; raise lambda until a step is accepted.
        let mut stepped = false;
        for _ in 0..20 {
            let mut damped = jtj.clone();
            for i in 0..3 {
                damped[(i, i)] += lambda * jtj[(i, i)].max(f64::EPSILON);
            }

            let Some(chol) = damped.cholesky() else {
                lambda *= 10.0;
                continue;
            };
            let step = chol.solve(&jtr);
            let candidate = params + Vector3::new(step[0], step[1], step[2]);
            let candidate_cost = residual_cost(t, &y, &candidate);

            if candidate_cost < cost {
                let improvement = cost - candidate_cost;
                params = candidate;
                cost = candidate_cost;
                lambda = (lambda / 10.0).max(1e-12);
                stepped = true;

                if improvement < COST_TOLERANCE || step.norm() < STEP_TOLERANCE {
                    return Ok(normalized(params, cost, n, iteration + 1));
                }
                break;
            }
            lambda *= 10.0;
        }

        if !stepped {
            // No damping level improved the cost; treat as converged.
            return Ok(normalized(params, cost, n, iteration + 1));
        }
    }

    bail!("harmonic fit did not converge within {MAX_ITERATIONS} iterations");
}

fn residuals(t: &[f64], y: &DVector<f64>, p: &Vector3<f64>) -> DVector<f64> {
    DVector::from_iterator(
        t.len(),
        t.iter()
            .zip(y.iter())
            .map(|(&ti, &yi)| yi - semi_diurnal_cosine_at(ti, p[0], p[1], p[2])),
    )
}

fn residual_cost(t: &[f64], y: &DVector<f64>, p: &Vector3<f64>) -> f64 {
    residuals(t, y, p).norm_squared()
}

fn jacobian(t: &[f64], p: &Vector3<f64>) -> DMatrix<f64> {
    let omega = 2.0 * PI / M2_PERIOD_DAYS;
    DMatrix::from_fn(t.len(), 3, |row, col| {
        let arg = omega * t[row] + p[1];
        match col {
            0 => arg.cos(),
            1 => -p[0] * arg.sin(),
            _ => 1.0,
        }
    })
}

fn normalized(mut p: Vector3<f64>, cost: f64, n: usize, iterations: usize) -> HarmonicFit {
    if p[0] < 0.0 {
        p[0] = -p[0];
        p[1] += PI;
    }
    HarmonicFit {
        amplitude: p[0],
        phase: wrap_phase(p[1]),
        offset: p[2],
        rmse: (cost / n as f64).sqrt(),
        iterations,
    }
}

/// Wraps an angle into `(-π, π]`.
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(2.0 * PI);
    if wrapped > PI { wrapped - 2.0 * PI } else { wrapped }
}
