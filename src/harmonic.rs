//! The semi-diurnal cosine model underlying the exercise.
//!
//! Students fit this curve to moored CTD and velocity records; the grader
//! uses the same function to generate synthetic data and as the target of
//! least-squares parameter recovery.

/// M2 principal lunar semi-diurnal tidal period, in days (12.42 hours).
pub const M2_PERIOD_DAYS: f64 = 12.42 / 24.0;

/// Evaluates `amplitude * cos(2π·t/period + phase) + offset` elementwise
/// over times `t` in days, with the period fixed to [`M2_PERIOD_DAYS`].
///
/// Returns a vector of the same length as `t`. Pure and deterministic;
/// defined for all finite inputs, including an empty `t`.
pub fn semi_diurnal_cosine(t: &[f64], amplitude: f64, phase: f64, offset: f64) -> Vec<f64> {
    t.iter()
        .map(|&ti| semi_diurnal_cosine_at(ti, amplitude, phase, offset))
        .collect()
}

/// Scalar form of [`semi_diurnal_cosine`] for a single time value.
pub fn semi_diurnal_cosine_at(t: f64, amplitude: f64, phase: f64, offset: f64) -> f64 {
    amplitude * (2.0 * std::f64::consts::PI * t / M2_PERIOD_DAYS + phase).cos() + offset
}

/// Evenly spaced values over `[start, stop]`, inclusive of both endpoints.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
