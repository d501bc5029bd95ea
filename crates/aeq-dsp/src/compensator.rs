//! Builds the target curve (compensation + bass-boost + tilt) and the
//! resulting error signal, plus the standalone centering and calibration
//! helpers the coordinator applies around it.

use crate::savgol::savgol_filter;
use crate::smoother::window_size_indices;
use aeq_core::{interpolate, sigmoid_curve};

const CENTER_FREQUENCY_HZ: f64 = 1000.0;
const BASS_BOOST_F_LOWER: f64 = 60.0;
const BASS_BOOST_F_UPPER: f64 = 200.0;
const COMPENSATION_SMOOTH_WINDOW_OCTAVES: f64 = 1.0 / 5.0;
const COMPENSATION_SMOOTH_ITERATIONS: usize = 100;

/// Subtracts the curve's own value at 1 kHz from every sample, so the
/// result reads 0 dB at the anchor frequency. Idempotent: centering an
/// already-centered curve is a no-op up to floating-point error.
pub fn center(freqs: &[f64], curve: &[f64]) -> Vec<f64> {
    let shift = interpolate(freqs, curve, &[CENTER_FREQUENCY_HZ], 1)[0];
    curve.iter().map(|v| v - shift).collect()
}

/// Subtracts an aligned calibration curve from `raw`.
pub fn calibrate(raw: &[f64], calibration: &[f64]) -> Vec<f64> {
    assert_eq!(raw.len(), calibration.len());
    raw.iter().zip(calibration.iter()).map(|(r, c)| r - c).collect()
}

/// `bass_boost_curve(f) = sigmoid(60, 200, a_lo=bass_boost_db, a_hi=0)`.
pub fn bass_boost_curve(freqs: &[f64], bass_boost_db: f64) -> Vec<f64> {
    sigmoid_curve(freqs, BASS_BOOST_F_LOWER, BASS_BOOST_F_UPPER, bass_boost_db, 0.0)
}

/// `tilt_curve(f) = log2(f / f_anchor) * tilt_db_per_octave`, anchored at
/// the geometric mean of the grid's bounds (`20 * sqrt(1000) ≈ 632.46 Hz`
/// for the canonical grid) — distinct from `center`'s 1 kHz anchor, per
/// the documented inconsistency in the source this pipeline is modeled on.
pub fn tilt_curve(freqs: &[f64], tilt_db_per_octave: f64, f_min: f64, f_max: f64) -> Vec<f64> {
    let f_anchor = (f_min * f_max).sqrt();
    freqs
        .iter()
        .map(|f| (f / f_anchor).log2() * tilt_db_per_octave)
        .collect()
}

/// Produces `target` and `error = raw - target` from a raw measurement and
/// an already-interpolated compensation curve.
pub struct Compensator {
    pub bass_boost_db: f64,
    pub tilt_db_per_octave: f64,
    pub f_min: f64,
    pub f_max: f64,
}

impl Compensator {
    pub fn new(bass_boost_db: f64, tilt_db_per_octave: f64, f_min: f64, f_max: f64) -> Self {
        Self { bass_boost_db, tilt_db_per_octave, f_min, f_max }
    }

    /// Smooths and centers a compensation curve (raw, already resampled
    /// onto `freqs`), per spec.md §4.5 step 1.
    pub fn prepare_compensation(&self, freqs: &[f64], compensation_raw: &[f64]) -> Vec<f64> {
        let window = window_size_indices(freqs, COMPENSATION_SMOOTH_WINDOW_OCTAVES);
        let mut smoothed = compensation_raw.to_vec();
        for _ in 0..COMPENSATION_SMOOTH_ITERATIONS {
            smoothed = savgol_filter(&smoothed, window, 2);
        }
        center(freqs, &smoothed)
    }

    /// Builds `target` from a prepared compensation curve and returns
    /// `(target, error)` given `raw`.
    pub fn target_and_error(
        &self,
        freqs: &[f64],
        raw: &[f64],
        compensation_smoothed: &[f64],
    ) -> (Vec<f64>, Vec<f64>) {
        let bass = bass_boost_curve(freqs, self.bass_boost_db);
        let tilt = tilt_curve(freqs, self.tilt_db_per_octave, self.f_min, self.f_max);

        let target: Vec<f64> = compensation_smoothed
            .iter()
            .zip(bass.iter())
            .zip(tilt.iter())
            .map(|((c, b), t)| c + b + t)
            .collect();

        let error: Vec<f64> = raw.iter().zip(target.iter()).map(|(r, t)| r - t).collect();
        (target, error)
    }
}
