//! RBJ-cookbook peaking biquad coefficients and their analytic log-magnitude
//! response, used by the optimizer to evaluate a cascade of filters without
//! ever running a difference equation over samples.
//!
//! Only the peaking topology is implemented: low/high shelving coefficients
//! appear in the source this pipeline is modeled on but are always
//! constructed with a zero-width slice (dead code), so this crate omits
//! them per spec.md §9.

use aeq_core::SAMPLE_RATE_HZ;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A single peaking biquad's tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakingFilter {
    pub fc: f64,
    pub q: f64,
    pub gain_db: f64,
}

impl PeakingFilter {
    pub fn new(fc: f64, q: f64, gain_db: f64) -> Self {
        Self { fc, q, gain_db }
    }
}

/// Normalized RBJ peaking-EQ coefficients (`a0` divided out).
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Calculates peaking EQ filter coefficients (RBJ cookbook), normalized
    /// so `a0 == 1`.
    pub fn peaking(fc: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let w = 2.0 * PI * fc / sample_rate;
        let sin_w = w.sin();
        let cos_w = w.cos();
        let alpha = sin_w / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_w;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_w;
        let a2 = 1.0 - alpha / a;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Evaluates the analytic log-magnitude (dB) of a normalized biquad at
/// frequency `f`, using the `phi = 4 sin²(w/2)` parameterization from
/// spec.md §4.8 rather than a direct complex-exponential evaluation — the
/// same closed form the optimizer differentiates through.
pub fn magnitude_db(coeffs: &BiquadCoeffs, f: f64, sample_rate: f64) -> f64 {
    let w = 2.0 * PI * f / sample_rate;
    let phi = 4.0 * (w / 2.0).sin().powi(2);

    let (b0, b1, b2) = (coeffs.b0, coeffs.b1, coeffs.b2);
    let numerator =
        (b0 + b1 + b2).powi(2) + (b0 * b2 * phi - (b1 * (b0 + b2) + 4.0 * b0 * b2)) * phi;

    // a0 is 1 after normalization; coeffs.a1/a2 are already standard form.
    let (a0, a1, a2) = (1.0, coeffs.a1, coeffs.a2);
    let denominator =
        (a0 + a1 + a2).powi(2) + (a0 * a2 * phi - (a1 * (a0 + a2) + 4.0 * a0 * a2)) * phi;

    10.0 * numerator.max(1e-30).log10() - 10.0 * denominator.max(1e-30).log10()
}

/// Sums the per-filter log-magnitude at `f` for a cascade of peaking
/// filters at the fixed parametric-EQ sample rate.
pub fn cascade_magnitude_db(filters: &[PeakingFilter], f: f64) -> f64 {
    filters
        .iter()
        .map(|flt| {
            let coeffs = BiquadCoeffs::peaking(flt.fc, flt.q, flt.gain_db, SAMPLE_RATE_HZ);
            magnitude_db(&coeffs, f, SAMPLE_RATE_HZ)
        })
        .sum()
}

/// Evaluates the cascade response at every point of `freqs`.
pub fn cascade_response(filters: &[PeakingFilter], freqs: &[f64]) -> Vec<f64> {
    freqs.iter().map(|&f| cascade_magnitude_db(filters, f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unity_gain_is_flat() {
        let filters = [PeakingFilter::new(1000.0, 1.0, 0.0)];
        let db = cascade_magnitude_db(&filters, 1000.0);
        assert_abs_diff_eq!(db, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn peak_gain_is_achieved_at_center_frequency() {
        let filters = [PeakingFilter::new(1000.0, 1.0, 6.0)];
        let db = cascade_magnitude_db(&filters, 1000.0);
        assert_abs_diff_eq!(db, 6.0, epsilon = 0.05);
    }

    #[test]
    fn far_from_center_response_decays_toward_zero() {
        let filters = [PeakingFilter::new(1000.0, 4.0, 6.0)];
        let near = cascade_magnitude_db(&filters, 1000.0).abs();
        let far = cascade_magnitude_db(&filters, 50.0).abs();
        assert!(far < near);
    }

    #[test]
    fn cascade_sums_per_filter_magnitudes() {
        let f1 = [PeakingFilter::new(1000.0, 1.0, 3.0)];
        let f2 = [PeakingFilter::new(3000.0, 1.0, -3.0)];
        let both = [f1[0], f2[0]];
        let at = 1000.0;
        let expected = cascade_magnitude_db(&f1, at) + cascade_magnitude_db(&f2, at);
        assert_abs_diff_eq!(cascade_magnitude_db(&both, at), expected, epsilon = 1e-9);
    }
}
