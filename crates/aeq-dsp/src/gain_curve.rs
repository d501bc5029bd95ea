//! Inverts the smoothed error into an equalization curve subject to a
//! per-frequency maximum gain, detects clipping kinks, and smooths them.

use crate::smoother::window_size_indices;
use aeq_core::{interpolate, sigmoid_curve};

const KINK_SMOOTHING_WINDOW_OCTAVES: f64 = 1.0 / 12.0;

#[derive(Debug, Clone, Copy)]
pub struct GainCurveParams {
    pub max_gain_db: f64,
    pub treble_max_gain_db: f64,
    pub treble_gain_k: f64,
    pub treble_f_lower: f64,
    pub treble_f_upper: f64,
    pub smooth_kinks: bool,
}

pub struct EqualizationResult {
    pub equalization: Vec<f64>,
    pub equalized_raw: Vec<f64>,
    pub equalized_smoothed: Option<Vec<f64>>,
}

pub struct GainCurveBuilder {
    params: GainCurveParams,
}

impl GainCurveBuilder {
    pub fn new(params: GainCurveParams) -> Self {
        Self { params }
    }

    /// Builds the equalization curve from `error_smoothed` (or `error` if
    /// the caller has no smoothed channel), plus `raw`/`smoothed` so the
    /// `equalized_*` channels can be derived.
    pub fn equalize(
        &self,
        freqs: &[f64],
        error: &[f64],
        raw: &[f64],
        smoothed: Option<&[f64]>,
    ) -> EqualizationResult {
        let p = &self.params;
        let max_gain = sigmoid_curve(
            freqs,
            p.treble_f_lower,
            p.treble_f_upper,
            p.max_gain_db,
            p.treble_max_gain_db,
        );
        let gain_k = sigmoid_curve(freqs, p.treble_f_lower, p.treble_f_upper, 1.0, p.treble_gain_k);

        let clipped: Vec<f64> = error
            .iter()
            .zip(gain_k.iter())
            .zip(max_gain.iter())
            .map(|((e, k), m)| {
                let proposed = -e * k;
                proposed.min(*m)
            })
            .collect();

        let equalization = if p.smooth_kinks {
            let is_clipped: Vec<bool> = clipped
                .iter()
                .zip(max_gain.iter())
                .map(|(c, m)| (c - m).abs() < 1e-9)
                .collect();
            let kinks = find_kinks(&is_clipped);
            smooth_kinks(freqs, &clipped, &kinks)
        } else {
            clipped
        };

        let equalized_raw: Vec<f64> =
            raw.iter().zip(equalization.iter()).map(|(r, e)| r + e).collect();
        let equalized_smoothed = smoothed
            .map(|s| s.iter().zip(equalization.iter()).map(|(s, e)| s + e).collect());

        EqualizationResult { equalization, equalized_raw, equalized_smoothed }
    }
}

/// Finds indices where the clipped/unclipped state changes relative to the
/// previous sample. A transition at index 0 has no previous neighbour and
/// is discarded.
fn find_kinks(is_clipped: &[bool]) -> Vec<usize> {
    let mut kinks = Vec::new();
    for i in 1..is_clipped.len() {
        if is_clipped[i] != is_clipped[i - 1] {
            kinks.push(i);
        }
    }
    kinks
}

/// Dooms a window of indices around each kink, never dooming the last two
/// grid points, then refits a quadratic spline over the surviving points
/// and resamples it at every original frequency.
fn smooth_kinks(freqs: &[f64], equalization: &[f64], kinks: &[usize]) -> Vec<f64> {
    if kinks.is_empty() {
        return equalization.to_vec();
    }

    let n = freqs.len();
    let w = window_size_indices(freqs, KINK_SMOOTHING_WINDOW_OCTAVES);
    let half = (w - 1) / 2;

    let mut doomed = vec![false; n];
    for &k in kinks {
        let lo = k.saturating_sub(half);
        let hi = (k + half).min(n - 1);
        for i in lo..=hi {
            doomed[i] = true;
        }
    }
    if n >= 2 {
        doomed[n - 1] = false;
        doomed[n - 2] = false;
    }

    let survivor_freqs: Vec<f64> = freqs
        .iter()
        .zip(doomed.iter())
        .filter(|(_, &d)| !d)
        .map(|(&f, _)| f)
        .collect();
    let survivor_values: Vec<f64> = equalization
        .iter()
        .zip(doomed.iter())
        .filter(|(_, &d)| !d)
        .map(|(&v, _)| v)
        .collect();

    if survivor_freqs.len() < 3 {
        return equalization.to_vec();
    }

    interpolate(&survivor_freqs, &survivor_values, freqs, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeq_core::generate_grid;

    fn flat_params(max_gain: f64) -> GainCurveParams {
        GainCurveParams {
            max_gain_db: max_gain,
            treble_max_gain_db: max_gain,
            treble_gain_k: 1.0,
            treble_f_lower: 6000.0,
            treble_f_upper: 8000.0,
            smooth_kinks: true,
        }
    }

    #[test]
    fn equalization_never_exceeds_max_gain() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let error: Vec<f64> = freqs
            .iter()
            .map(|f| if (150.0..300.0).contains(f) { -6.0 } else { 0.0 })
            .collect();
        let raw = vec![0.0; freqs.len()];
        let builder = GainCurveBuilder::new(flat_params(0.0));
        let result = builder.equalize(&freqs, &error, &raw, None);
        for v in &result.equalization {
            assert!(*v <= 0.0 + 1e-6, "gain {v} exceeds max_gain");
        }
    }

    #[test]
    fn equalized_raw_matches_invariant_8() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let error = vec![-1.0; freqs.len()];
        let raw: Vec<f64> = freqs.iter().map(|f| f.log10()).collect();
        let builder = GainCurveBuilder::new(flat_params(6.0));
        let result = builder.equalize(&freqs, &error, &raw, None);
        for ((r, e), er) in raw.iter().zip(result.equalization.iter()).zip(result.equalized_raw.iter()) {
            assert!((r + e - er).abs() < 1e-9);
        }
    }

    #[test]
    fn clipping_has_no_single_sample_spikes() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let error: Vec<f64> = freqs
            .iter()
            .map(|f| if (150.0..300.0).contains(f) { -6.0 } else { 0.0 })
            .collect();
        let raw = vec![0.0; freqs.len()];
        let builder = GainCurveBuilder::new(flat_params(0.0));
        let result = builder.equalize(&freqs, &error, &raw, None);
        for w in result.equalization.windows(2) {
            assert!((w[1] - w[0]).abs() <= 1.5, "spike of {}", (w[1] - w[0]).abs());
        }
    }
}
