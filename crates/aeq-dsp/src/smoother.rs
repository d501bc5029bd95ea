//! Dual-band iterative Savitzky–Golay smoothing with a sigmoid crossover
//! between a "normal" window/iteration count and a "treble" one.

use crate::savgol::savgol_filter;
use aeq_core::{sigmoid_curve, AeqError, AeqResult};

/// Savitzky–Golay window/iteration parameters for one band.
#[derive(Debug, Clone, Copy)]
pub struct BandParams {
    /// Window size in octaves (e.g. `1.0 / 7.0`).
    pub window_octaves: f64,
    pub iterations: usize,
}

/// Smooths a response curve with two independent Savitzky–Golay bands,
/// blended across `[treble_f_lower, treble_f_upper]` by the shared sigmoid
/// crossover.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    pub normal: BandParams,
    pub treble: BandParams,
    pub treble_f_lower: f64,
    pub treble_f_upper: f64,
}

impl Smoother {
    pub fn new(
        normal: BandParams,
        treble: BandParams,
        treble_f_lower: f64,
        treble_f_upper: f64,
    ) -> Self {
        Self { normal, treble, treble_f_lower, treble_f_upper }
    }

    /// Smooths `x`, sampled at `freqs`, rejecting any NaN in the input.
    pub fn smoothen(&self, freqs: &[f64], x: &[f64]) -> AeqResult<Vec<f64>> {
        if x.iter().any(|v| v.is_nan()) {
            return Err(AeqError::InvalidConfiguration(
                "smoother input contains NaN".to_string(),
            ));
        }
        assert_eq!(freqs.len(), x.len());

        let w_normal = window_size_indices(freqs, self.normal.window_octaves);
        let w_treble = window_size_indices(freqs, self.treble.window_octaves);

        let mut y_low = x.to_vec();
        for _ in 0..self.normal.iterations {
            y_low = savgol_filter(&y_low, w_normal, 2);
        }

        let mut y_high = x.to_vec();
        for _ in 0..self.treble.iterations {
            y_high = savgol_filter(&y_high, w_treble, 2);
        }

        let k_treble = sigmoid_curve(freqs, self.treble_f_lower, self.treble_f_upper, 0.0, 1.0);

        Ok(y_low
            .iter()
            .zip(y_high.iter())
            .zip(k_treble.iter())
            .map(|((&lo, &hi), &k)| lo * (1.0 - k) + hi * k)
            .collect())
    }
}

/// Converts a window size given in octaves into an odd number of grid
/// indices, using the geometric-mean step of `freqs`.
pub fn window_size_indices(freqs: &[f64], octaves: f64) -> usize {
    assert!(freqs.len() >= 2, "need at least two points to derive a step");

    let log_ratios: Vec<f64> = freqs
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    let avg_log_step = log_ratios.iter().sum::<f64>() / log_ratios.len() as f64;
    let avg_step = avg_log_step.exp();

    let w = (2.0_f64.powf(octaves).ln() / avg_step.ln()).round() as i64;
    let w = w.max(3);
    let w = if w % 2 == 0 { w + 1 } else { w };
    (w as usize).min(freqs.len() - (1 - freqs.len() % 2)).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeq_core::generate_grid;
    use approx::assert_abs_diff_eq;

    fn default_smoother() -> Smoother {
        Smoother::new(
            BandParams { window_octaves: 1.0 / 7.0, iterations: 10 },
            BandParams { window_octaves: 1.0 / 5.0, iterations: 100 },
            6000.0,
            8000.0,
        )
    }

    #[test]
    fn rejects_nan_input() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let mut x = vec![0.0; freqs.len()];
        x[10] = f64::NAN;
        let result = default_smoother().smoothen(&freqs, &x);
        assert!(result.is_err());
    }

    #[test]
    fn flat_input_stays_flat() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let x = vec![3.0; freqs.len()];
        let smoothed = default_smoother().smoothen(&freqs, &x).unwrap();
        for v in smoothed {
            assert_abs_diff_eq!(v, 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn output_length_matches_grid() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let x: Vec<f64> = freqs.iter().map(|f| f.log10()).collect();
        let smoothed = default_smoother().smoothen(&freqs, &x).unwrap();
        assert_eq!(smoothed.len(), freqs.len());
    }

    #[test]
    fn window_size_is_always_odd() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        assert_eq!(window_size_indices(&freqs, 1.0 / 7.0) % 2, 1);
        assert_eq!(window_size_indices(&freqs, 1.0 / 5.0) % 2, 1);
    }
}
