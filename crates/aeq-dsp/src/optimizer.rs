//! Fits a fixed-topology cascade of peaking biquads to a target curve by
//! gradient descent (Adam), using the analytic magnitude formula from
//! `biquad` and central-difference gradients instead of an embedded
//! tensor-autodiff framework — see DESIGN.md for why.

use crate::biquad::{cascade_response, PeakingFilter};
use crate::peak_init::PeakCandidate;

const INITIAL_LEARNING_RATE: f64 = 0.5;
const LEARNING_RATE_DECAY: f64 = 0.9995;
const MAX_STEPS: usize = 10_000;
const IMPROVEMENT_THRESHOLD: f64 = 0.01;
const TARGET_LOSS: f64 = 0.1;
const BAD_STEP_LIMIT: usize = 300;
const POST_PRUNE_GAIN_THRESHOLD_DB: f64 = 0.1;
const DEFAULT_Q: f64 = 1.0;

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

const GRAD_EPS_FC: f64 = 1.0;
const GRAD_EPS_Q: f64 = 1e-3;
const GRAD_EPS_GAIN: f64 = 1e-3;

pub struct OptimizationReport {
    pub filters: Vec<PeakingFilter>,
    pub parametric_eq: Vec<f64>,
    pub rmse: f64,
    pub converged: bool,
}

pub struct BiquadOptimizer;

impl BiquadOptimizer {
    /// Runs Adam over `(fc, Q, gain)` for each seed candidate to minimize
    /// the mean squared error between the cascade response and `target`.
    pub fn optimize(freqs: &[f64], target: &[f64], seeds: &[PeakCandidate]) -> OptimizationReport {
        assert_eq!(freqs.len(), target.len());

        let n = seeds.len();
        let mut fc: Vec<f64> = seeds.iter().map(|s| s.fc).collect();
        let mut q: Vec<f64> = vec![DEFAULT_Q; n];
        let mut gain: Vec<f64> = seeds.iter().map(|s| s.gain_db).collect();

        if n == 0 {
            return OptimizationReport {
                filters: Vec::new(),
                parametric_eq: vec![0.0; freqs.len()],
                rmse: mean_squared(target).sqrt(),
                converged: true,
            };
        }

        let mut m_fc = vec![0.0; n];
        let mut v_fc = vec![0.0; n];
        let mut m_q = vec![0.0; n];
        let mut v_q = vec![0.0; n];
        let mut m_g = vec![0.0; n];
        let mut v_g = vec![0.0; n];

        let mut best_loss = f64::INFINITY;
        let mut best_fc = fc.clone();
        let mut best_q = q.clone();
        let mut best_gain = gain.clone();
        let mut bad_steps = 0usize;
        let mut lr = INITIAL_LEARNING_RATE;
        let mut converged = false;

        for step in 0..MAX_STEPS {
            let loss = loss_of(freqs, target, &fc, &q, &gain);

            if loss < best_loss {
                if best_loss - loss > IMPROVEMENT_THRESHOLD {
                    bad_steps = 0;
                } else {
                    bad_steps += 1;
                }
                best_loss = loss;
                best_fc = fc.clone();
                best_q = q.clone();
                best_gain = gain.clone();
            } else {
                bad_steps += 1;
            }

            if best_loss < TARGET_LOSS {
                converged = true;
                break;
            }
            if bad_steps > BAD_STEP_LIMIT {
                break;
            }

            let (g_fc, g_q, g_gain) = numerical_gradient(freqs, target, &fc, &q, &gain);

            let t = (step + 1) as f64;
            for i in 0..n {
                adam_step(&mut fc[i], g_fc[i], &mut m_fc[i], &mut v_fc[i], lr, t);
                adam_step(&mut q[i], g_q[i], &mut m_q[i], &mut v_q[i], lr, t);
                adam_step(&mut gain[i], g_gain[i], &mut m_g[i], &mut v_g[i], lr, t);
            }

            lr *= LEARNING_RATE_DECAY;
        }

        let filters: Vec<PeakingFilter> = best_fc
            .iter()
            .zip(best_q.iter())
            .zip(best_gain.iter())
            .map(|((&fc, &q), &gain)| PeakingFilter::new(fc.abs().max(1.0), q.abs(), gain))
            .filter(|f| f.gain_db.abs() > POST_PRUNE_GAIN_THRESHOLD_DB)
            .collect();

        let parametric_eq = cascade_response(&filters, freqs);
        let rmse = rmse_between(&parametric_eq, target);

        OptimizationReport { filters, parametric_eq, rmse, converged }
    }
}

fn adam_step(param: &mut f64, grad: f64, m: &mut f64, v: &mut f64, lr: f64, t: f64) {
    *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * grad;
    *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * grad * grad;
    let m_hat = *m / (1.0 - ADAM_BETA1.powf(t));
    let v_hat = *v / (1.0 - ADAM_BETA2.powf(t));
    *param -= lr * m_hat / (v_hat.sqrt() + ADAM_EPS);
}

fn filters_from(fc: &[f64], q: &[f64], gain: &[f64]) -> Vec<PeakingFilter> {
    fc.iter()
        .zip(q.iter())
        .zip(gain.iter())
        .map(|((&fc, &q), &gain)| PeakingFilter::new(fc.abs().max(1.0), q.abs().max(1e-3), gain))
        .collect()
}

fn loss_of(freqs: &[f64], target: &[f64], fc: &[f64], q: &[f64], gain: &[f64]) -> f64 {
    let filters = filters_from(fc, q, gain);
    let response = cascade_response(&filters, freqs);
    mean_squared_error(&response, target)
}

fn mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>() / a.len() as f64
}

fn mean_squared(b: &[f64]) -> f64 {
    b.iter().map(|y| y * y).sum::<f64>() / b.len() as f64
}

fn rmse_between(a: &[f64], b: &[f64]) -> f64 {
    mean_squared_error(a, b).sqrt()
}

/// Central-difference gradient of the loss with respect to every `(fc, Q,
/// gain)` in the cascade.
fn numerical_gradient(
    freqs: &[f64],
    target: &[f64],
    fc: &[f64],
    q: &[f64],
    gain: &[f64],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = fc.len();
    let mut g_fc = vec![0.0; n];
    let mut g_q = vec![0.0; n];
    let mut g_gain = vec![0.0; n];

    for i in 0..n {
        g_fc[i] = central_difference(freqs, target, fc, q, gain, i, Param::Fc, GRAD_EPS_FC);
        g_q[i] = central_difference(freqs, target, fc, q, gain, i, Param::Q, GRAD_EPS_Q);
        g_gain[i] = central_difference(freqs, target, fc, q, gain, i, Param::Gain, GRAD_EPS_GAIN);
    }

    (g_fc, g_q, g_gain)
}

enum Param {
    Fc,
    Q,
    Gain,
}

#[allow(clippy::too_many_arguments)]
fn central_difference(
    freqs: &[f64],
    target: &[f64],
    fc: &[f64],
    q: &[f64],
    gain: &[f64],
    i: usize,
    param: Param,
    eps: f64,
) -> f64 {
    let mut fc_p = fc.to_vec();
    let mut q_p = q.to_vec();
    let mut gain_p = gain.to_vec();
    let mut fc_m = fc.to_vec();
    let mut q_m = q.to_vec();
    let mut gain_m = gain.to_vec();

    match param {
        Param::Fc => {
            fc_p[i] += eps;
            fc_m[i] -= eps;
        }
        Param::Q => {
            q_p[i] += eps;
            q_m[i] -= eps;
        }
        Param::Gain => {
            gain_p[i] += eps;
            gain_m[i] -= eps;
        }
    }

    let loss_p = loss_of(freqs, target, &fc_p, &q_p, &gain_p);
    let loss_m = loss_of(freqs, target, &fc_m, &q_m, &gain_m);
    (loss_p - loss_m) / (2.0 * eps)
}
