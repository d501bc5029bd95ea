//! Detects, prunes, and merges peaks in a target equalization curve to
//! seed the optimizer with a starting `(fc, gain)` candidate list.

use crate::savgol::savgol_filter;
use crate::smoother::window_size_indices;
use aeq_core::interpolate;

const AGGRESSIVE_SMOOTH_WINDOW_OCTAVES: f64 = 1.0 / 7.0;
const AGGRESSIVE_SMOOTH_ITERATIONS: usize = 1000;
const INITIAL_PRUNE_THRESHOLD_DB: f64 = 0.1;
const REDUCTION_THRESHOLDS_DB: [f64; 2] = [0.2, 0.33];
const MERGE_MAX_RMS_DB: f64 = 0.3;

const SUB_BASS_LOW_HZ: f64 = 20.0;
const SUB_BASS_MID_HZ: f64 = 60.0;
const SUB_BASS_LOWEST_CANDIDATE_HIGH_HZ: f64 = 80.0;
const SUB_BASS_LOWEST_CANDIDATE_MID_HZ: f64 = 40.0;

/// One candidate peaking filter seed: center frequency and initial gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    pub fc: f64,
    pub gain_db: f64,
}

pub struct PeakInitializer {
    pub max_filters: Option<usize>,
}

impl PeakInitializer {
    pub fn new(max_filters: Option<usize>) -> Self {
        Self { max_filters }
    }

    pub fn initialize(&self, freqs: &[f64], target: &[f64]) -> Vec<PeakCandidate> {
        let window = window_size_indices(freqs, AGGRESSIVE_SMOOTH_WINDOW_OCTAVES);
        let mut smoothed = target.to_vec();
        for _ in 0..AGGRESSIVE_SMOOTH_ITERATIONS {
            smoothed = savgol_filter(&smoothed, window, 2);
        }

        let mut indices = local_maxima_indices(&smoothed.iter().map(|v| v.max(0.0)).collect::<Vec<_>>());
        indices.extend(local_maxima_indices(
            &smoothed.iter().map(|v| (-v).max(0.0)).collect::<Vec<_>>(),
        ));
        indices.sort_unstable();
        indices.dedup();

        let mut candidates: Vec<PeakCandidate> = indices
            .into_iter()
            .filter(|&i| smoothed[i].abs() > INITIAL_PRUNE_THRESHOLD_DB)
            .map(|i| PeakCandidate { fc: freqs[i], gain_db: smoothed[i] })
            .collect();
        candidates.sort_by(|a, b| a.fc.partial_cmp(&b.fc).unwrap());

        candidates = prepend_sub_bass_seeds(freqs, &smoothed, candidates);

        if let Some(max_filters) = self.max_filters {
            candidates = reduce_count(freqs, &smoothed, candidates, max_filters);
        }

        candidates
    }
}

/// A point is a local maximum if it is strictly greater than both
/// neighbours (edges are never local maxima).
fn local_maxima_indices(y: &[f64]) -> Vec<usize> {
    let mut out = Vec::new();
    for i in 1..y.len().saturating_sub(1) {
        if y[i] > y[i - 1] && y[i] > y[i + 1] {
            out.push(i);
        }
    }
    out
}

fn prepend_sub_bass_seeds(
    freqs: &[f64],
    smoothed: &[f64],
    mut candidates: Vec<PeakCandidate>,
) -> Vec<PeakCandidate> {
    let lowest = candidates.first().map(|c| c.fc);
    let mut seeds = Vec::new();
    match lowest {
        Some(f) if f > SUB_BASS_LOWEST_CANDIDATE_HIGH_HZ => {
            seeds.push(SUB_BASS_LOW_HZ);
            seeds.push(SUB_BASS_MID_HZ);
        }
        Some(f) if f > SUB_BASS_LOWEST_CANDIDATE_MID_HZ => {
            seeds.push(SUB_BASS_LOW_HZ);
        }
        None => {
            // No candidates at all: nothing to seed relative to.
        }
        _ => {}
    }

    if seeds.is_empty() {
        return candidates;
    }

    let mut prefix: Vec<PeakCandidate> = seeds
        .into_iter()
        .map(|fc| {
            let gain = interpolate(freqs, smoothed, &[fc], 1)[0];
            PeakCandidate { fc, gain_db: gain }
        })
        .collect();
    prefix.append(&mut candidates);
    prefix
}

fn reduce_count(
    freqs: &[f64],
    target_fine: &[f64],
    mut candidates: Vec<PeakCandidate>,
    max_filters: usize,
) -> Vec<PeakCandidate> {
    for &threshold in &REDUCTION_THRESHOLDS_DB {
        if candidates.len() <= max_filters {
            break;
        }
        candidates.retain(|c| c.gain_db.abs() > threshold);
    }

    while candidates.len() > max_filters {
        match best_merge_candidate(freqs, target_fine, &candidates) {
            Some((idx, merged)) => {
                tracing::debug!(
                    a_fc = candidates[idx].fc,
                    b_fc = candidates[idx + 1].fc,
                    merged_fc = merged.fc,
                    "merged adjacent peak candidates"
                );
                candidates.splice(idx..=idx + 1, [merged]);
            }
            None => break,
        }
    }

    if candidates.len() > max_filters {
        tracing::warn!(
            dropped = candidates.len() - max_filters,
            "truncating peak candidates by smallest |gain|"
        );
        candidates.sort_by(|a, b| b.gain_db.abs().partial_cmp(&a.gain_db.abs()).unwrap());
        candidates.truncate(max_filters);
        candidates.sort_by(|a, b| a.fc.partial_cmp(&b.fc).unwrap());
    }

    candidates
}

/// Finds the adjacent same-sign pair whose linear-in-log interpolation
/// best matches `target_fine` over the span between them (smallest RMS),
/// provided that RMS is below `MERGE_MAX_RMS_DB`.
fn best_merge_candidate(
    freqs: &[f64],
    target_fine: &[f64],
    candidates: &[PeakCandidate],
) -> Option<(usize, PeakCandidate)> {
    let mut best: Option<(usize, f64, PeakCandidate)> = None;

    for i in 0..candidates.len().saturating_sub(1) {
        let a = candidates[i];
        let b = candidates[i + 1];
        let same_sign = a.gain_db.signum() == b.gain_db.signum();
        if !same_sign {
            continue;
        }

        let rms = pair_interpolation_rms(freqs, target_fine, a, b);
        if rms >= MERGE_MAX_RMS_DB {
            continue;
        }

        let fc_merged = snap_to_grid(freqs, (a.fc * b.fc).sqrt());
        let gain_merged = (a.gain_db + b.gain_db) / 2.0;
        let candidate = PeakCandidate { fc: fc_merged, gain_db: gain_merged };

        if best.as_ref().map(|(_, best_rms, _)| rms < *best_rms).unwrap_or(true) {
            best = Some((i, rms, candidate));
        }
    }

    best.map(|(idx, _, c)| (idx, c))
}

/// RMS error between the linear-in-log interpolation of `(a, b)` and the
/// fine target curve, evaluated at every grid point strictly between
/// `a.fc` and `b.fc`.
fn pair_interpolation_rms(
    freqs: &[f64],
    target_fine: &[f64],
    a: PeakCandidate,
    b: PeakCandidate,
) -> f64 {
    let (lo, hi) = if a.fc <= b.fc { (a, b) } else { (b, a) };
    let span: Vec<(f64, f64)> = freqs
        .iter()
        .zip(target_fine.iter())
        .filter(|(&f, _)| f >= lo.fc && f <= hi.fc)
        .map(|(&f, &t)| (f, t))
        .collect();

    if span.is_empty() {
        return f64::INFINITY;
    }

    let log_lo = lo.fc.log10();
    let log_hi = hi.fc.log10();
    let span_log = (log_hi - log_lo).max(1e-12);

    let mut sum_sq = 0.0;
    for (f, t) in &span {
        let frac = (f.log10() - log_lo) / span_log;
        let interp = lo.gain_db + frac * (hi.gain_db - lo.gain_db);
        sum_sq += (interp - t).powi(2);
    }
    (sum_sq / span.len() as f64).sqrt()
}

fn snap_to_grid(freqs: &[f64], f: f64) -> f64 {
    freqs
        .iter()
        .copied()
        .min_by(|a, b| (a - f).abs().partial_cmp(&(b - f).abs()).unwrap())
        .unwrap_or(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeq_core::generate_grid;

    fn synthetic_target(freqs: &[f64]) -> Vec<f64> {
        freqs
            .iter()
            .map(|f| {
                let mut g = 0.0;
                g += 4.0 * (-((f.log10() - 120f64.log10()).powi(2)) / 0.01).exp();
                g += -3.0 * (-((f.log10() - 3000f64.log10()).powi(2)) / 0.01).exp();
                g
            })
            .collect()
    }

    #[test]
    fn scenario_s4_peak_initialization() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let target = synthetic_target(&freqs);
        let init = PeakInitializer::new(None);
        let candidates = init.initialize(&freqs, &target);

        assert!(candidates.len() >= 4, "expected at least 4 candidates, got {}", candidates.len());
        assert!(candidates.iter().any(|c| (c.fc - 20.0).abs() < 1.0));
        assert!(candidates.iter().any(|c| (c.fc - 60.0).abs() < 1.0));
    }

    #[test]
    fn reduction_respects_max_filters() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let target = synthetic_target(&freqs);
        let init = PeakInitializer::new(Some(3));
        let candidates = init.initialize(&freqs, &target);
        assert!(candidates.len() <= 3);
    }

    #[test]
    fn merge_uses_corrected_interpolation_not_the_source_typo() {
        let freqs = vec![100.0, 200.0, 300.0, 400.0];
        let fine = vec![1.0, 1.5, 2.0, 3.0];
        let a = PeakCandidate { fc: 100.0, gain_db: 1.0 };
        let b = PeakCandidate { fc: 400.0, gain_db: 3.0 };
        // Correct linear-in-log interpolation at 200/300 Hz differs from
        // what the source's off-by-one read would have produced; this
        // pins the corrected RMS value.
        let rms = pair_interpolation_rms(&freqs, &fine, a, b);
        assert!(rms < 0.2, "rms={rms}");
        assert!(rms > 0.0);
    }

    #[test]
    fn no_single_sample_noise_survives_pruning() {
        let freqs = generate_grid(20.0, 20_000.0, 1.01);
        let mut target = vec![0.0; freqs.len()];
        target[300] = 0.05; // below the 0.1 dB threshold
        let init = PeakInitializer::new(None);
        let candidates = init.initialize(&freqs, &target);
        assert!(candidates.iter().all(|c| c.gain_db.abs() > INITIAL_PRUNE_THRESHOLD_DB));
    }
}
