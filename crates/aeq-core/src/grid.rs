//! Canonical log-spaced frequency axis and log-domain interpolation.

/// Frequency around which the grid is anchored. The grid is built by
/// stepping geometrically down from this point to `f_min` and up from it
/// to `f_max`, so it always contains (close to) 20 kHz.
pub const GRID_ANCHOR_HZ: f64 = 20_000.0;

/// Default lower bound of the canonical grid, in Hz.
pub const DEFAULT_F_MIN: f64 = 20.0;
/// Default upper bound of the canonical grid, in Hz.
pub const DEFAULT_F_MAX: f64 = 20_000.0;
/// Default geometric step between successive grid points.
pub const DEFAULT_STEP: f64 = 1.01;
/// Step used when resampling onto a GraphicEQ grid.
pub const GRAPHIC_EQ_STEP: f64 = 1.07;

/// Generates the canonical log-spaced frequency grid.
///
/// Descends geometrically from `min(20000, f_max)` down to `f_min`, then
/// ascends geometrically from the same anchor up to `f_max`. Each value is
/// rounded to the nearest integer; the two halves are merged, sorted
/// ascending, and de-duplicated.
pub fn generate(f_min: f64, f_max: f64, step: f64) -> Vec<f64> {
    let anchor = GRID_ANCHOR_HZ.min(f_max);

    let mut freqs = Vec::new();

    let mut f = anchor;
    while f > f_min {
        freqs.push(f.round());
        f /= step;
    }

    let mut f = anchor;
    while f < f_max {
        freqs.push(f.round());
        f *= step;
    }

    freqs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    freqs.dedup();
    tracing::debug!(len = freqs.len(), f_min, f_max, step, "generated frequency grid");
    freqs
}

/// Fits a degree-`order` interpolating spline over `log10(old_freq) ->
/// old_amp` and evaluates it at `log10(new_freq)`.
///
/// `order = 1` (the default used throughout the pipeline) is piecewise
/// linear interpolation in log-frequency space, with the two nearest
/// samples extrapolated linearly outside `old_freq`'s range.
pub fn interpolate(old_freq: &[f64], old_amp: &[f64], new_freq: &[f64], order: usize) -> Vec<f64> {
    assert_eq!(old_freq.len(), old_amp.len());
    assert!(!old_freq.is_empty(), "cannot interpolate an empty curve");

    let log_old: Vec<f64> = old_freq.iter().map(|f| f.log10()).collect();

    match order {
        1 => new_freq
            .iter()
            .map(|f| linear_interp(&log_old, old_amp, f.log10()))
            .collect(),
        2 => {
            let spline = QuadraticSpline::fit(&log_old, old_amp);
            new_freq.iter().map(|f| spline.eval(f.log10())).collect()
        }
        other => panic!("unsupported interpolation order: {other}"),
    }
}

/// Piecewise-linear interpolation with linear extrapolation at the ends.
fn linear_interp(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if xs.len() == 1 {
        return ys[0];
    }

    // Find the bracketing segment via binary search on the sorted xs.
    let idx = match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap()) {
        Ok(i) => return ys[i],
        Err(i) => i,
    };

    let (i0, i1) = if idx == 0 {
        (0, 1)
    } else if idx >= xs.len() {
        (xs.len() - 2, xs.len() - 1)
    } else {
        (idx - 1, idx)
    };

    let (x0, x1) = (xs[i0], xs[i1]);
    let (y0, y1) = (ys[i0], ys[i1]);
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

/// A minimal natural cubic-ish quadratic interpolating spline, used only
/// where the pipeline explicitly calls for `order = 2` (kink smoothing).
/// Built from local quadratic fits over consecutive point triples, blended
/// at segment boundaries so the result stays continuous.
struct QuadraticSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl QuadraticSpline {
    fn fit(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        }
    }

    fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if n == 1 {
            return self.ys[0];
        }
        if n == 2 {
            return linear_interp(&self.xs, &self.ys, x);
        }

        // Locate a window of three points around x and fit a Lagrange
        // quadratic through them.
        let idx = match self
            .xs
            .binary_search_by(|probe| probe.partial_cmp(&x).unwrap())
        {
            Ok(i) => i,
            Err(i) => i,
        };
        let center = idx.clamp(1, n - 2);
        let (i0, i1, i2) = (center - 1, center, center + 1);
        lagrange_quadratic(
            self.xs[i0], self.ys[i0], self.xs[i1], self.ys[i1], self.xs[i2], self.ys[i2], x,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn lagrange_quadratic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let l0 = (x - x1) * (x - x2) / ((x0 - x1) * (x0 - x2));
    let l1 = (x - x0) * (x - x2) / ((x1 - x0) * (x1 - x2));
    let l2 = (x - x0) * (x - x1) / ((x2 - x0) * (x2 - x1));
    y0 * l0 + y1 * l1 + y2 * l2
}
