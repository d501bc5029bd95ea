//! A from-scratch Savitzky–Golay filter (degree-2 local polynomial
//! least-squares smoothing), following the same boundary convention as
//! `scipy.signal.savgol_filter`'s default `interp` mode: near the array
//! edges the fitting window is shifted (not centered) rather than padded,
//! so every output point is a genuine local polynomial fit evaluated at
//! itself.

/// Applies one pass of a degree-2 Savitzky–Golay filter with the given
/// odd `window` size.
pub fn savgol_filter(y: &[f64], window: usize, order: usize) -> Vec<f64> {
    let n = y.len();
    assert!(window % 2 == 1, "window size must be odd, got {window}");
    assert!(order < window, "polynomial order must be smaller than window size");

    if n == 0 {
        return Vec::new();
    }
    let window = window.min(n - (1 - n % 2)).max(1);
    let window = if window % 2 == 0 { window.saturating_sub(1).max(1) } else { window };
    let half = (window - 1) / 2;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let start = if i < half {
            0
        } else if i + half >= n {
            n.saturating_sub(window)
        } else {
            i - half
        };
        let end = (start + window).min(n);
        let start = end.saturating_sub(window);

        let offsets: Vec<f64> = (start..end).map(|k| k as f64 - i as f64).collect();
        let values = &y[start..end];
        out.push(fit_value_at_zero(&offsets, values, order));
    }
    out
}

/// Fits a degree-`order` polynomial to `(x, y)` pairs by least squares and
/// returns its value at `x = 0` (the constant coefficient), which is what
/// every Savitzky–Golay output point needs.
fn fit_value_at_zero(x: &[f64], y: &[f64], order: usize) -> f64 {
    let p = order + 1;
    // Normal equations: (X^T X) c = X^T y, X_{k,j} = x_k^j.
    let mut xtx = vec![vec![0.0f64; p]; p];
    let mut xty = vec![0.0f64; p];
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let mut powers = vec![1.0f64; p];
        for j in 1..p {
            powers[j] = powers[j - 1] * xi;
        }
        for a in 0..p {
            xty[a] += powers[a] * yi;
            for b in 0..p {
                xtx[a][b] += powers[a] * powers[b];
            }
        }
    }
    let c = solve_linear_system(xtx, xty);
    c[0]
}

/// Solves a small dense linear system via Gaussian elimination with
/// partial pivoting. `p` is at most 3 for this crate's usage (order 2).
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        let diag = a[col][col];
        if diag.abs() < 1e-14 {
            continue;
        }
        for row in (col + 1)..n {
            let factor = a[row][col] / diag;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = if a[row][row].abs() < 1e-14 { 0.0 } else { sum / a[row][row] };
    }
    x
}
