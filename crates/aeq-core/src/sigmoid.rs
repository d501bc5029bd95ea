//! The sigmoid crossover used to blend a "normal" and a "treble" behavior
//! across a transition band, shared by the smoother, the gain curve
//! builder, and the compensator's bass-boost shaping.

/// Logistic function.
#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Evaluates the sigmoid crossover between `a_lo` (below `f_l`) and `a_hi`
/// (above `f_u`) at frequency `f`.
///
/// `f_c` is the geometric mean of the transition band, and the logistic
/// argument is scaled so the transition spans roughly `f_c / f_l .. f_u`
/// over four logistic half-widths. Requires `f_u > f_l`.
pub fn sigmoid_at(f: f64, f_l: f64, f_u: f64, a_lo: f64, a_hi: f64) -> f64 {
    debug_assert!(f_u > f_l, "upper bound must exceed lower bound");
    let f_c = (f_u / f_l).sqrt() * f_l;
    let half_range = f_u.log10() - f_c.log10();
    let k = logistic((f.log10() - f_c.log10()) / (half_range / 4.0));
    a_lo + k * (a_hi - a_lo)
}

/// Evaluates the sigmoid crossover at every frequency in `freqs`.
pub fn sigmoid_curve(freqs: &[f64], f_l: f64, f_u: f64, a_lo: f64, a_hi: f64) -> Vec<f64> {
    freqs.iter().map(|&f| sigmoid_at(f, f_l, f_u, a_lo, a_hi)).collect()
}
