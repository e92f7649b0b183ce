//! Capped simplex projection by 1-D root finding on the dual variable.
//!
//! The projection is `x = clip(y - gamma, 0, 1)` where `gamma` is the root of
//!
//! ```text
//! g(gamma) = s - sum_i clip(y_i - gamma, 0, 1)
//! ```
//!
//! `g` is continuous, piecewise linear and non-decreasing. On
//! `[min(y) - 1, max(y)]` it goes from `s - n` to `s`, so for `0 < s < n` the
//! bracket always changes sign. The solver is a safeguarded Newton iteration:
//! the slope of `g` is the number of components strictly inside `(0, 1)`, and
//! a bisection step replaces Newton whenever that count is zero or the step
//! leaves the current bracket.
use crate::config::RootOptions;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::ops::capped_sort::check_capped_constraint;
use ndarray::{Array1, ArrayView1};
use tracing::trace;

/// Converged dual variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualRoot {
    pub gamma: f64,
    pub iterations: usize,
}

/// Evaluates `g(gamma)` and its slope (count of unclipped components).
pub fn dual_residual(y: &ArrayView1<f64>, gamma: f64, s: f64) -> (f64, usize) {
    let mut total = 0.0;
    let mut active = 0;
    for &v in y.iter() {
        let d = v - gamma;
        if d >= 1.0 {
            total += 1.0;
        } else if d > 0.0 {
            total += d;
            active += 1;
        }
    }
    (s - total, active)
}

/// `[min(y) - 1, max(y)]`: every component clips to 1 at the lower end and
/// to 0 at the upper end.
pub fn dual_bracket(y: &ArrayView1<f64>) -> (f64, f64) {
    let (lo, hi) = y
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    (lo - 1.0, hi)
}

/// Solves `g(gamma) = 0` inside [`dual_bracket`].
pub fn solve_dual(y: &ArrayView1<f64>, s: f64, opts: &RootOptions) -> ProjectionResult<DualRoot> {
    let (mut lo, mut hi) = dual_bracket(y);
    let (g_lo, _) = dual_residual(y, lo, s);
    let (g_hi, _) = dual_residual(y, hi, s);

    if !(g_lo <= 0.0 && g_hi >= 0.0) {
        return Err(ProjectionError::numerical(format!(
            "bracket [{lo}, {hi}] does not change sign (g = {g_lo}, {g_hi})"
        )));
    }
    if g_lo == 0.0 {
        return Ok(DualRoot { gamma: lo, iterations: 0 });
    }
    if g_hi == 0.0 {
        return Ok(DualRoot { gamma: hi, iterations: 0 });
    }

    // 클리핑이 없다고 가정한 추정값에서 시작
    let mut gamma = ((y.sum() - s) / y.len() as f64).clamp(lo, hi);

    for iter in 1..=opts.max_iter {
        let (g, active) = dual_residual(y, gamma, s);
        if g.abs() <= opts.ftol {
            trace!(gamma, iter, "dual root converged on residual");
            return Ok(DualRoot { gamma, iterations: iter });
        }
        if g < 0.0 {
            lo = gamma;
        } else {
            hi = gamma;
        }
        if hi - lo <= opts.xtol {
            let gamma = 0.5 * (lo + hi);
            trace!(gamma, iter, "dual root converged on bracket width");
            return Ok(DualRoot { gamma, iterations: iter });
        }

        let newton = if active > 0 { gamma - g / active as f64 } else { f64::NAN };
        let next = if newton > lo && newton < hi { newton } else { 0.5 * (lo + hi) };
        if (next - gamma).abs() <= opts.xtol {
            trace!(gamma = next, iter, "dual root converged on step size");
            return Ok(DualRoot { gamma: next, iterations: iter });
        }
        gamma = next;
    }

    Err(ProjectionError::numerical(format!(
        "dual root not found within {} iterations (bracket [{lo}, {hi}])",
        opts.max_iter
    )))
}

/// Projects one row onto the capped simplex with sum `s`.
pub fn project_capped_root_row(
    y: ArrayView1<f64>,
    s: f64,
    opts: &RootOptions,
) -> ProjectionResult<Array1<f64>> {
    let n = y.len();
    if let Some(fill) = check_capped_constraint(s, n)? {
        return Ok(Array1::from_elem(n, fill));
    }
    let root = solve_dual(&y, s, opts)?;
    Ok(y.mapv(|v| (v - root.gamma).clamp(0.0, 1.0)))
}
