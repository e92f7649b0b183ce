//! Euclidean projection onto the simplex `{x : sum(x) = s, x >= 0}`.
//!
//! Sort-based threshold method (Shalev-Shwartz & Singer 2006, Blondel et
//! al. 2014): sort descending into `mu`, form `css_k = sum(mu_1..mu_k) - s`,
//! take `rho = max{k : mu_k - css_k / k > 0}` and `theta = css_rho / rho`.
//! The projection is `max(y - theta, 0)` applied to the unsorted input, so no
//! inverse permutation is needed.
use crate::config::ProjectionConfig;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::ops::arraytools::{cumsum_along_axis, redim, slice_along_axis, sort_lanes};
use crate::ops::batch::validate_batch;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Ix2, Zip};
use tracing::warn;

/// Projects every row of `batch` onto the simplex with sum `s`.
pub fn project_simplex(batch: &ArrayView2<f64>, s: f64) -> ProjectionResult<Array2<f64>> {
    project_simplex_with(batch, s, &ProjectionConfig::default())
}

pub fn project_simplex_with(
    batch: &ArrayView2<f64>,
    s: f64,
    config: &ProjectionConfig,
) -> ProjectionResult<Array2<f64>> {
    config.validate()?;
    validate_batch(batch)?;
    simplex_along(batch, s, 1, config.parallel)
}

pub(crate) fn check_simplex_constraint(s: f64) -> ProjectionResult<()> {
    if !s.is_finite() {
        return Err(ProjectionError::InvalidConstraint { s, reason: "s must be finite" });
    }
    if s < 0.0 {
        return Err(ProjectionError::InvalidConstraint {
            s,
            reason: "the simplex is empty for s < 0",
        });
    }
    Ok(())
}

/// Projects each lane of `v` along `axis` onto the simplex with sum `s`.
///
/// Error rows are lane indices, i.e. indices along the axis that is *not*
/// projected.
pub fn simplex_along(
    v: &ArrayView2<f64>,
    s: f64,
    axis: usize,
    parallel: bool,
) -> ProjectionResult<Array2<f64>> {
    check_simplex_constraint(s)?;
    if s == 0.0 {
        // 유일한 가능해
        return Ok(Array2::zeros(v.raw_dim()));
    }

    let thetas = thresholds(v, s, axis, parallel)?.insert_axis(Axis(axis));
    Ok((v - &thetas).mapv_into(|x| x.max(0.0)))
}

/// Lagrange multipliers `theta`, one per lane along `axis`.
fn thresholds(v: &ArrayView2<f64>, s: f64, axis: usize, parallel: bool) -> ProjectionResult<Array1<f64>> {
    let n = v.len_of(Axis(axis));

    let mut sorted = v.to_owned();
    sort_lanes(&mut sorted, axis, parallel);
    let mus = slice_along_axis(&sorted.view(), None, None, -1, axis)?;

    let css = cumsum_along_axis(&mus, axis) - s;
    let ks: Array1<f64> = (1..=n).map(|k| k as f64).collect();
    let ks = redim(&ks.view(), 2, axis as isize)?
        .into_dimensionality::<Ix2>()
        .map_err(|e| ProjectionError::invalid_input(e.to_string()))?;
    let margins = &mus - &(&css / &ks);

    let thetas = Zip::from(margins.lanes(Axis(axis)))
        .and(css.lanes(Axis(axis)))
        .map_collect(|margin, cs| lane_threshold(&margin, &cs));

    let result: ProjectionResult<Array1<f64>> = thetas
        .iter()
        .enumerate()
        .map(|(lane, theta)| {
            theta.ok_or_else(|| {
                ProjectionError::numerical("no positive threshold index; magnitudes swamp s")
                    .at_row(lane)
            })
        })
        .collect();
    if let Err(err) = &result {
        warn!(lanes = thetas.len(), error = %err, "simplex projection failed");
    }
    result
}

fn lane_threshold(margin: &ArrayView1<f64>, css: &ArrayView1<f64>) -> Option<f64> {
    let last = margin.iter().rposition(|&m| m > 0.0)?;
    Some(css[last] / (last + 1) as f64)
}
