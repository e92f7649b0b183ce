//! Capped simplex `{x : sum(x) = s, 0 <= x <= 1}` by exhaustive KKT search.
//!
//! With `z` the ascending sort of `y`, the projection has the form
//! `[0, a) -> 0`, `[a, b) -> z + gamma`, `[b, n) -> 1` for some pair
//! `0 <= a < b <= n`. For a candidate pair the sum constraint fixes
//!
//! ```text
//! gamma(a, b) = (s + b - n - (C_b - C_a)) / (b - a)
//! ```
//!
//! where `C` are prefix sums with `C_0 = 0`. The pair is accepted when the
//! four boundary conditions hold (`z_{-1} = -inf`, `z_n = +inf`):
//!
//! ```text
//! z_{a-1} + gamma <= 0    z_a + gamma >= 0    z_{b-1} + gamma <= 1    z_b + gamma >= 1
//! ```
//!
//! The scan is O(n^2); the dispatcher only uses it for short rows.
use crate::errors::{ProjectionError, ProjectionResult};
use crate::ops::arraytools::{argsort, cumsum_along_axis, pad_along_axis, take};
use ndarray::{Array1, ArrayView1};

/// Sorted-order description of a capped-simplex projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KktPartition {
    pub a: usize,
    pub b: usize,
    pub gamma: f64,
}

/// Validates `s` against the capped simplex of dimension `n`.
///
/// Returns `Some(fill)` when the feasible set is a single point (`s == 0`
/// gives all zeros, `s == n` all ones) and `None` when a kernel must run.
pub(crate) fn check_capped_constraint(s: f64, n: usize) -> ProjectionResult<Option<f64>> {
    if !s.is_finite() {
        return Err(ProjectionError::InvalidConstraint { s, reason: "s must be finite" });
    }
    if s < 0.0 || s > n as f64 {
        return Err(ProjectionError::InvalidConstraint {
            s,
            reason: "the capped simplex is empty unless 0 <= s <= n",
        });
    }
    if s == 0.0 {
        return Ok(Some(0.0));
    }
    if s == n as f64 {
        return Ok(Some(1.0));
    }
    Ok(None)
}

/// Finds the first `(a, b)` satisfying the KKT boundary conditions.
///
/// `z` is the ascending row padded with one trailing `+inf`; `csum` holds the
/// prefix sums with a leading zero, so both have length `n + 1`. `slack`
/// loosens every comparison to absorb rounding. Only `b > a` is searched.
pub fn find_partition(
    z: &ArrayView1<f64>,
    csum: &ArrayView1<f64>,
    s: f64,
    slack: f64,
) -> Option<KktPartition> {
    let n = csum.len() - 1;
    for a in 0..n {
        let low = if a == 0 { f64::NEG_INFINITY } else { z[a - 1] };
        if let Some(part) = scan_upper(z, csum, s, slack, n, a, low) {
            return Some(part);
        }
    }
    None
}

fn scan_upper(
    z: &ArrayView1<f64>,
    csum: &ArrayView1<f64>,
    s: f64,
    slack: f64,
    n: usize,
    a: usize,
    low: f64,
) -> Option<KktPartition> {
    (a + 1..=n).find_map(|b| {
        let gamma = (s + b as f64 - n as f64 - (csum[b] - csum[a])) / (b - a) as f64;
        let feasible = low + gamma <= slack
            && z[a] + gamma >= -slack
            && z[b - 1] + gamma <= 1.0 + slack
            && z[b] + gamma >= 1.0 - slack;
        feasible.then_some(KktPartition { a, b, gamma })
    })
}

/// Projects one row onto the capped simplex with sum `s`.
pub fn project_capped_sort_row(y: ArrayView1<f64>, s: f64, slack: f64) -> ProjectionResult<Array1<f64>> {
    let n = y.len();
    if let Some(fill) = check_capped_constraint(s, n)? {
        return Ok(Array1::from_elem(n, fill));
    }

    let order = argsort(&y);
    let sorted = take(&y, &order);
    let csum = pad_along_axis(&cumsum_along_axis(&sorted, 0), (1, 0), 0, 0.0);
    let z = pad_along_axis(&sorted, (0, 1), 0, f64::INFINITY);

    let part = find_partition(&z.view(), &csum.view(), s, slack).ok_or_else(|| {
        ProjectionError::numerical("no (a, b) partition satisfies the KKT boundary conditions")
    })?;

    // 정렬 순서 -> 원래 순서
    let mut x = Array1::zeros(n);
    for (k, &i) in order.iter().enumerate() {
        x[i] = if k < part.a {
            0.0
        } else if k < part.b {
            (z[k] + part.gamma).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::batch::apply_rows;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    const SLACK: f64 = 1e-12;
    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_single_spike() {
        let x = project_capped_sort_row(arr1(&[2.0, 0.0, 0.0]).view(), 1.0, SLACK).unwrap();
        assert_abs_diff_eq!(x, arr1(&[1.0, 0.0, 0.0]), epsilon = EPSILON);
    }

    #[test]
    fn test_partition_for_mixed_row() {
        let z = arr1(&[-0.3, 0.2, 0.6, f64::INFINITY]);
        let csum = arr1(&[0.0, -0.3, -0.1, 0.5]);
        let part = find_partition(&z.view(), &csum.view(), 1.0, SLACK).unwrap();
        assert_eq!((part.a, part.b), (1, 3));
        assert_abs_diff_eq!(part.gamma, 0.1, epsilon = EPSILON);

        let x = project_capped_sort_row(arr1(&[0.6, -0.3, 0.2]).view(), 1.0, SLACK).unwrap();
        assert_abs_diff_eq!(x, arr1(&[0.7, 0.0, 0.3]), epsilon = EPSILON);
    }

    #[test]
    fn test_interior_row_is_unchanged() {
        let y = arr1(&[0.2, 0.3, 0.5]);
        let x = project_capped_sort_row(y.view(), 1.0, SLACK).unwrap();
        assert_abs_diff_eq!(x, y, epsilon = EPSILON);
    }

    #[test]
    fn test_upper_cap_is_active() {
        // 두 개가 1로 잘리고 나머지가 0.5를 나눠 가짐
        let y = arr1(&[5.0, 0.1, 4.0, 0.3]);
        let x = project_capped_sort_row(y.view(), 2.5, SLACK).unwrap();
        assert_abs_diff_eq!(x, arr1(&[1.0, 0.15, 1.0, 0.35]), epsilon = EPSILON);
    }

    #[test]
    fn test_trivial_constraints() {
        let y = arr1(&[0.3, -4.0]);
        assert_eq!(project_capped_sort_row(y.view(), 0.0, SLACK).unwrap(), arr1(&[0.0, 0.0]));
        assert_eq!(project_capped_sort_row(y.view(), 2.0, SLACK).unwrap(), arr1(&[1.0, 1.0]));
        assert!(matches!(
            project_capped_sort_row(y.view(), 2.5, SLACK),
            Err(ProjectionError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            project_capped_sort_row(y.view(), -0.5, SLACK),
            Err(ProjectionError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_malformed_row_has_no_partition() {
        // NaN이 섞이면 어떤 조건도 만족하지 못함
        let z = arr1(&[f64::NAN, 0.5, f64::INFINITY]);
        let csum = arr1(&[0.0, f64::NAN, f64::NAN]);
        assert!(find_partition(&z.view(), &csum.view(), 1.0, SLACK).is_none());
    }

    #[test]
    fn test_missing_partition_fails_with_row_index() {
        let err = project_capped_sort_row(arr1(&[f64::NAN, 0.5]).view(), 1.0, SLACK).unwrap_err();
        assert!(matches!(err, ProjectionError::NumericalFailure { row: None, .. }));

        let batch = arr2(&[[0.2, 0.9], [0.4, 0.1], [f64::NAN, 0.5]]);
        for parallel in [false, true] {
            let err = apply_rows(&batch.view(), parallel, |row| project_capped_sort_row(row, 1.0, SLACK))
                .unwrap_err();
            assert!(matches!(err, ProjectionError::NumericalFailure { row: Some(2), .. }));
        }
    }
}
