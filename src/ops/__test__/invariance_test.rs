use super::random_batch;
use crate::ops::{project_capped, project_simplex, CappedMethod};
use approx::assert_abs_diff_eq;
use ndarray::{arr2, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn permute_columns(x: &Array2<f64>, perm: &[usize]) -> Array2<f64> {
    x.select(Axis(1), perm)
}

#[test]
fn test_permutation_invariance() {
    let y = random_batch(21, 8, 9, -1.0, 2.0);
    let mut perm: Vec<usize> = (0..9).collect();
    perm.shuffle(&mut StdRng::seed_from_u64(3));
    let y_perm = permute_columns(&y, &perm);

    let x = project_simplex(&y.view(), 1.0).unwrap();
    let x_perm = project_simplex(&y_perm.view(), 1.0).unwrap();
    assert_abs_diff_eq!(permute_columns(&x, &perm), x_perm, epsilon = 1e-12);

    for method in [CappedMethod::Sort, CappedMethod::Root] {
        let x = project_capped(&y.view(), 2.5, method).unwrap();
        let x_perm = project_capped(&y_perm.view(), 2.5, method).unwrap();
        assert_abs_diff_eq!(permute_columns(&x, &perm), x_perm, epsilon = 1e-9);
    }
}

#[test]
fn test_feasible_input_is_fixed_point() {
    let y = arr2(&[[0.1, 0.2, 0.3, 0.4], [0.0, 0.5, 0.5, 0.0]]);
    assert_abs_diff_eq!(project_simplex(&y.view(), 1.0).unwrap(), y, epsilon = 1e-12);
    for method in [CappedMethod::Sort, CappedMethod::Root] {
        assert_abs_diff_eq!(project_capped(&y.view(), 1.0, method).unwrap(), y, epsilon = 1e-9);
    }
}

#[test]
fn test_rows_are_independent() {
    let y = random_batch(31, 6, 7, -1.0, 1.0);
    let base = project_capped(&y.view(), 3.0, CappedMethod::Sort).unwrap();

    let mut altered = y.clone();
    altered.row_mut(2).assign(&Array1::from_elem(7, 9.0));
    let out = project_capped(&altered.view(), 3.0, CappedMethod::Sort).unwrap();

    for i in (0..6).filter(|&i| i != 2) {
        assert_eq!(out.row(i), base.row(i));
    }
    assert_abs_diff_eq!(out.row(2).sum(), 3.0, epsilon = 1e-9);
}

#[test]
fn test_failed_row_fails_whole_batch() {
    let mut y = random_batch(41, 5, 4, 0.0, 1.0);
    y[[3, 1]] = f64::NAN;
    let err = project_capped(&y.view(), 1.0, CappedMethod::Root).unwrap_err();
    assert_eq!(err.row(), Some(3));
}
