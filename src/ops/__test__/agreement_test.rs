use super::{assert_feasible, random_batch};
use crate::config::ProjectionConfig;
use crate::ops::{project_capped, project_capped_with, CappedMethod};
use approx::assert_abs_diff_eq;

#[test]
fn test_sort_and_root_agree_on_small_rows() {
    for (seed, n) in [(1, 2), (2, 5), (3, 17), (4, 50)] {
        let y = random_batch(seed, 16, n, -1.5, 2.0);
        for s in [0.25, 1.0, n as f64 / 2.0, n as f64 - 0.5] {
            let by_sort = project_capped(&y.view(), s, CappedMethod::Sort).unwrap();
            let by_root = project_capped(&y.view(), s, CappedMethod::Root).unwrap();
            assert_abs_diff_eq!(by_sort, by_root, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_root_handles_long_rows() {
    let y = random_batch(11, 4, 2_000, -3.0, 3.0);
    let x = project_capped(&y.view(), 250.0, CappedMethod::Root).unwrap();
    assert_feasible(&x.view(), 250.0, true);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let y = random_batch(5, 64, 12, -1.0, 1.0);
    let par = ProjectionConfig::default();
    let seq = par.sequential();
    for method in [CappedMethod::Sort, CappedMethod::Root] {
        let a = project_capped_with(&y.view(), 2.0, method, &par).unwrap();
        let b = project_capped_with(&y.view(), 2.0, method, &seq).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_agreement_on_ties() {
    // 동일한 값이 여러 개인 경우
    let y = ndarray::arr2(&[[0.5, 0.5, 0.5, 0.5], [1.0, 1.0, 0.0, 0.0], [3.0, 3.0, 3.0, -3.0]]);
    for s in [1.0, 2.0, 3.0] {
        let by_sort = project_capped(&y.view(), s, CappedMethod::Sort).unwrap();
        let by_root = project_capped(&y.view(), s, CappedMethod::Root).unwrap();
        assert_abs_diff_eq!(by_sort, by_root, epsilon = 1e-6);
        assert_feasible(&by_sort.view(), s, true);
    }
}
