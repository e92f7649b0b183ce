use crate::ops::batch::row_sums;
use ndarray::{Array2, ArrayView2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod agreement_test;
pub mod invariance_test;

pub(crate) const FEASIBILITY_TOL: f64 = 1e-9;

/// Seeded batch with entries drawn from `[low, high)`.
pub(crate) fn random_batch(seed: u64, rows: usize, n: usize, low: f64, high: f64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::random_using((rows, n), Uniform::new(low, high), &mut rng)
}

pub(crate) fn assert_feasible(x: &ArrayView2<f64>, s: f64, capped: bool) {
    for (i, total) in row_sums(x).iter().enumerate() {
        assert!((total - s).abs() <= FEASIBILITY_TOL, "row {i} sums to {total}, expected {s}");
    }
    for &v in x.iter() {
        assert!(v >= 0.0, "negative component {v}");
        if capped {
            assert!(v <= 1.0, "component {v} exceeds the cap");
        }
    }
}

#[test]
fn test_random_batches_are_feasible() {
    use crate::ops::{project_capped, project_simplex, CappedMethod};

    let y = random_batch(7, 32, 20, -2.0, 3.0);
    for s in [0.5, 1.0, 4.0, 13.5] {
        assert_feasible(&project_simplex(&y.view(), s).unwrap().view(), s, false);
        for method in [CappedMethod::Sort, CappedMethod::Root] {
            let x = project_capped(&y.view(), s, method).unwrap();
            assert_feasible(&x.view(), s, true);
        }
    }
}
