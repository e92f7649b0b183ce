use crate::errors::{ProjectionError, ProjectionResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;
use tracing::warn;

/// Runs `kernel` on every row of `batch` and stacks the results in order.
///
/// Rows are independent, so with `parallel` they are spread over the rayon
/// pool. If any row fails the whole batch fails with the error of the lowest
/// failing row, tagged with that row's index.
pub fn apply_rows<F>(batch: &ArrayView2<f64>, parallel: bool, kernel: F) -> ProjectionResult<Array2<f64>>
where
    F: Fn(ArrayView1<f64>) -> ProjectionResult<Array1<f64>> + Sync + Send,
{
    let mut result = Array2::zeros(batch.raw_dim());

    let outcomes: Vec<ProjectionResult<()>> = if parallel {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(batch.axis_iter(Axis(0)).into_par_iter())
            .enumerate()
            .map(|(i, (out, row))| run_row(&kernel, i, out, row))
            .collect()
    } else {
        result
            .axis_iter_mut(Axis(0))
            .zip(batch.axis_iter(Axis(0)))
            .enumerate()
            .map(|(i, (out, row))| run_row(&kernel, i, out, row))
            .collect()
    };

    if let Some(err) = outcomes.into_iter().find_map(Result::err) {
        warn!(rows = batch.nrows(), error = %err, "batch projection failed");
        return Err(err);
    }
    Ok(result)
}

fn run_row<F>(kernel: &F, i: usize, mut out: ArrayViewMut1<f64>, row: ArrayView1<f64>) -> ProjectionResult<()>
where
    F: Fn(ArrayView1<f64>) -> ProjectionResult<Array1<f64>>,
{
    let x = kernel(row).map_err(|e| e.at_row(i))?;
    out.assign(&x);
    Ok(())
}

/// Rejects batches with an empty projection axis or non-finite entries.
pub fn validate_batch(batch: &ArrayView2<f64>) -> ProjectionResult<()> {
    if batch.ncols() == 0 {
        return Err(ProjectionError::invalid_input("projection axis has length zero"));
    }
    for (i, row) in batch.axis_iter(Axis(0)).enumerate() {
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(ProjectionError::InvalidInput {
                row: Some(i),
                reason: format!("component {j} is not finite ({})", row[j]),
            });
        }
    }
    Ok(())
}

/// Builds a batch from nested rows, rejecting rows of unequal length.
pub fn batch_from_rows(rows: &[Vec<f64>]) -> ProjectionResult<Array2<f64>> {
    let n = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n) {
        return Err(ProjectionError::InvalidInput {
            row: Some(i),
            reason: format!("row has length {} but the first row has length {n}", rows[i].len()),
        });
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n), flat)
        .map_err(|e| ProjectionError::invalid_input(e.to_string()))
}

/// Computes the sum of each row in a batched manner.
/// x: A 2D array of shape (batch_size, dim).
/// Returns a 1D array of shape (batch_size,).
pub fn row_sums(x: &ArrayView2<f64>) -> Array1<f64> {
    x.sum_axis(Axis(1))
}
