//! Axis-aware helpers for manipulating the shape and ordering of ndarrays.

use crate::errors::{ProjectionError, ProjectionResult};
use ndarray::{
    Array, Array1, ArrayBase, ArrayD, ArrayView, ArrayView1, ArrayViewMut1, Axis, Data, Dimension,
    IxDyn, Slice, Zip,
};

pub fn is_array1d<S: Data, D: Dimension>(x: &ArrayBase<S, D>) -> bool {
    x.ndim() == 1
}

pub fn is_array2d<S: Data, D: Dimension>(x: &ArrayBase<S, D>) -> bool {
    x.ndim() == 2
}

/// Returns the non-negative index of `axis` for an array of rank `ndim`.
///
/// Negative axes count from the end (`-1` is the last axis).
pub fn normalize_axis(axis: isize, ndim: usize) -> ProjectionResult<usize> {
    let rank = ndim as isize;
    let ax = if axis < 0 { axis + rank } else { axis };
    if ax < 0 || ax >= rank {
        return Err(ProjectionError::invalid_input(format!(
            "axis {axis} is out of bounds for an array of rank {ndim}"
        )));
    }
    Ok(ax as usize)
}

/// Pads `arr` with `value` along a single axis.
///
/// `pad = (before, after)` is the number of elements inserted before index 0
/// and after the last index of `axis`. All other axes are left untouched.
pub fn pad_along_axis<A, S, D>(
    arr: &ArrayBase<S, D>,
    pad: (usize, usize),
    axis: usize,
    value: A,
) -> Array<A, D>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    let (before, after) = pad;
    let len = arr.len_of(Axis(axis));
    let mut dim = arr.raw_dim();
    dim[axis] = before + len + after;

    let mut out = Array::from_elem(dim, value);
    out.slice_axis_mut(Axis(axis), Slice::from(before..before + len)).assign(arr);
    out
}

/// Returns a view of `arr` sliced along `axis` from `start` to `stop` in
/// `step` steps.
///
/// Follows ndarray slicing semantics: a negative `step` walks the selected
/// range backwards, so `(None, None, -1)` reverses the axis.
pub fn slice_along_axis<'a, A, D>(
    arr: &ArrayView<'a, A, D>,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    axis: usize,
) -> ProjectionResult<ArrayView<'a, A, D>>
where
    D: Dimension,
{
    if step == 0 {
        return Err(ProjectionError::invalid_input("slice step must be non-zero"));
    }
    let mut view = arr.clone();
    view.slice_axis_inplace(Axis(axis), Slice::new(start.unwrap_or(0), stop, step));
    Ok(view)
}

/// Embeds the 1-D array `x` along `axis` of an `ndim`-rank array whose
/// length is one along every other axis.
///
/// Unlike plain broadcasting this does not require `axis` to be trailing:
/// `redim([1, 2, 3, 4], 2, 0)` has shape `(4, 1)`.
pub fn redim<A: Clone>(x: &ArrayView1<A>, ndim: usize, axis: isize) -> ProjectionResult<ArrayD<A>> {
    let ax = normalize_axis(axis, ndim)?;
    let mut shape = vec![1; ndim];
    shape[ax] = x.len();

    x.to_owned()
        .into_shape(IxDyn(&shape))
        .map_err(|e| ProjectionError::invalid_input(e.to_string()))
}

/// Running sums along `axis`.
pub fn cumsum_along_axis<S, D>(arr: &ArrayBase<S, D>, axis: usize) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = arr.to_owned();
    out.accumulate_axis_inplace(Axis(axis), |&prev, curr| *curr += prev);
    out
}

/// Sorts every lane along `axis` in ascending order.
pub fn sort_lanes<D: Dimension>(arr: &mut Array<f64, D>, axis: usize, parallel: bool) {
    let lanes = Zip::from(arr.lanes_mut(Axis(axis)));
    if parallel {
        lanes.par_for_each(sort_lane);
    } else {
        lanes.for_each(sort_lane);
    }
}

fn sort_lane(mut lane: ArrayViewMut1<f64>) {
    if let Some(slice) = lane.as_slice_mut() {
        slice.sort_by(f64::total_cmp);
        return;
    }
    let mut buf = lane.to_vec();
    buf.sort_by(f64::total_cmp);
    lane.iter_mut().zip(buf).for_each(|(dst, src)| *dst = src);
}

/// Indices that sort `x` ascending.
pub fn argsort(x: &ArrayView1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&i, &j| x[i].total_cmp(&x[j]));
    order
}

/// Gathers `x[order[k]]` for every `k`.
pub fn take(x: &ArrayView1<f64>, order: &[usize]) -> Array1<f64> {
    order.iter().map(|&i| x[i]).collect()
}
