//! Method selection and batch orchestration.
//!
//! - [`Method`] / [`CappedMethod`]: closed set of projection kernels.
//! - [`project_capped`]: capped simplex over the rows of a batch.
//! - [`project`]: unified entry point for rank-1 and rank-2 arrays with an
//!   arbitrary projection axis.
use crate::config::ProjectionConfig;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::ops::arraytools::{is_array1d, normalize_axis};
use crate::ops::batch::{apply_rows, validate_batch};
use crate::ops::capped_root::project_capped_root_row;
use crate::ops::capped_sort::{check_capped_constraint, project_capped_sort_row};
use crate::ops::simplex::project_simplex_with;
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, Axis, Ix2};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Kernel for the capped simplex `{x : sum(x) = s, 0 <= x <= 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CappedMethod {
    /// Exhaustive KKT partition search, O(n^2).
    Sort,
    /// Safeguarded Newton on the dual variable.
    Root,
}

/// Projection requested from [`project`].
///
/// Parsing accepts case-insensitive `"sort"`, `"root"`, `"probability"` and
/// `"simplex"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Sort,
    Root,
    /// Probability simplex; only valid with `s == 1`.
    Probability,
    /// Simplex `{x : sum(x) = s, x >= 0}` for any `s >= 0`.
    Simplex,
}

impl Method {
    /// Returns `requested`, or the capped kernel suited to rows of length `n`.
    pub fn select(requested: Option<Method>, n: usize, config: &ProjectionConfig) -> Method {
        requested.unwrap_or(if n <= config.sort_threshold { Method::Sort } else { Method::Root })
    }

    pub fn capped(self) -> Option<CappedMethod> {
        match self {
            Method::Sort => Some(CappedMethod::Sort),
            Method::Root => Some(CappedMethod::Root),
            Method::Probability | Method::Simplex => None,
        }
    }
}

impl FromStr for Method {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sort" => Ok(Method::Sort),
            "root" => Ok(Method::Root),
            "probability" => Ok(Method::Probability),
            "simplex" => Ok(Method::Simplex),
            _ => Err(ProjectionError::invalid_input(format!(
                "unknown method '{s}'; valid options are 'sort', 'root', 'probability' or 'simplex'"
            ))),
        }
    }
}

impl FromStr for CappedMethod {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Method>()?.capped().ok_or_else(|| {
            ProjectionError::invalid_input(format!(
                "'{s}' is not a capped simplex method; valid options are 'sort' or 'root'"
            ))
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Sort => "sort",
            Method::Root => "root",
            Method::Probability => "probability",
            Method::Simplex => "simplex",
        };
        f.write_str(name)
    }
}

/// Projects every row of `batch` onto the capped simplex with sum `s`.
pub fn project_capped(
    batch: &ArrayView2<f64>,
    s: f64,
    method: CappedMethod,
) -> ProjectionResult<Array2<f64>> {
    project_capped_with(batch, s, method, &ProjectionConfig::default())
}

pub fn project_capped_with(
    batch: &ArrayView2<f64>,
    s: f64,
    method: CappedMethod,
    config: &ProjectionConfig,
) -> ProjectionResult<Array2<f64>> {
    config.validate()?;
    validate_batch(batch)?;
    if let Some(fill) = check_capped_constraint(s, batch.ncols())? {
        return Ok(Array2::from_elem(batch.raw_dim(), fill));
    }

    match method {
        CappedMethod::Sort => {
            let slack = config.kkt_slack;
            apply_rows(batch, config.parallel, |row| project_capped_sort_row(row, s, slack))
        }
        CappedMethod::Root => {
            let opts = config.root;
            apply_rows(batch, config.parallel, |row| project_capped_root_row(row, s, &opts))
        }
    }
}

/// Projects `arr` along `axis` with the default configuration.
///
/// `arr` must have rank 1 or 2; the result has the same shape. With
/// `method = None` the capped simplex is used and the kernel is picked from
/// the row length.
pub fn project(
    arr: &ArrayViewD<f64>,
    s: f64,
    axis: isize,
    method: Option<Method>,
) -> ProjectionResult<ArrayD<f64>> {
    project_with(arr, s, axis, method, &ProjectionConfig::default())
}

pub fn project_with(
    arr: &ArrayViewD<f64>,
    s: f64,
    axis: isize,
    method: Option<Method>,
    config: &ProjectionConfig,
) -> ProjectionResult<ArrayD<f64>> {
    let ndim = arr.ndim();
    if ndim == 0 || ndim > 2 {
        return Err(ProjectionError::invalid_input(format!(
            "expected a 1-D or 2-D array, got rank {ndim}"
        )));
    }
    let ax = normalize_axis(axis, ndim)?;

    // 투영 축을 마지막으로
    let view = arr.view();
    let (batch, transposed) = if is_array1d(arr) {
        (to_ix2(view.insert_axis(Axis(0)))?, false)
    } else if ax == 0 {
        (to_ix2(view)?.reversed_axes(), true)
    } else {
        (to_ix2(view)?, false)
    };

    let method = Method::select(method, batch.ncols(), config);
    debug!(shape = ?arr.shape(), axis = ax, %method, s, "projecting");

    let out = run_method(method, &batch, s, config)?;

    let out = if transposed { out.reversed_axes() } else { out };
    if is_array1d(arr) {
        Ok(out.index_axis_move(Axis(0), 0).into_dyn())
    } else {
        Ok(out.into_dyn())
    }
}

fn run_method(
    method: Method,
    batch: &ArrayView2<f64>,
    s: f64,
    config: &ProjectionConfig,
) -> ProjectionResult<Array2<f64>> {
    match method {
        Method::Probability => {
            if s != 1.0 {
                return Err(ProjectionError::InvalidConstraint {
                    s,
                    reason: "the probability simplex requires s == 1; use 'simplex' for other sums",
                });
            }
            project_simplex_with(batch, s, config)
        }
        Method::Simplex => project_simplex_with(batch, s, config),
        Method::Sort => project_capped_with(batch, s, CappedMethod::Sort, config),
        Method::Root => project_capped_with(batch, s, CappedMethod::Root, config),
    }
}

fn to_ix2(view: ArrayViewD<'_, f64>) -> ProjectionResult<ArrayView2<'_, f64>> {
    view.into_dimensionality::<Ix2>()
        .map_err(|e| ProjectionError::invalid_input(e.to_string()))
}
