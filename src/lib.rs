//! simplexers: Euclidean projections onto the simplex and the capped simplex.
//!
//! Given a real vector `y`, the projections compute the closest point `x` in
//!
//! - the simplex `{x : sum(x) = s, x >= 0}` (sort-threshold method), or
//! - the capped simplex `{x : sum(x) = s, 0 <= x <= 1}` (exhaustive KKT
//!   partition search for short rows, safeguarded root finding on the dual
//!   variable for long rows).
//!
//! Batches are `ndarray` matrices whose rows are projected independently,
//! optionally in parallel on the rayon pool. [`project`] accepts rank-1 or
//! rank-2 arrays, an arbitrary projection axis and an optional [`Method`].
//!
//! With the `python` feature the crate also builds the `simplexers` Python
//! extension module.

pub mod config;
pub mod errors;
pub mod ops;

#[cfg(feature = "python")]
mod bindings;

pub use config::{ProjectionConfig, RootOptions};
pub use errors::{ProjectionError, ProjectionResult};
pub use ops::{
    project, project_capped, project_capped_with, project_simplex, project_simplex_with,
    project_with, CappedMethod, Method,
};
