//! Tunables for the projection kernels.
//!
//! - [`RootOptions`]: stopping rules of the capped-simplex root finder.
//! - [`ProjectionConfig`]: method-selection threshold, KKT slack, root
//!   options and whether rows are processed on the rayon pool.
//!
//! Both types have `Default` values that are safe for unit-scale data;
//! `new` constructors validate every field and fail with
//! [`ProjectionError::InvalidConfig`].
use crate::errors::{ProjectionError, ProjectionResult};

/// Largest row length for which the dispatcher picks the O(n²) sort method.
pub const DEFAULT_SORT_THRESHOLD: usize = 50;
pub const DEFAULT_KKT_SLACK: f64 = 1e-12;
pub const DEFAULT_ROOT_XTOL: f64 = 1e-12;
pub const DEFAULT_ROOT_FTOL: f64 = 1e-11;
pub const DEFAULT_ROOT_MAX_ITER: usize = 100;

/// Stopping rules for the dual-variable root solve.
///
/// - `xtol`: absolute tolerance on γ (bracket width or step size).
/// - `ftol`: absolute tolerance on the residual `sum(clip(y - γ, 0, 1)) - s`.
/// - `max_iter`: iteration bound; hitting it is a `NumericalFailure`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub xtol: f64,
    pub ftol: f64,
    pub max_iter: usize,
}

impl RootOptions {
    pub fn new(xtol: f64, ftol: f64, max_iter: usize) -> ProjectionResult<Self> {
        let opts = Self { xtol, ftol, max_iter };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> ProjectionResult<()> {
        verify_positive("root.xtol", self.xtol)?;
        verify_positive("root.ftol", self.ftol)?;
        if self.max_iter == 0 {
            return Err(ProjectionError::InvalidConfig {
                field: "root.max_iter",
                value: 0.0,
                reason: "maximum iterations must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for RootOptions {
    fn default() -> Self {
        Self { xtol: DEFAULT_ROOT_XTOL, ftol: DEFAULT_ROOT_FTOL, max_iter: DEFAULT_ROOT_MAX_ITER }
    }
}

/// Configuration shared by every projection entry point.
///
/// Default:
/// - `sort_threshold`: 50
/// - `kkt_slack`: 1e-12
/// - `root`: [`RootOptions::default`]
/// - `parallel`: `true`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub sort_threshold: usize,
    pub kkt_slack: f64,
    pub root: RootOptions,
    pub parallel: bool,
}

impl ProjectionConfig {
    pub fn new(
        sort_threshold: usize, kkt_slack: f64, root: RootOptions, parallel: bool,
    ) -> ProjectionResult<Self> {
        let cfg = Self { sort_threshold, kkt_slack, root, parallel };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ProjectionResult<()> {
        if !self.kkt_slack.is_finite() || self.kkt_slack < 0.0 {
            return Err(ProjectionError::InvalidConfig {
                field: "kkt_slack",
                value: self.kkt_slack,
                reason: "slack must be finite and non-negative",
            });
        }
        self.root.validate()
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            sort_threshold: DEFAULT_SORT_THRESHOLD,
            kkt_slack: DEFAULT_KKT_SLACK,
            root: RootOptions::default(),
            parallel: true,
        }
    }
}

fn verify_positive(field: &'static str, value: f64) -> ProjectionResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ProjectionError::InvalidConfig {
            field,
            value,
            reason: "tolerance must be finite and strictly positive",
        });
    }
    Ok(())
}
