use thiserror::Error;

/// Crate-wide result alias for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Failures surfaced by the projection kernels and the dispatcher.
///
/// Row-level kernels report `row: None`; the batch layer attaches the index of
/// the offending row before the error leaves the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Malformed array: wrong rank, ragged rows, empty projection axis,
    /// non-finite entries, bad axis or unknown method token.
    #[error("invalid input{}: {reason}", fmt_row(.row))]
    InvalidInput { row: Option<usize>, reason: String },

    /// The sum constraint is incompatible with the requested target set.
    #[error("invalid sum constraint s = {s}: {reason}")]
    InvalidConstraint { s: f64, reason: &'static str },

    /// A kernel could not produce a sound result for a row.
    #[error("numerical failure{}: {reason}", fmt_row(.row))]
    NumericalFailure { row: Option<usize>, reason: String },

    /// A configuration value is out of its admissible range.
    #[error("invalid configuration `{field}` = {value}: {reason}")]
    InvalidConfig { field: &'static str, value: f64, reason: &'static str },
}

impl ProjectionError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        ProjectionError::InvalidInput { row: None, reason: reason.into() }
    }

    pub(crate) fn numerical(reason: impl Into<String>) -> Self {
        ProjectionError::NumericalFailure { row: None, reason: reason.into() }
    }

    /// Attaches `row` to row-scoped variants that do not carry one yet.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            ProjectionError::InvalidInput { row: None, reason } => {
                ProjectionError::InvalidInput { row: Some(row), reason }
            }
            ProjectionError::NumericalFailure { row: None, reason } => {
                ProjectionError::NumericalFailure { row: Some(row), reason }
            }
            other => other,
        }
    }

    /// Index of the offending row, if the error is row-scoped.
    pub fn row(&self) -> Option<usize> {
        match self {
            ProjectionError::InvalidInput { row, .. }
            | ProjectionError::NumericalFailure { row, .. } => *row,
            _ => None,
        }
    }
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" in row {r}"),
        None => String::new(),
    }
}
