#[macro_use]
mod macros;

mod simplex;

use crate::errors::ProjectionError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

impl From<ProjectionError> for PyErr {
    fn from(err: ProjectionError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// simplexers - simplex and capped simplex projections in Rust
#[pymodule]
pub fn simplexers(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    simplex::register(m)?;
    Ok(())
}
