use crate::ops::{dispatch, Method};
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::prelude::*;

create_binding!(project_simplex, crate::ops::simplex::project_simplex, [batch, s], PyArray2);
create_binding!(project_capped, crate::ops::dispatch::project_capped, [batch, s, method], PyArray2);

#[pyfunction]
#[pyo3(signature = (arr, s = 1.0, axis = -1, method = None))]
pub fn project<'py>(
    py: Python<'py>,
    arr: PyReadonlyArrayDyn<f64>,
    s: f64,
    axis: isize,
    method: Option<&str>,
) -> PyResult<&'py PyArrayDyn<f64>> {
    let method = method.map(str::parse::<Method>).transpose()?;
    let arr_view = arr.as_array();
    let result = dispatch::project(&arr_view, s, axis, method)?;
    Ok(result.into_pyarray(py))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(project_simplex, m)?)?;
    m.add_function(wrap_pyfunction!(project_capped, m)?)?;
    m.add_function(wrap_pyfunction!(project, m)?)?;
    Ok(())
}
