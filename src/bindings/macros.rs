// src/bindings/macros.rs

/// PyFunction 바인딩 생성을 위한 매크로
///
/// 사용법:
/// `create_binding!(파이썬_함수명, Rust_함수_경로, [인자...], 반환_타입);`
///
/// 예시:
/// `create_binding!(project_simplex, crate::ops::simplex::project_simplex, [batch, s], PyArray2);`
///
/// Rust 쪽 `ProjectionError`는 `?`를 통해 Python `ValueError`로 변환됩니다.
#[macro_export]
macro_rules! create_binding {
    // (batch, s) -> Array2<f64>
    ($py_fn_name:ident, $rust_fn:path, [batch, s], PyArray2) => {
        #[pyo3::prelude::pyfunction]
        #[pyo3(signature = (batch, s = 1.0))]
        fn $py_fn_name<'py>(
            py: pyo3::prelude::Python<'py>,
            batch: numpy::PyReadonlyArray2<f64>,
            s: f64,
        ) -> pyo3::prelude::PyResult<&'py numpy::PyArray2<f64>> {
            let batch_arr = batch.as_array();
            let result = $rust_fn(&batch_arr, s)?;
            Ok(numpy::IntoPyArray::into_pyarray(result, py))
        }
    };

    // (batch, s, method) -> Array2<f64>
    ($py_fn_name:ident, $rust_fn:path, [batch, s, method], PyArray2) => {
        #[pyo3::prelude::pyfunction]
        #[pyo3(signature = (batch, s = 1.0, method = "sort"))]
        fn $py_fn_name<'py>(
            py: pyo3::prelude::Python<'py>,
            batch: numpy::PyReadonlyArray2<f64>,
            s: f64,
            method: &str,
        ) -> pyo3::prelude::PyResult<&'py numpy::PyArray2<f64>> {
            let batch_arr = batch.as_array();
            let method = method.parse::<$crate::ops::CappedMethod>()?;
            let result = $rust_fn(&batch_arr, s, method)?;
            Ok(numpy::IntoPyArray::into_pyarray(result, py))
        }
    };
}
