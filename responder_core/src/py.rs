//! Python bindings for the responder using PyO3

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::calculator::evaluate;
use crate::config::Config;
use crate::normalize::normalize;
use crate::responder::Responder;

/// Normalize text the way the matcher sees it (Python function)
#[pyfunction]
#[pyo3(name = "normalize")]
pub fn py_normalize(text: &str) -> String {
    normalize(text)
}

/// Evaluate an arithmetic expression; errors come back as their message
#[pyfunction]
#[pyo3(name = "evaluate")]
pub fn py_evaluate(expression: &str) -> String {
    match evaluate(expression) {
        Ok(n) => n.to_string(),
        Err(e) => e.to_string(),
    }
}

/// Python wrapper for the responder
#[pyclass(name = "Responder")]
pub struct PyResponder {
    inner: Responder,
}

#[pymethods]
impl PyResponder {
    /// Build from a TOML config file, or from `responder.toml` / defaults
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = Config::load(config_path.as_deref())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let inner =
            Responder::from_config(&config).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Reply to one message
    fn respond(&self, py: Python<'_>, message: &str) -> PyResult<String> {
        py.allow_threads(|| self.inner.get_response(message))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}
