//! Python bindings for fields and datasets
//!
//! Fields cross the boundary as numpy arrays plus a list of dimension names.
//! Coordinates are passed as a dict of 1-D arrays keyed by dimension name.

use crate::dataset::Dataset;
use crate::errors::RSESMError;
use crate::field::Field;
use crate::stats;
use crate::variable;
use numpy::{IntoPyArray, PyArray1, PyArrayDyn, PyReadonlyArray1, PyReadonlyArrayDyn, ToPyArray};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

impl From<RSESMError> for PyErr {
    fn from(err: RSESMError) -> PyErr {
        match err {
            RSESMError::MissingDetrendOrder => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// A labeled n-dimensional array
///
/// Example:
///     sst = Field(values, ["time", "lat", "lon"], coords={"time": years}, units="degC")
#[pyclass(name = "Field", module = "rsesm.core")]
#[derive(Debug, Clone)]
pub struct PyField(pub Field);

#[pymethods]
impl PyField {
    #[new]
    #[pyo3(signature = (values, dims, coords=None, units=None))]
    fn new(
        values: PyReadonlyArrayDyn<'_, f64>,
        dims: Vec<String>,
        coords: Option<HashMap<String, PyReadonlyArray1<'_, f64>>>,
        units: Option<String>,
    ) -> PyResult<Self> {
        let mut field = Field::new(dims, values.as_array().to_owned())?;
        for (dim, coord) in coords.unwrap_or_default() {
            field = field.with_coord(&dim, coord.as_array().to_owned())?;
        }
        if let Some(units) = units {
            field = field.with_units(units);
        }
        Ok(Self(field))
    }

    /// Values as a numpy array
    #[getter]
    fn values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.0.values().clone().into_pyarray_bound(py)
    }

    #[getter]
    fn dims(&self) -> Vec<String> {
        self.0.dims().to_vec()
    }

    #[getter]
    fn units(&self) -> Option<String> {
        self.0.units().map(str::to_string)
    }

    /// Coordinate values attached to `dim`, if any
    fn coord<'py>(&self, py: Python<'py>, dim: &str) -> Option<Bound<'py, PyArray1<f64>>> {
        self.0.coord(dim).map(|c| c.to_pyarray_bound(py))
    }

    /// NaN-skipping mean along `dim`
    fn mean(&self, dim: &str) -> PyResult<Self> {
        Ok(Self(stats::nanmean(&self.0, dim)?))
    }

    fn __repr__(&self) -> String {
        format!(
            "Field(dims={:?}, shape={:?}, units={:?})",
            self.0.dims(),
            self.0.shape(),
            self.0.units()
        )
    }
}

/// A mapping of variable names to fields sharing a coordinate system
#[pyclass(name = "Dataset", module = "rsesm.core")]
#[derive(Debug, Clone, Default)]
pub struct PyDataset(pub Dataset);

#[pymethods]
impl PyDataset {
    #[new]
    #[pyo3(signature = (variables=None))]
    fn new(variables: Option<HashMap<String, PyField>>) -> PyResult<Self> {
        let fields = variables
            .unwrap_or_default()
            .into_iter()
            .map(|(name, field)| (name, field.0));
        Ok(Self(Dataset::from_fields(fields)?))
    }

    fn insert(&mut self, name: String, field: PyField) -> PyResult<()> {
        self.0.insert(name, field.0)?;
        Ok(())
    }

    fn get(&self, name: &str) -> Option<PyField> {
        self.0.get(name).cloned().map(PyField)
    }

    fn keys(&self) -> Vec<String> {
        self.0.names().map(str::to_string).collect()
    }

    fn __getitem__(&self, name: &str) -> PyResult<PyField> {
        self.get(name)
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))
    }

    fn __contains__(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!("Dataset(variables={:?})", self.keys())
    }
}

/// Metadata of the standard CMOR variables as a list of dicts
#[pyfunction]
fn standard_variables() -> Vec<HashMap<&'static str, String>> {
    variable::list()
        .into_iter()
        .map(|var| {
            HashMap::from([
                ("name", var.name),
                ("standard_name", var.standard_name),
                ("unit", var.unit),
                ("description", var.description),
            ])
        })
        .collect()
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyField>()?;
    m.add_class::<PyDataset>()?;
    m.add_function(wrap_pyfunction!(standard_variables, m)?)?;
    Ok(())
}
