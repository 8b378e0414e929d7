use crate::decomposition::{
    spco2_decomposition, spco2_decomposition_index, IndexRegressionOptions, SlidingWindow,
};
use crate::drivers::DriverFields;
use crate::parameters::DecompositionParameters;
use crate::sensitivity::spco2_sensitivity;
use crate::solubility;
use crate::temperature::{self, TakahashiVariables};
use pyo3::prelude::*;
use pyo3::{pymodule, Bound, PyResult};
use rsesm_core::errors::RSESMResult;
use rsesm_core::python::{PyDataset, PyField};
use std::collections::HashMap;

fn to_dict(fields: DriverFields) -> HashMap<&'static str, PyField> {
    fields
        .iter()
        .map(|(driver, field)| (driver.variable_name(), PyField(field.clone())))
        .collect()
}

fn decomposition_parameters(
    detrend: bool,
    order: Option<usize>,
    deseasonalize: bool,
    sliding_window: Option<i32>,
    psig: Option<f64>,
) -> RSESMResult<IndexRegressionOptions> {
    let parameters = DecompositionParameters {
        detrend,
        order,
        deseasonalize,
        sliding_window: sliding_window.map_or(SlidingWindow::FullSeries, SlidingWindow::Years),
        psig,
    };
    IndexRegressionOptions::try_from(&parameters)
}

/// CO2 solubility (mol kg-1 atm-1) for the mean temperature and salinity
#[pyfunction]
fn co2_sol(t: PyRef<'_, PyField>, s: PyRef<'_, PyField>) -> f64 {
    solubility::co2_sol(&t.0, &s.0)
}

/// Schmidt number of CO2 for the mean temperature
#[pyfunction]
fn schmidt(t: PyRef<'_, PyField>) -> f64 {
    solubility::schmidt(&t.0)
}

/// Thermal and non-thermal pCO2 components, returned as a tuple
#[pyfunction]
#[pyo3(signature = (ds, time_dim="time", temperature="tos", pco2="spco2"))]
fn temp_decomp_takahashi(
    ds: PyRef<'_, PyDataset>,
    time_dim: &str,
    temperature: &str,
    pco2: &str,
) -> PyResult<(PyField, PyField)> {
    let names = TakahashiVariables {
        time_dim: time_dim.to_string(),
        temperature: temperature.to_string(),
        pco2: pco2.to_string(),
    };
    let result = temperature::temp_decomp_takahashi(&ds.0, &names)?;
    Ok((PyField(result.thermal), PyField(result.non_thermal)))
}

#[pyfunction]
#[pyo3(signature = (t_insitu, pco2_insitu, depth_dim="depth"))]
fn potential_pco2(
    t_insitu: PyRef<'_, PyField>,
    pco2_insitu: PyRef<'_, PyField>,
    depth_dim: &str,
) -> PyResult<PyField> {
    Ok(PyField(temperature::potential_pco2(
        &t_insitu.0,
        &pco2_insitu.0,
        depth_dim,
    )?))
}

/// Sensitivity of pCO2 to each driver, keyed by variable name
#[pyfunction(name = "spco2_sensitivity")]
fn py_spco2_sensitivity(ds: PyRef<'_, PyDataset>) -> PyResult<HashMap<&'static str, PyField>> {
    Ok(to_dict(spco2_sensitivity(&ds.0)?))
}

/// Contribution of each driver to pCO2 variability, keyed by variable name
#[pyfunction(name = "spco2_decomposition")]
#[pyo3(signature = (ds, detrend=true, order=Some(1), deseasonalize=false))]
fn py_spco2_decomposition(
    ds: PyRef<'_, PyDataset>,
    detrend: bool,
    order: Option<usize>,
    deseasonalize: bool,
) -> PyResult<HashMap<&'static str, PyField>> {
    let options = decomposition_parameters(detrend, order, deseasonalize, None, None)?;
    Ok(to_dict(spco2_decomposition(&ds.0, &options.anomaly)?))
}

/// Contribution of each driver to the pCO2 response to a climate index
///
/// A `sliding_window` of None regresses once over the full record.
#[pyfunction(name = "spco2_decomposition_index")]
#[pyo3(signature = (ds, index, detrend=true, order=Some(1), deseasonalize=false, sliding_window=Some(10), psig=None))]
#[allow(clippy::too_many_arguments)]
fn py_spco2_decomposition_index(
    ds: PyRef<'_, PyDataset>,
    index: PyRef<'_, PyField>,
    detrend: bool,
    order: Option<usize>,
    deseasonalize: bool,
    sliding_window: Option<i32>,
    psig: Option<f64>,
) -> PyResult<HashMap<&'static str, PyField>> {
    let options = decomposition_parameters(detrend, order, deseasonalize, sliding_window, psig)?;
    Ok(to_dict(spco2_decomposition_index(&ds.0, &index.0, &options)?))
}

#[pymodule]
pub fn carbon(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(co2_sol, m)?)?;
    m.add_function(wrap_pyfunction!(schmidt, m)?)?;
    m.add_function(wrap_pyfunction!(temp_decomp_takahashi, m)?)?;
    m.add_function(wrap_pyfunction!(potential_pco2, m)?)?;
    m.add_function(wrap_pyfunction!(py_spco2_sensitivity, m)?)?;
    m.add_function(wrap_pyfunction!(py_spco2_decomposition, m)?)?;
    m.add_function(wrap_pyfunction!(py_spco2_decomposition_index, m)?)?;
    Ok(())
}
