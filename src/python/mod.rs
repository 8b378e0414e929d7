use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use rsesm_carbon::python::carbon;
use rsesm_core::python::core;

#[pymodule]
#[pyo3(name = "_lib")]
fn rsesm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(carbon))?;

    set_path(m, "rsesm._lib.core", "core")?;
    set_path(m, "rsesm._lib.carbon", "carbon")?;

    Ok(())
}

/// Register a submodule in `sys.modules` so `import rsesm._lib.<module>` works
fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let modules = m.py().import_bound("sys")?.getattr("modules")?;
    modules.set_item(path, m.getattr(module)?)
}
