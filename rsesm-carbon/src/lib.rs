//! Surface ocean carbon diagnostics.
//!
//! Builds on the [`rsesm_core`] data model to provide:
//!
//! - CO2 solubility and Schmidt number from temperature and salinity ([`solubility`])
//! - the Takahashi thermal/non-thermal split and potential pCO2 ([`temperature`])
//! - pCO2 sensitivities to temperature, salinity, alkalinity and DIC ([`sensitivity`])
//! - attribution of pCO2 variability to those drivers, either directly or
//!   through regression onto a climate index ([`decomposition`])
//!
//! Every diagnostic expects the CMOR short names and canonical units listed in
//! [`rsesm_core::standard_variables`].

pub mod decomposition;
pub mod drivers;
pub mod parameters;
#[cfg(feature = "python")]
pub mod python;
pub mod sensitivity;
pub mod solubility;
pub mod temperature;

pub use decomposition::{
    spco2_decomposition, spco2_decomposition_index, AnomalyOptions, Deseasonalize, Detrend,
    IndexRegressionOptions, SlidingWindow,
};
pub use drivers::{Driver, DriverFields};
pub use parameters::DecompositionParameters;
pub use sensitivity::{spco2_sensitivity, BufferFactors};
pub use solubility::{co2_sol, schmidt};
pub use temperature::{potential_pco2, temp_decomp_takahashi, TakahashiVariables};
