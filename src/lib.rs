//! Analysis of Earth system model output.
//!
//! - [`rsesm_core`]: labeled fields, datasets and statistics helpers
//! - [`rsesm_carbon`]: surface ocean carbon diagnostics
//!
//! With the `python` feature the crate builds the `rsesm._lib` extension
//! module exposing both as the `core` and `carbon` submodules.

pub use rsesm_carbon;
pub use rsesm_core;

#[cfg(feature = "python")]
mod python;
