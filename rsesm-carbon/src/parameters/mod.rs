//! Constants and configuration for the carbon diagnostics
//!
//! Physical constants live in [`chemistry`]. [`DecompositionParameters`] is the
//! serialisable form of the decomposition options, suitable for loading from
//! a TOML configuration file.

pub mod chemistry;
mod decomposition;

pub use decomposition::DecompositionParameters;
