//! Core data model for analysing gridded Earth system model output.
//!
//! Model output is represented as [`field::Field`]s (labeled n-dimensional
//! arrays) grouped into [`dataset::Dataset`]s that share a coordinate system.
//! The [`stats`] module provides the NaN-aware means, detrending, climatology
//! and regression helpers that diagnostics are built from.

pub mod dataset;
pub mod errors;
pub mod field;
#[cfg(feature = "python")]
pub mod python;
pub mod standard_variables;
pub mod stats;
pub mod time_axis;
pub mod variable;
