//! Variable metadata for CMOR-style model output.
//!
//! Earth system model output published through CMIP follows the CMOR naming
//! conventions: short variable names such as `tos` or `spco2`, each with a
//! canonical unit and a CF standard name. This module provides:
//!
//! - [`VariableDefinition`] describing a variable
//! - [`define_static_variable!`] for compile-time definitions
//! - [`lookup`] to find one of the standard variables by short name
//!
//! Units are metadata only. Nothing in the crate converts between units, so
//! callers are responsible for providing fields in the canonical unit.
//!
//! ```rust
//! use rsesm_core::variable::lookup;
//!
//! let tos = lookup("tos").unwrap();
//! assert_eq!(tos.unit, "degC");
//! assert_eq!(tos.standard_name, "sea_surface_temperature");
//! ```

use crate::standard_variables::STANDARD_VARIABLES;
use serde::{Deserialize, Serialize};

/// Definition of a variable with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// CMOR short name (e.g. "spco2")
    pub name: String,
    /// CF standard name
    pub standard_name: String,
    /// Canonical unit (e.g. "degC", "mmol m-3")
    pub unit: String,
    /// Human-readable description
    pub description: String,
}

impl VariableDefinition {
    pub fn new(
        name: impl Into<String>,
        standard_name: impl Into<String>,
        unit: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            standard_name: standard_name.into(),
            unit: unit.into(),
            description: description.into(),
        }
    }
}

/// Static variable definition holder for compile-time definitions.
///
/// Holds `&'static str` references so it can be built in const contexts, and
/// converts to a [`VariableDefinition`] on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticVariableDefinition {
    pub name: &'static str,
    pub standard_name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

impl StaticVariableDefinition {
    pub const fn new(
        name: &'static str,
        standard_name: &'static str,
        unit: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            standard_name,
            unit,
            description,
        }
    }

    pub fn to_variable_definition(&self) -> VariableDefinition {
        VariableDefinition::new(self.name, self.standard_name, self.unit, self.description)
    }
}

/// Macro for defining variables at compile time using static strings.
///
/// ```rust
/// use rsesm_core::define_static_variable;
///
/// define_static_variable!(
///     VAR_THETAO,
///     name = "thetao",
///     standard_name = "sea_water_potential_temperature",
///     unit = "degC",
///     description = "Sea water potential temperature",
/// );
///
/// assert_eq!(VAR_THETAO.name, "thetao");
/// ```
#[macro_export]
macro_rules! define_static_variable {
    (
        $var_name:ident,
        name = $name:expr,
        standard_name = $standard_name:expr,
        unit = $unit:expr,
        description = $desc:expr $(,)?
    ) => {
        #[doc = concat!("Static variable definition for ", $name)]
        pub static $var_name: $crate::variable::StaticVariableDefinition =
            $crate::variable::StaticVariableDefinition::new($name, $standard_name, $unit, $desc);
    };
}

/// Find a standard variable by its short name
pub fn lookup(name: &str) -> Option<VariableDefinition> {
    STANDARD_VARIABLES
        .iter()
        .find(|var| var.name == name)
        .map(|var| var.to_variable_definition())
}

/// All standard variables, sorted by short name
pub fn list() -> Vec<VariableDefinition> {
    let mut result: Vec<VariableDefinition> = STANDARD_VARIABLES
        .iter()
        .map(|var| var.to_variable_definition())
        .collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}
