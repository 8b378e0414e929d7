//! Standard CMOR variables used by the ocean carbon diagnostics.
//!
//! ## Surface ocean physics
//! - `VAR_TOS` - Sea surface temperature in degC
//! - `VAR_SOS` - Sea surface salinity in psu
//!
//! ## Surface ocean carbonate chemistry
//! - `VAR_SPCO2` - Surface aqueous partial pressure of CO2 in uatm
//! - `VAR_TALKOS` - Surface total alkalinity in mmol m-3
//! - `VAR_DISSICOS` - Surface dissolved inorganic carbon in mmol m-3

use crate::define_static_variable;
use crate::variable::StaticVariableDefinition;

define_static_variable!(
    VAR_TOS,
    name = "tos",
    standard_name = "sea_surface_temperature",
    unit = "degC",
    description = "Temperature of the upper boundary of the liquid ocean",
);

define_static_variable!(
    VAR_SOS,
    name = "sos",
    standard_name = "sea_surface_salinity",
    unit = "psu",
    description = "Practical salinity of sea water near the surface",
);

define_static_variable!(
    VAR_SPCO2,
    name = "spco2",
    standard_name = "surface_partial_pressure_of_carbon_dioxide_in_sea_water",
    unit = "uatm",
    description = "Surface aqueous partial pressure of CO2",
);

define_static_variable!(
    VAR_TALKOS,
    name = "talkos",
    standard_name = "sea_water_alkalinity_expressed_as_mole_equivalent",
    unit = "mmol m-3",
    description = "Total alkalinity at the ocean surface",
);

define_static_variable!(
    VAR_DISSICOS,
    name = "dissicos",
    standard_name = "mole_concentration_of_dissolved_inorganic_carbon_in_sea_water",
    unit = "mmol m-3",
    description = "Dissolved inorganic carbon at the ocean surface",
);

pub(crate) static STANDARD_VARIABLES: [&StaticVariableDefinition; 5] =
    [&VAR_TOS, &VAR_SOS, &VAR_SPCO2, &VAR_TALKOS, &VAR_DISSICOS];
