//! The four drivers of surface pCO2 variability
//!
//! Temperature, salinity, alkalinity and DIC each map to a fixed model
//! variable. [`DriverFields`] holds one field per driver.

use rsesm_core::dataset::Dataset;
use rsesm_core::errors::RSESMResult;
use rsesm_core::field::Field;
use rsesm_core::standard_variables::{VAR_DISSICOS, VAR_SOS, VAR_TALKOS, VAR_TOS};
use rsesm_core::variable::StaticVariableDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// A physical or chemical driver of surface pCO2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Driver {
    Temperature = 0,
    Salinity = 1,
    Alkalinity = 2,
    Dic = 3,
}

impl Driver {
    pub const ALL: [Driver; 4] = [
        Driver::Temperature,
        Driver::Salinity,
        Driver::Alkalinity,
        Driver::Dic,
    ];

    pub fn variable(&self) -> &'static StaticVariableDefinition {
        match self {
            Driver::Temperature => &VAR_TOS,
            Driver::Salinity => &VAR_SOS,
            Driver::Alkalinity => &VAR_TALKOS,
            Driver::Dic => &VAR_DISSICOS,
        }
    }

    /// CMOR short name of the variable holding this driver
    pub fn variable_name(&self) -> &'static str {
        self.variable().name
    }

    pub fn from_variable_name(name: &str) -> Option<Driver> {
        Self::ALL
            .into_iter()
            .find(|driver| driver.variable_name() == name)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variable_name())
    }
}

/// One field per [`Driver`]
///
/// Used both for sensitivities and for the pCO2 contribution of each driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverFields {
    fields: [Field; 4],
}

impl DriverFields {
    /// Build by evaluating `f` for each driver in [`Driver::ALL`] order
    pub fn try_from_fn<F>(mut f: F) -> RSESMResult<Self>
    where
        F: FnMut(Driver) -> RSESMResult<Field>,
    {
        Ok(Self {
            fields: [
                f(Driver::Temperature)?,
                f(Driver::Salinity)?,
                f(Driver::Alkalinity)?,
                f(Driver::Dic)?,
            ],
        })
    }

    pub fn get(&self, driver: Driver) -> &Field {
        &self.fields[driver as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Driver, &Field)> {
        Driver::ALL.into_iter().zip(self.fields.iter())
    }

    /// Apply a fallible transformation to every field
    pub fn try_map<F>(&self, mut f: F) -> RSESMResult<DriverFields>
    where
        F: FnMut(Driver, &Field) -> RSESMResult<Field>,
    {
        Self::try_from_fn(|driver| f(driver, self.get(driver)))
    }

    /// Dataset keyed by the drivers' variable names
    pub fn to_dataset(&self) -> RSESMResult<Dataset> {
        Dataset::from_fields(
            self.iter()
                .map(|(driver, field)| (driver.variable_name(), field.clone())),
        )
    }
}

impl Index<Driver> for DriverFields {
    type Output = Field;

    fn index(&self, driver: Driver) -> &Field {
        self.get(driver)
    }
}
