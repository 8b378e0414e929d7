//! Sensitivity of surface pCO2 to its drivers
//!
//! Following Lovenduski et al. (2007), the absolute sensitivities are
//!
//! - temperature: `0.0423 pCO2`
//! - salinity: `pCO2 / S`
//! - alkalinity: `pCO2 * bf_ALK / ALK`
//! - DIC: `pCO2 * bf_DIC / DIC`
//!
//! where the buffer factors use the carbonate-alkalinity approximation
//! (see [`BufferFactors`]).

use crate::drivers::{Driver, DriverFields};
use crate::parameters::chemistry::PCO2_TEMPERATURE_SENSITIVITY;
use log::debug;
use rsesm_core::dataset::Dataset;
use rsesm_core::errors::RSESMResult;
use rsesm_core::field::Field;
use rsesm_core::standard_variables::{VAR_DISSICOS, VAR_SOS, VAR_SPCO2, VAR_TALKOS, VAR_TOS};

/// Variables required by [`spco2_sensitivity`] and the decompositions, in the
/// order missing names are reported
pub fn required_variables() -> [&'static str; 5] {
    [
        VAR_SPCO2.name,
        VAR_TOS.name,
        VAR_SOS.name,
        VAR_TALKOS.name,
        VAR_DISSICOS.name,
    ]
}

/// Relative sensitivities of pCO2 to alkalinity and DIC
///
/// $$bf_{ALK} = -\frac{ALK^2}{(2 DIC - ALK)(ALK - DIC)}$$
/// $$bf_{DIC} = \frac{3 \, ALK \, DIC - 2 DIC^2}{(2 DIC - ALK)(ALK - DIC)}$$
#[derive(Debug, Clone, PartialEq)]
pub struct BufferFactors {
    pub alkalinity: Field,
    pub dic: Field,
}

impl BufferFactors {
    pub fn from_carbonate_system(alkalinity: &Field, dic: &Field) -> RSESMResult<Self> {
        let denominator = |alk: f64, dic: f64| (2.0 * dic - alk) * (alk - dic);
        Ok(Self {
            alkalinity: alkalinity
                .zip_with(dic, |alk, dic| -alk * alk / denominator(alk, dic))?
                .without_units(),
            dic: alkalinity
                .zip_with(dic, |alk, dic| {
                    (3.0 * alk * dic - 2.0 * dic * dic) / denominator(alk, dic)
                })?
                .without_units(),
        })
    }
}

fn sensitivity_units(pco2: &Field, driver: Driver) -> Option<String> {
    pco2.units()
        .map(|units| format!("{} ({})-1", units, driver.variable().unit))
}

/// Absolute sensitivity of pCO2 to each driver at every point
///
/// Requires `spco2`, `tos`, `sos`, `talkos` and `dissicos`; if any are absent the
/// error lists all the missing names.
pub fn spco2_sensitivity(dataset: &Dataset) -> RSESMResult<DriverFields> {
    dataset.require(&required_variables())?;

    let pco2 = dataset.field(VAR_SPCO2.name)?;
    let salinity = dataset.field(VAR_SOS.name)?;
    let alkalinity = dataset.field(VAR_TALKOS.name)?;
    let dic = dataset.field(VAR_DISSICOS.name)?;
    let buffer = BufferFactors::from_carbonate_system(alkalinity, dic)?;
    debug!("Computing pCO2 sensitivities over dimensions {:?}", pco2.dims());

    DriverFields::try_from_fn(|driver| {
        let sensitivity = match driver {
            Driver::Temperature => pco2.scale(PCO2_TEMPERATURE_SENSITIVITY),
            Driver::Salinity => pco2.broadcast_div(salinity)?,
            Driver::Alkalinity => pco2.broadcast_mul(&buffer.alkalinity.broadcast_div(alkalinity)?)?,
            Driver::Dic => pco2.broadcast_mul(&buffer.dic.broadcast_div(dic)?)?,
        };
        Ok(match sensitivity_units(pco2, driver) {
            Some(units) => sensitivity.with_units(units),
            None => sensitivity.without_units(),
        })
    })
}
