//! Attribution of surface pCO2 variability to its drivers
//!
//! Each driver's contribution is its anomaly multiplied by the time-mean
//! sensitivity of pCO2 to that driver (see [`crate::sensitivity`]).
//! Anomalies are formed by removing a polynomial trend (or just the time
//! mean) and optionally the monthly climatology.
//!
//! [`spco2_decomposition`] returns contributions at every time step.
//! [`spco2_decomposition_index`] instead regresses the anomalies onto a climate
//! index, giving the pCO2 change per unit of the index attributable to each
//! driver. Regressions are made in sliding windows of calendar years and the
//! results averaged, which damps the influence of any single period.

use crate::drivers::DriverFields;
use crate::sensitivity::{required_variables, spco2_sensitivity};
use log::{debug, info, warn};
use rsesm_core::dataset::Dataset;
use rsesm_core::errors::{RSESMError, RSESMResult};
use rsesm_core::field::Field;
use rsesm_core::standard_variables::VAR_SPCO2;
use rsesm_core::stats::{
    deseasonalize_dataset, linear_regression, nanmean, nanmean_stack, rm_poly_dataset,
    select_years,
};
use rsesm_core::time_axis::FloatValue;
use serde::{Deserialize, Serialize};

/// Name of the time dimension the decompositions operate along
pub const TIME_DIM: &str = "time";

/// How the long-term signal is removed before computing anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detrend {
    /// Remove a least-squares polynomial of this order
    Polynomial { order: usize },
    /// Remove only the time mean
    Mean,
}

/// Whether the monthly climatology is removed after detrending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deseasonalize {
    MonthlyClimatology,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyOptions {
    pub detrend: Detrend,
    pub deseasonalize: Deseasonalize,
}

impl Default for AnomalyOptions {
    fn default() -> Self {
        Self {
            detrend: Detrend::Polynomial { order: 1 },
            deseasonalize: Deseasonalize::Keep,
        }
    }
}

impl AnomalyOptions {
    /// Fails with [`RSESMError::MissingDetrendOrder`] for a zero-order polynomial
    pub fn validate(&self) -> RSESMResult<()> {
        match self.detrend {
            Detrend::Polynomial { order: 0 } => Err(RSESMError::MissingDetrendOrder),
            _ => Ok(()),
        }
    }

    /// Anomalies of every variable in `dataset` along [`TIME_DIM`]
    pub fn anomalies(&self, dataset: &Dataset) -> RSESMResult<Dataset> {
        self.validate()?;
        let detrended = match self.detrend {
            Detrend::Polynomial { order } => rm_poly_dataset(dataset, order, TIME_DIM)?,
            Detrend::Mean => {
                warn!("Your data are not being detrended; only the time mean is removed");
                dataset.try_map(|_, field| field.broadcast_sub(&nanmean(field, TIME_DIM)?))?
            }
        };
        match self.deseasonalize {
            Deseasonalize::MonthlyClimatology => deseasonalize_dataset(&detrended, TIME_DIM),
            Deseasonalize::Keep => {
                warn!("Your data are not being deseasonalized");
                Ok(detrended)
            }
        }
    }
}

/// Span of the calendar-year windows used for index regressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlidingWindow {
    /// Windows covering years `[y, y + n]` for every year `y` of the record
    /// with `y + n` no later than its last year
    Years(i32),
    /// A single regression over the whole record
    FullSeries,
}

impl Default for SlidingWindow {
    fn default() -> Self {
        SlidingWindow::Years(10)
    }
}

/// Options for [`spco2_decomposition_index`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexRegressionOptions {
    pub anomaly: AnomalyOptions,
    pub window: SlidingWindow,
    /// Discard regression slopes whose p-value exceeds this threshold
    pub psig: Option<FloatValue>,
}

fn contribution_units(pco2: &Field, per: Option<&str>) -> Option<String> {
    match (pco2.units(), per) {
        (Some(units), Some(per)) => Some(format!("{} ({})-1", units, per)),
        (Some(units), None) => Some(units.to_string()),
        (None, _) => None,
    }
}

fn set_units(field: Field, units: &Option<String>) -> Field {
    match units {
        Some(units) => field.with_units(units.as_str()),
        None => field.without_units(),
    }
}

/// Contribution of each driver to pCO2 variability at every time step
///
/// The contribution of driver `X` is `anomaly(X) * mean_t(dpCO2/dX)`.
/// Requires `spco2`, `tos`, `sos`, `talkos` and `dissicos` along a `time`
/// dimension.
pub fn spco2_decomposition(
    dataset: &Dataset,
    options: &AnomalyOptions,
) -> RSESMResult<DriverFields> {
    options.validate()?;
    let sensitivity = spco2_sensitivity(dataset)?;
    let anomaly = options.anomalies(&dataset.select(&required_variables())?)?;
    let units = contribution_units(dataset.field(VAR_SPCO2.name)?, None);

    DriverFields::try_from_fn(|driver| {
        let mean_sensitivity = nanmean(sensitivity.get(driver), TIME_DIM)?;
        let contribution = anomaly
            .field(driver.variable_name())?
            .broadcast_mul(&mean_sensitivity)?;
        Ok(set_units(contribution, &units))
    })
}

/// Contribution of each driver to the pCO2 response to a climate index
///
/// Driver anomalies are regressed onto `index`, a 1-D series along `time` with
/// the same time coordinate as `dataset`, and each slope is scaled by the
/// time-mean sensitivity over the same period. With [`SlidingWindow::Years`]
/// this is repeated for every complete window and the results averaged,
/// ignoring NaN.
pub fn spco2_decomposition_index(
    dataset: &Dataset,
    index: &Field,
    options: &IndexRegressionOptions,
) -> RSESMResult<DriverFields> {
    options.anomaly.validate()?;
    if let SlidingWindow::Years(years) = options.window {
        if years < 0 {
            return Err(RSESMError::Error(format!(
                "sliding window must span a non-negative number of years, got {}",
                years
            )));
        }
    }

    let sensitivity = spco2_sensitivity(dataset)?;
    let drivers = dataset.select(&required_variables())?;
    let time = drivers.time_axis(TIME_DIM)?;
    let index_time = index.time_axis(TIME_DIM)?;
    index_time.ensure_matches(&time)?;

    let anomaly = options.anomaly.anomalies(&drivers)?;
    let units = contribution_units(dataset.field(VAR_SPCO2.name)?, index.units());
    let regress = |anomaly: &Dataset, index: &Field, sensitivity: &DriverFields| {
        DriverFields::try_from_fn(|driver| {
            let slope =
                linear_regression(index, anomaly.field(driver.variable_name())?, TIME_DIM, options.psig)?
                    .slope;
            let contribution = slope.broadcast_mul(&nanmean(sensitivity.get(driver), TIME_DIM)?)?;
            Ok(set_units(contribution, &units))
        })
    };

    let years = match options.window {
        SlidingWindow::FullSeries => return regress(&anomaly, index, &sensitivity),
        SlidingWindow::Years(years) => years,
    };
    let (first_year, last_year) = match (index_time.first_year(), index_time.last_year()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(RSESMError::TimeAxisMismatch("the index is empty".to_string())),
    };

    let mut windows = Vec::new();
    for start in index_time.years() {
        let end = match start.checked_add(years) {
            Some(end) if end <= last_year => end,
            _ => continue,
        };
        let window_index = select_years(index, TIME_DIM, start, end)?;
        debug!(
            "Regressing onto the index over {}-{} ({} time steps)",
            start,
            end,
            window_index.len_of(TIME_DIM)?
        );
        let window_anomaly = anomaly.try_map(|_, field| select_years(field, TIME_DIM, start, end))?;
        let window_sensitivity =
            sensitivity.try_map(|_, field| select_years(field, TIME_DIM, start, end))?;
        windows.push(regress(&window_anomaly, &window_index, &window_sensitivity)?);
    }

    if windows.is_empty() {
        return Err(RSESMError::NoCompleteWindow {
            window: years,
            first_year,
            last_year,
        });
    }
    info!(
        "Averaging {} sliding windows of {} years between {} and {}",
        windows.len(),
        years,
        first_year,
        last_year
    );
    DriverFields::try_from_fn(|driver| {
        let averaged = nanmean_stack(windows.iter().map(|window| window.get(driver)))?;
        Ok(set_units(averaged, &units))
    })
}
