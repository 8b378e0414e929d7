use crate::decomposition::{
    AnomalyOptions, Deseasonalize, Detrend, IndexRegressionOptions, SlidingWindow,
};
use rsesm_core::errors::{RSESMError, RSESMResult};
use rsesm_core::time_axis::FloatValue;
use serde::{Deserialize, Serialize};

/// Options for the pCO2 driver decomposition.
///
/// Keys missing from a configuration file take their default.
///
/// ```toml
/// detrend = true
/// order = 2
/// deseasonalize = true
/// sliding_window = { years = 5 }
/// psig = 0.05
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionParameters {
    /// Remove a polynomial trend along time before computing anomalies.
    /// When false, only the time mean is removed.
    /// default: true
    pub detrend: bool,

    /// Polynomial order of the trend. Zero or absent while `detrend` is set
    /// is an error.
    /// default: 1
    pub order: Option<usize>,

    /// Remove the monthly climatology after detrending.
    /// default: false
    pub deseasonalize: bool,

    /// Window used when regressing onto a climate index.
    /// default: 10 years
    pub sliding_window: SlidingWindow,

    /// Mask regression slopes whose p-value exceeds this threshold.
    /// default: none
    pub psig: Option<FloatValue>,
}

impl Default for DecompositionParameters {
    fn default() -> Self {
        Self {
            detrend: true,
            order: Some(1),
            deseasonalize: false,
            sliding_window: SlidingWindow::default(),
            psig: None,
        }
    }
}

impl DecompositionParameters {
    pub fn from_toml_str(content: &str) -> RSESMResult<Self> {
        toml::from_str(content).map_err(|e| RSESMError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> RSESMResult<String> {
        toml::to_string(self).map_err(|e| RSESMError::Config(e.to_string()))
    }
}

impl TryFrom<&DecompositionParameters> for AnomalyOptions {
    type Error = RSESMError;

    fn try_from(parameters: &DecompositionParameters) -> RSESMResult<Self> {
        let detrend = match (parameters.detrend, parameters.order) {
            (false, _) => Detrend::Mean,
            (true, Some(order)) if order > 0 => Detrend::Polynomial { order },
            (true, _) => return Err(RSESMError::MissingDetrendOrder),
        };
        let deseasonalize = if parameters.deseasonalize {
            Deseasonalize::MonthlyClimatology
        } else {
            Deseasonalize::Keep
        };
        Ok(AnomalyOptions {
            detrend,
            deseasonalize,
        })
    }
}

impl TryFrom<&DecompositionParameters> for IndexRegressionOptions {
    type Error = RSESMError;

    fn try_from(parameters: &DecompositionParameters) -> RSESMResult<Self> {
        Ok(IndexRegressionOptions {
            anomaly: AnomalyOptions::try_from(parameters)?,
            window: parameters.sliding_window,
            psig: parameters.psig,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let parameters = DecompositionParameters::from_toml_str("").unwrap();
        assert_eq!(parameters, DecompositionParameters::default());

        let options = IndexRegressionOptions::try_from(&parameters).unwrap();
        assert_eq!(options, IndexRegressionOptions::default());
    }

    #[test]
    fn parse_full_file() {
        let parameters = DecompositionParameters::from_toml_str(
            r#"
            detrend = true
            order = 2
            deseasonalize = true
            sliding_window = { years = 5 }
            psig = 0.05
            "#,
        )
        .unwrap();
        let options = IndexRegressionOptions::try_from(&parameters).unwrap();
        assert_eq!(options.anomaly.detrend, Detrend::Polynomial { order: 2 });
        assert_eq!(
            options.anomaly.deseasonalize,
            Deseasonalize::MonthlyClimatology
        );
        assert_eq!(options.window, SlidingWindow::Years(5));
        assert_eq!(options.psig, Some(0.05));
    }

    #[test]
    fn parse_full_series_window() {
        let parameters =
            DecompositionParameters::from_toml_str("sliding_window = \"full_series\"").unwrap();
        assert_eq!(parameters.sliding_window, SlidingWindow::FullSeries);
    }

    #[test]
    fn detrend_without_order() {
        let parameters = DecompositionParameters::from_toml_str("order = 0").unwrap();
        assert_eq!(
            AnomalyOptions::try_from(&parameters).unwrap_err(),
            RSESMError::MissingDetrendOrder
        );

        let parameters = DecompositionParameters {
            order: None,
            ..Default::default()
        };
        assert_eq!(
            AnomalyOptions::try_from(&parameters).unwrap_err(),
            RSESMError::MissingDetrendOrder
        );

        let parameters = DecompositionParameters {
            detrend: false,
            order: None,
            ..Default::default()
        };
        assert_eq!(
            AnomalyOptions::try_from(&parameters).unwrap().detrend,
            Detrend::Mean
        );
    }

    #[test]
    fn invalid_toml() {
        let result = DecompositionParameters::from_toml_str("detrend = \"yes\"");
        assert!(matches!(result, Err(RSESMError::Config(_))));
    }

    #[test]
    fn toml_roundtrip() {
        let parameters = DecompositionParameters {
            deseasonalize: true,
            sliding_window: SlidingWindow::FullSeries,
            psig: Some(0.1),
            ..Default::default()
        };
        let content = parameters.to_toml_string().unwrap();
        assert_eq!(
            DecompositionParameters::from_toml_str(&content).unwrap(),
            parameters
        );
    }
}
