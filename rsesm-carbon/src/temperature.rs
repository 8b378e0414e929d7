//! Temperature effects on surface pCO2

use crate::parameters::chemistry::{PCO2_TEMPERATURE_SENSITIVITY, TAKAHASHI_TEMPERATURE_FACTOR};
use rsesm_core::dataset::Dataset;
use rsesm_core::errors::{RSESMError, RSESMResult};
use rsesm_core::field::Field;
use rsesm_core::standard_variables::{VAR_SPCO2, VAR_TOS};
use rsesm_core::stats::nanmean;
use serde::{Deserialize, Serialize};

/// Names of the dimension and variables used by [`temp_decomp_takahashi`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakahashiVariables {
    pub time_dim: String,
    pub temperature: String,
    pub pco2: String,
}

impl Default for TakahashiVariables {
    fn default() -> Self {
        Self {
            time_dim: "time".to_string(),
            temperature: VAR_TOS.name.to_string(),
            pco2: VAR_SPCO2.name.to_string(),
        }
    }
}

/// pCO2 split into its thermally and non-thermally driven parts
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalDecomposition {
    /// Mean pCO2 perturbed by the temperature anomaly, `mean(pCO2) exp(0.0432 dT)`
    pub thermal: Field,
    /// pCO2 with the temperature anomaly removed, `pCO2 exp(-0.0432 dT)`
    pub non_thermal: Field,
}

/// Decompose pCO2 into thermal and non-thermal components (Takahashi et al. 2002)
///
/// `dT` is the temperature anomaly from its time mean. Missing temperature or
/// pCO2 variables give [`RSESMError::MissingVariables`].
pub fn temp_decomp_takahashi(
    dataset: &Dataset,
    names: &TakahashiVariables,
) -> RSESMResult<ThermalDecomposition> {
    dataset.require(&[names.temperature.as_str(), names.pco2.as_str()])?;
    let temperature = dataset.field(&names.temperature)?;
    let pco2 = dataset.field(&names.pco2)?;

    let anomaly = temperature.broadcast_sub(&nanmean(temperature, &names.time_dim)?)?;
    let mean_pco2 = nanmean(pco2, &names.time_dim)?;
    let thermal = anomaly.zip_with(&mean_pco2, |dt, p| {
        p * (TAKAHASHI_TEMPERATURE_FACTOR * dt).exp()
    })?;
    let non_thermal = pco2.zip_with(&anomaly, |p, dt| {
        p * (-TAKAHASHI_TEMPERATURE_FACTOR * dt).exp()
    })?;

    let thermal = match pco2.units() {
        Some(units) => thermal.with_units(units),
        None => thermal.without_units(),
    };
    Ok(ThermalDecomposition {
        thermal,
        non_thermal,
    })
}

/// Scale in situ pCO2 to the surface temperature of the same column
///
/// `pCO2_pot = pCO2 (1 + 0.0423 (T_sfc - T))`, where `T_sfc` is the first entry
/// along `depth_dim`. The first level must be the surface: a depth coordinate,
/// when attached, must grow strictly in magnitude, so both positive-down and
/// negative-down conventions are accepted.
pub fn potential_pco2(
    temperature: &Field,
    pco2: &Field,
    depth_dim: &str,
) -> RSESMResult<Field> {
    for field in [temperature, pco2] {
        if let Some(depth) = field.coord(depth_dim) {
            if depth.windows(2).into_iter().any(|w| w[1].abs() <= w[0].abs()) {
                return Err(RSESMError::InvalidDepthOrdering(depth_dim.to_string()));
            }
        }
    }

    let surface = temperature.isel(depth_dim, 0)?;
    let correction = temperature.zip_with(&surface, |t, t_sfc| {
        1.0 + PCO2_TEMPERATURE_SENSITIVITY * (t_sfc - t)
    })?;
    pco2.broadcast_mul(&correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};
    use rsesm_core::time_axis::TimeAxis;

    fn series(values: Array1<f64>) -> Field {
        let time = TimeAxis::monthly(2000, values.len());
        Field::new(["time"], values.into_dyn())
            .unwrap()
            .with_time("time", &time)
            .unwrap()
    }

    #[test]
    fn takahashi_components() {
        let tos = series(array![14.0, 16.0, 15.0]);
        let pco2 = series(array![380.0, 400.0, 390.0]).with_units("uatm");
        let ds = Dataset::from_fields([("tos", tos), ("spco2", pco2)]).unwrap();

        let result = temp_decomp_takahashi(&ds, &TakahashiVariables::default()).unwrap();
        assert_relative_eq!(result.thermal.values()[[0]], 390.0 * (-0.0432f64).exp());
        assert_relative_eq!(result.thermal.values()[[2]], 390.0);
        assert_relative_eq!(result.non_thermal.values()[[1]], 400.0 * (-0.0432f64).exp());
        assert_relative_eq!(result.non_thermal.values()[[2]], 390.0);
        assert_eq!(result.thermal.units(), Some("uatm"));
        assert_eq!(result.non_thermal.units(), Some("uatm"));

        // thermal * non_thermal = mean(pCO2) * pCO2
        for i in 0..3 {
            assert_relative_eq!(
                result.thermal.values()[[i]] * result.non_thermal.values()[[i]],
                390.0 * ds.field("spco2").unwrap().values()[[i]],
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn takahashi_custom_names() {
        let ds = Dataset::from_fields([
            ("sst", series(array![10.0, 12.0])),
            ("pco2", series(array![300.0, 320.0])),
        ])
        .unwrap();
        let names = TakahashiVariables {
            temperature: "sst".to_string(),
            pco2: "pco2".to_string(),
            ..Default::default()
        };
        assert!(temp_decomp_takahashi(&ds, &names).is_ok());
        assert_eq!(
            temp_decomp_takahashi(&ds, &TakahashiVariables::default()).unwrap_err(),
            RSESMError::MissingVariables(vec!["tos".to_string(), "spco2".to_string()])
        );
    }

    fn profile(values: Array1<f64>, depth: Array1<f64>) -> Field {
        Field::new(["depth"], values.into_dyn())
            .unwrap()
            .with_coord("depth", depth)
            .unwrap()
    }

    #[test]
    fn potential_pco2_profile() {
        let depth = array![0.0, 50.0, 200.0];
        let temperature = profile(array![20.0, 15.0, 10.0], depth.clone());
        let pco2 = profile(array![400.0, 500.0, 600.0], depth);

        let result = potential_pco2(&temperature, &pco2, "depth").unwrap();
        assert_eq!(result.values()[[0]], 400.0);
        assert_relative_eq!(result.values()[[1]], 500.0 * (1.0 + 0.0423 * 5.0));
        assert_relative_eq!(result.values()[[2]], 600.0 * (1.0 + 0.0423 * 10.0));
    }

    #[test]
    fn potential_pco2_broadcasts_surface() {
        let temperature = Field::new(
            ["time", "depth"],
            array![[20.0, 18.0], [22.0, 19.0]].into_dyn(),
        )
        .unwrap();
        let pco2 = Field::new(
            ["time", "depth"],
            array![[400.0, 420.0], [410.0, 430.0]].into_dyn(),
        )
        .unwrap();

        let result = potential_pco2(&temperature, &pco2, "depth").unwrap();
        assert_relative_eq!(result.values()[[0, 1]], 420.0 * (1.0 + 0.0423 * 2.0));
        assert_relative_eq!(result.values()[[1, 1]], 430.0 * (1.0 + 0.0423 * 3.0));
        assert_eq!(result.values()[[1, 0]], 410.0);
    }

    #[test]
    fn potential_pco2_rejects_upward_depth() {
        let depth = array![200.0, 50.0, 0.0];
        let temperature = profile(array![10.0, 15.0, 20.0], depth.clone());
        let pco2 = profile(array![600.0, 500.0, 400.0], depth);
        assert!(matches!(
            potential_pco2(&temperature, &pco2, "depth"),
            Err(RSESMError::InvalidDepthOrdering(_))
        ));
    }

    #[test]
    fn potential_pco2_negative_down_depth() {
        let depth = array![0.0, -50.0, -200.0];
        let temperature = profile(array![20.0, 15.0, 10.0], depth.clone());
        let pco2 = profile(array![400.0, 500.0, 600.0], depth);

        let result = potential_pco2(&temperature, &pco2, "depth").unwrap();
        assert_eq!(result.values()[[0]], 400.0);
        assert_relative_eq!(result.values()[[1]], 500.0 * (1.0 + 0.0423 * 5.0));
        assert_relative_eq!(result.values()[[2]], 600.0 * (1.0 + 0.0423 * 10.0));

        let upward = array![-200.0, -50.0, 0.0];
        let temperature = profile(array![10.0, 15.0, 20.0], upward.clone());
        let pco2 = profile(array![600.0, 500.0, 400.0], upward);
        assert!(matches!(
            potential_pco2(&temperature, &pco2, "depth"),
            Err(RSESMError::InvalidDepthOrdering(_))
        ));
    }

    #[test]
    fn potential_pco2_requires_depth() {
        let tos = series(array![10.0, 12.0]);
        assert!(matches!(
            potential_pco2(&tos, &tos, "depth"),
            Err(RSESMError::MissingDimension(_))
        ));
    }
}
