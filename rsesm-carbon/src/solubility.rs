//! Gas exchange properties of CO2 in seawater
//!
//! The field-level functions average their inputs over every element
//! (ignoring NaN) before applying the scalar formula, giving one
//! representative value for a region or period.

use crate::parameters::chemistry::{
    SCHMIDT_COEFFICIENTS, WEISS_PRICE_A, WEISS_PRICE_B, ZERO_CELSIUS_IN_KELVIN,
};
use rsesm_core::field::Field;
use rsesm_core::stats::nanmean_all;
use rsesm_core::time_axis::FloatValue;

/// CO2 solubility (mol kg-1 atm-1) from Weiss & Price (1980)
///
/// `temperature` in degC, `salinity` in psu.
pub fn weiss_price_solubility(temperature: FloatValue, salinity: FloatValue) -> FloatValue {
    let [a0, a1, a2, a3] = WEISS_PRICE_A;
    let [b0, b1, b2] = WEISS_PRICE_B;
    let t = (temperature + ZERO_CELSIUS_IN_KELVIN) * 0.01;

    (a0 + a1 / t + a2 * t.ln() + a3 * t * t + (b2 * t * t + b1 * t + b0) * salinity).exp()
}

/// Schmidt number of CO2 in seawater at `temperature` degC (Wanninkhof 1992)
pub fn schmidt_number(temperature: FloatValue) -> FloatValue {
    let [c0, c1, c2, c3] = SCHMIDT_COEFFICIENTS;
    let t = temperature;
    c0 - c1 * t + c2 * t.powi(2) - c3 * t.powi(3)
}

/// Solubility of CO2 for the mean temperature and salinity of two fields
///
/// NaN if either field has no valid values.
pub fn co2_sol(temperature: &Field, salinity: &Field) -> FloatValue {
    weiss_price_solubility(nanmean_all(temperature), nanmean_all(salinity))
}

/// Schmidt number for the mean temperature of a field
pub fn schmidt(temperature: &Field) -> FloatValue {
    schmidt_number(nanmean_all(temperature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;
    use ndarray::array;

    #[test]
    fn solubility_reference_values() {
        assert_relative_eq!(
            weiss_price_solubility(20.0, 35.0),
            0.0315715750676,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            weiss_price_solubility(0.0, 35.0),
            0.0622613961712,
            max_relative = 1e-9
        );
    }

    #[test]
    fn solubility_decreases_with_temperature_and_salinity() {
        assert!(weiss_price_solubility(25.0, 35.0) < weiss_price_solubility(5.0, 35.0));
        assert!(weiss_price_solubility(15.0, 38.0) < weiss_price_solubility(15.0, 30.0));
    }

    #[test]
    fn schmidt_reference_value() {
        assert!(is_close!(schmidt_number(20.0), 665.988));
        assert_eq!(schmidt_number(0.0), 2073.1);
    }

    #[test]
    fn field_functions_use_nan_mean() {
        let temperature = Field::new(
            ["time", "x"],
            array![[18.0, FloatValue::NAN], [22.0, 20.0]].into_dyn(),
        )
        .unwrap();
        let salinity = Field::new(["x"], array![34.0, 36.0].into_dyn()).unwrap();

        assert_relative_eq!(
            co2_sol(&temperature, &salinity),
            weiss_price_solubility(20.0, 35.0),
            max_relative = 1e-12
        );
        assert_relative_eq!(schmidt(&temperature), 665.988, max_relative = 1e-12);
    }

    #[test]
    fn independent_of_time_order() {
        let temperature = Field::new(["time"], array![4.0, 12.0, 9.0, 27.0].into_dyn()).unwrap();
        let salinity = Field::new(["time"], array![33.0, 35.5, 34.0, 36.0].into_dyn()).unwrap();
        let temperature_permuted =
            Field::new(["time"], array![27.0, 4.0, 9.0, 12.0].into_dyn()).unwrap();
        let salinity_permuted =
            Field::new(["time"], array![36.0, 34.0, 33.0, 35.5].into_dyn()).unwrap();

        assert_relative_eq!(
            co2_sol(&temperature, &salinity),
            co2_sol(&temperature_permuted, &salinity_permuted),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            schmidt(&temperature),
            schmidt(&temperature_permuted),
            max_relative = 1e-12
        );
    }

    #[test]
    fn all_nan_input() {
        let temperature = Field::new(["x"], array![FloatValue::NAN].into_dyn()).unwrap();
        assert!(schmidt(&temperature).is_nan());
    }
}
