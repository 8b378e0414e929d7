//! Seawater carbonate chemistry constants
//!
//! # References
//!
//! - Weiss, R. F. & Price, B. A. (1980). Nitrous oxide solubility in water and
//!   seawater. Marine Chemistry, 8, 347-359.
//! - Wanninkhof, R. (1992). Relationship between wind speed and gas exchange
//!   over the ocean. JGR, 97, 7373-7382.
//! - Takahashi, T. et al. (2002). Global sea-air CO2 flux based on
//!   climatological surface ocean pCO2, and seasonal biological and
//!   temperature effects. Deep-Sea Research II, 49, 1601-1622.
//! - Lovenduski, N. S. et al. (2007). Enhanced CO2 outgassing in the Southern
//!   Ocean from a positive phase of the Southern Annular Mode. Global
//!   Biogeochemical Cycles, 21, GB2026.

use rsesm_core::time_axis::FloatValue;

/// Offset between degrees Celsius and kelvin.
pub const ZERO_CELSIUS_IN_KELVIN: FloatValue = 273.15;

/// Weiss & Price temperature coefficients `[a0, a1, a2, a3]`.
///
/// Used with temperature in hundreds of kelvin:
/// $$\ln F = a_0 + a_1/T + a_2 \ln T + a_3 T^2 + S (b_0 + b_1 T + b_2 T^2)$$
pub const WEISS_PRICE_A: [FloatValue; 4] = [-162.8301, 218.2968, 90.9241, -1.47696];

/// Weiss & Price salinity coefficients `[b0, b1, b2]`.
pub const WEISS_PRICE_B: [FloatValue; 3] = [0.025695, -0.025225, 0.0049867];

/// Schmidt number polynomial for CO2 in seawater, `Sc = c0 - c1 t + c2 t^2 - c3 t^3`.
///
/// Valid for 0-30 degC.
pub const SCHMIDT_COEFFICIENTS: [FloatValue; 4] = [2073.1, 125.62, 3.6276, 0.043219];

/// Exponential temperature dependence of pCO2 used in the Takahashi split (degC^-1).
pub const TAKAHASHI_TEMPERATURE_FACTOR: FloatValue = 0.0432;

/// Linearised temperature sensitivity of pCO2 (degC^-1).
///
/// Scales in situ pCO2 to surface temperature and sets the temperature
/// sensitivity `dpCO2/dT = 0.0423 pCO2`.
pub const PCO2_TEMPERATURE_SENSITIVITY: FloatValue = 0.0423;
