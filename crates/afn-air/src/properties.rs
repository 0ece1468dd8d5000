//! Ideal-gas moist-air property correlations.

use afn_core::units::constants::{CP_DRY_AIR, CP_VAPOR, KELVIN_ZERO, R_AIR};

/// Ratio of the gas constants of water vapor and dry air minus one,
/// used in the virtual-temperature form of the moist-air gas law.
const VAPOR_GAS_CONST_RATIO: f64 = 0.607_8;

/// Moist-air density (kg/m^3) from barometric pressure (Pa), dry-bulb
/// temperature (degC) and humidity ratio (kg water / kg dry air).
pub fn density(pressure_pa: f64, temp_c: f64, humidity_ratio: f64) -> f64 {
    let t_k = temp_c + KELVIN_ZERO;
    pressure_pa / (R_AIR * t_k * (1.0 + VAPOR_GAS_CONST_RATIO * humidity_ratio))
}

/// Dynamic viscosity of air (Pa*s) as a linear function of dry-bulb
/// temperature (degC). Humidity dependence is negligible for flow-law use.
pub fn dynamic_viscosity(temp_c: f64) -> f64 {
    1.714_32e-5 + 4.828e-8 * temp_c
}

/// Kinematic viscosity (m^2/s), convenience for Reynolds-number work.
pub fn kinematic_viscosity(pressure_pa: f64, temp_c: f64, humidity_ratio: f64) -> f64 {
    dynamic_viscosity(temp_c) / density(pressure_pa, temp_c, humidity_ratio)
}

/// Specific heat of moist air (J/(kg*K)) per unit mass of moist air.
pub fn specific_heat(humidity_ratio: f64) -> f64 {
    CP_DRY_AIR + CP_VAPOR * humidity_ratio
}
