//! Per-node air state snapshot.

use crate::properties::{density, dynamic_viscosity, specific_heat};
use afn_core::units::{Pressure, Temperature};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::degree_celsius;

/// Thermodynamic state of the air at one network node, with the derived
/// transport properties the flow laws need.
///
/// Built once per node per solver invocation; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirState {
    /// Absolute (barometric + stack-corrected) pressure (Pa)
    pub pressure: f64,
    /// Dry-bulb temperature (degC)
    pub temperature: f64,
    /// Humidity ratio (kg water / kg dry air)
    pub humidity_ratio: f64,
    /// Moist-air density (kg/m^3)
    pub density: f64,
    /// Dynamic viscosity (Pa*s)
    pub viscosity: f64,
}

impl AirState {
    /// Build a state from raw SI values, deriving density and viscosity.
    pub fn from_raw(pressure_pa: f64, temp_c: f64, humidity_ratio: f64) -> Self {
        Self {
            pressure: pressure_pa,
            temperature: temp_c,
            humidity_ratio,
            density: density(pressure_pa, temp_c, humidity_ratio),
            viscosity: dynamic_viscosity(temp_c),
        }
    }

    /// Build a state from unit-typed quantities.
    pub fn new(pressure: Pressure, temperature: Temperature, humidity_ratio: f64) -> Self {
        Self::from_raw(
            pressure.get::<pascal>(),
            temperature.get::<degree_celsius>(),
            humidity_ratio,
        )
    }

    /// Specific heat of this air (J/(kg*K)).
    pub fn specific_heat(&self) -> f64 {
        specific_heat(self.humidity_ratio)
    }

    /// Kinematic viscosity (m^2/s).
    pub fn kinematic_viscosity(&self) -> f64 {
        self.viscosity / self.density
    }
}

impl Default for AirState {
    /// Standard air: 101325 Pa, 20 C, dry.
    fn default() -> Self {
        Self::from_raw(101_325.0, 20.0, 0.0)
    }
}
