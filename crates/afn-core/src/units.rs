// afn-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

pub mod constants {
    /// Standard gravity (m/s^2)
    pub const G0_MPS2: f64 = 9.806_65;

    /// Gas constant for dry air (J/(kg*K))
    pub const R_AIR: f64 = 287.055;

    /// Standard barometric pressure (Pa)
    pub const P_STD_PA: f64 = 101_325.0;

    /// Standard air temperature (degC) used for reference-condition corrections
    pub const T_STD_C: f64 = 20.0;

    /// Celsius zero in kelvin
    pub const KELVIN_ZERO: f64 = 273.15;

    /// Specific heat of dry air (J/(kg*K))
    pub const CP_DRY_AIR: f64 = 1_005.7;

    /// Specific heat of water vapor (J/(kg*K))
    pub const CP_VAPOR: f64 = 1_859.0;
}
