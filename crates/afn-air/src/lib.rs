//! Moist-air property evaluation for the airflow network.
//!
//! Flow elements and the buoyancy/stack calculation need density, dynamic
//! viscosity and specific heat as functions of barometric pressure, dry-bulb
//! temperature and humidity ratio. These are closed-form ideal-gas
//! correlations: pure functions with no error paths, valid over the ranges a
//! building simulation can produce.

pub mod properties;
pub mod state;

pub use properties::{density, dynamic_viscosity, kinematic_viscosity, specific_heat};
pub use state::AirState;
