//! Horizontal opening (stairwell, hatch) with buoyant exchange flow.
//!
//! Links using this element must point downward: the `from` node is the upper
//! zone. Forced flow through the plane follows the orifice law; when the
//! upper zone is denser than the lower one the stratification is unstable and
//! a counter-current exchange flow is superimposed in both directions.

use crate::common::check_finite;
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;
use afn_core::units::constants::G0_MPS2;

/// Pressure difference below which the orifice law is linearized (Pa).
const DP_LINEAR: f64 = 1e-4;

/// Opening in a floor or ceiling.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalOpening {
    /// Opening area (m^2)
    pub area: f64,
    /// Discharge coefficient for forced flow
    pub discharge_coeff: f64,
    /// Coefficient of the buoyant exchange correlation
    pub exchange_coeff: f64,
    /// Minimum density difference before exchange flow is added (kg/m^3)
    pub min_density_diff: f64,
}

impl HorizontalOpening {
    /// Default exchange coefficient for sharp-edged openings.
    pub const DEFAULT_EXCHANGE_COEFF: f64 = 0.055;

    pub fn new(area: f64, discharge_coeff: f64, exchange_coeff: f64) -> ElementResult<Self> {
        if !(area > 0.0 && discharge_coeff > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "opening area and discharge coefficient must be positive",
            });
        }
        if !(exchange_coeff >= 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "exchange coefficient must be non-negative",
            });
        }
        Ok(Self {
            area,
            discharge_coeff,
            exchange_coeff,
            min_density_diff: 1e-4,
        })
    }

    /// Buoyant exchange mass flow in each direction (kg/s). Independent of
    /// the pressure difference, so it contributes nothing to the Jacobian.
    fn exchange_flow(&self, drho: f64, rho_avg: f64) -> f64 {
        let hydraulic_d = (4.0 * self.area / std::f64::consts::PI).sqrt();
        self.exchange_coeff * self.area * (G0_MPS2 * drho.abs() * hydraulic_d * rho_avg).sqrt()
    }
}

impl FlowElement for HorizontalOpening {
    fn kind(&self) -> &'static str {
        "horizontal opening"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        if control <= 0.0 {
            return Ok(ElementFlow::Single(FlowDeriv::ZERO));
        }

        let area = self.area * control;
        let rho_up = if dp >= 0.0 {
            from_state.density
        } else {
            to_state.density
        };

        let dp_abs = dp.abs();
        let forced = if mode == EvalMode::Linear || dp_abs < DP_LINEAR {
            let slope = self.discharge_coeff * area * (2.0 * rho_up / DP_LINEAR).sqrt();
            FlowDeriv::new(slope * dp, slope)
        } else {
            let mag = self.discharge_coeff * area * (2.0 * rho_up * dp_abs).sqrt();
            FlowDeriv::new(mag.copysign(dp), 0.5 * mag / dp_abs)
        };
        check_finite(forced.mass_flow, "horizontal opening flow")?;

        // Stable stratification (lighter air above) or no exchange model:
        // plain one-way orifice.
        let drho = from_state.density - to_state.density;
        if mode == EvalMode::Linear
            || self.exchange_coeff == 0.0
            || drho < self.min_density_diff
        {
            return Ok(ElementFlow::Single(forced));
        }

        let rho_avg = 0.5 * (from_state.density + to_state.density);
        let exchange = control * self.exchange_flow(drho, rho_avg);
        check_finite(exchange, "horizontal opening exchange flow")?;

        // Superimpose the exchange on whichever side the forced flow takes.
        let (fwd_flow, fwd_deriv, rev_flow, rev_deriv) = if forced.mass_flow >= 0.0 {
            (forced.mass_flow + exchange, forced.dmass_dp, exchange, 0.0)
        } else {
            // The reverse part's derivative is of the reverse-directed flow:
            // a rising dp shrinks it.
            (exchange, 0.0, -forced.mass_flow + exchange, -forced.dmass_dp)
        };

        Ok(ElementFlow::Dual {
            forward: FlowDeriv::new(fwd_flow, fwd_deriv),
            reverse: FlowDeriv::new(rev_flow, rev_deriv),
        })
    }
}
