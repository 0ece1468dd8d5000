//! Duct segment with Darcy-Weisbach friction.

use crate::common::{check_finite, laminar_turbulent_select};
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;

/// Reynolds number below which the flow is treated as laminar.
const RE_LAMINAR: f64 = 2300.0;

/// Friction-factor fixed-point sweeps; the correlation converges fast.
const FRICTION_ITERS: usize = 5;

/// Heat/moisture loss parameters a duct exposes to the transport pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuctLoss {
    /// Overall heat transfer coefficient times surface area (W/K)
    pub ua_heat: f64,
    /// Moisture transfer coefficient times surface area (kg/s)
    pub ua_moisture: f64,
}

/// Straight duct segment. Flow follows a Darcy-Weisbach relation: laminar
/// (Poiseuille) below the Reynolds threshold, turbulent with an iterated
/// Colebrook-style friction factor above it, plus lumped dynamic losses.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuctSegment {
    /// Duct length (m)
    pub length: f64,
    /// Hydraulic diameter (m)
    pub diameter: f64,
    /// Cross-sectional area (m^2)
    pub area: f64,
    /// Absolute surface roughness (m)
    pub roughness: f64,
    /// Sum of dynamic loss coefficients (fittings, bends)
    pub k_dynamic: f64,
    /// Overall heat transfer coefficient times surface area (W/K)
    pub ua_heat: f64,
    /// Moisture transfer coefficient times surface area (kg/s)
    pub ua_moisture: f64,
}

impl DuctSegment {
    pub fn new(
        length: f64,
        diameter: f64,
        area: f64,
        roughness: f64,
        k_dynamic: f64,
    ) -> ElementResult<Self> {
        if !(length > 0.0 && diameter > 0.0 && area > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "duct length, diameter and area must be positive",
            });
        }
        if !(roughness >= 0.0 && k_dynamic >= 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "duct roughness and loss coefficient must be non-negative",
            });
        }
        Ok(Self {
            length,
            diameter,
            area,
            roughness,
            k_dynamic,
            ua_heat: 0.0,
            ua_moisture: 0.0,
        })
    }

    /// Attach heat/moisture loss data for the scalar transport pass.
    pub fn with_losses(mut self, ua_heat: f64, ua_moisture: f64) -> Self {
        self.ua_heat = ua_heat;
        self.ua_moisture = ua_moisture;
        self
    }

    /// Swamee-Jain approximation to the Colebrook friction factor.
    fn friction_factor(&self, reynolds: f64) -> f64 {
        if reynolds < RE_LAMINAR {
            64.0 / reynolds.max(1.0)
        } else {
            let e_d = self.roughness / self.diameter;
            let a = e_d / 3.7;
            let b = 5.74 / reynolds.powf(0.9);
            let f = 0.25 / (a + b).log10().powi(2);
            f.max(1e-4)
        }
    }

    /// Turbulent mass flow magnitude for a pressure-drop magnitude, iterating
    /// the friction factor to self-consistency.
    fn turbulent_flow(&self, rho: f64, visc: f64, dp_abs: f64) -> f64 {
        let ld = self.length / self.diameter;
        // Fully-rough starting guess
        let mut f = self.friction_factor(1e7);
        let mut flow = 0.0;
        for _ in 0..FRICTION_ITERS {
            flow = self.area * (2.0 * rho * dp_abs / (f * ld + self.k_dynamic)).sqrt();
            let velocity = flow / (rho * self.area);
            let re = rho * velocity * self.diameter / visc;
            f = self.friction_factor(re.max(RE_LAMINAR));
        }
        flow
    }

    /// Laminar (Poiseuille) conductance: F = C_lam * dp.
    fn laminar_conductance(&self, rho: f64, visc: f64) -> f64 {
        rho * self.area * self.diameter * self.diameter / (32.0 * visc * self.length)
    }
}

impl FlowElement for DuctSegment {
    fn kind(&self) -> &'static str {
        "duct"
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

        let up = if dp >= 0.0 { from_state } else { to_state };
        let rho = up.density;
        let visc = up.viscosity;

        let cdm = control * self.laminar_conductance(rho, visc);
        let flow_lam = cdm * dp;

        if mode == EvalMode::Linear {
            return Ok(ElementFlow::Single(FlowDeriv::new(flow_lam, cdm)));
        }

        let dp_abs = dp.abs();
        if dp_abs == 0.0 {
            return Ok(ElementFlow::Single(FlowDeriv::new(0.0, cdm)));
        }

        let flow_turb_mag = control * self.turbulent_flow(rho, visc, dp_abs);
        let flow_turb = flow_turb_mag.copysign(dp);
        // F ~ sqrt(dp) with a weakly varying friction factor
        let dflow_turb = 0.5 * flow_turb_mag / dp_abs;

        let (flow, dflow) = laminar_turbulent_select(flow_lam, cdm, flow_turb, dflow_turb);
        check_finite(flow, "duct flow")?;
        check_finite(dflow, "duct flow derivative")?;
        Ok(ElementFlow::Single(FlowDeriv::new(flow, dflow)))
    }

    fn duct_loss(&self) -> Option<DuctLoss> {
        Some(DuctLoss {
            ua_heat: self.ua_heat,
            ua_moisture: self.ua_moisture,
        })
    }
}
