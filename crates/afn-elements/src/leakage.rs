//! Leakage elements: effective leakage area and duct leakage ratio.
//!
//! Both reduce to the power-law form once their parameters are translated
//! into an equivalent flow coefficient, so they share the crack evaluation.

use crate::crack::power_law_flow;
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowElement};
use afn_air::AirState;

/// Orifice defined by an effective leakage area measured at a reference
/// pressure difference (typically 4 Pa at Cd = 1).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveLeakageArea {
    /// Effective leakage area (m^2)
    pub area: f64,
    /// Discharge coefficient used when the area was measured
    pub discharge_coeff: f64,
    /// Reference pressure difference of the measurement (Pa)
    pub ref_dp: f64,
    /// Flow exponent
    pub exponent: f64,
}

impl EffectiveLeakageArea {
    pub fn new(area: f64, discharge_coeff: f64, ref_dp: f64, exponent: f64) -> ElementResult<Self> {
        if !(area > 0.0 && area.is_finite()) {
            return Err(ElementError::InvalidParameter {
                what: "leakage area must be positive",
            });
        }
        if !(discharge_coeff > 0.0 && ref_dp > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "discharge coefficient and reference dP must be positive",
            });
        }
        if !(0.5..=1.0).contains(&exponent) {
            return Err(ElementError::InvalidParameter {
                what: "leakage exponent must be in 0.5..=1.0",
            });
        }
        Ok(Self {
            area,
            discharge_coeff,
            ref_dp,
            exponent,
        })
    }

    /// Equivalent power-law coefficient (kg/s at 1 Pa, standard conditions).
    fn coefficient(&self) -> f64 {
        // Cd * ELA * sqrt(2) at the reference dP, re-anchored to 1 Pa
        self.discharge_coeff
            * self.area
            * std::f64::consts::SQRT_2
            * self.ref_dp.powf(0.5 - self.exponent)
    }
}

impl FlowElement for EffectiveLeakageArea {
    fn kind(&self) -> &'static str {
        "effective leakage area"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        power_law_flow(
            self.coefficient(),
            self.exponent,
            dp,
            control,
            from_state,
            to_state,
            mode,
        )
    }
}

/// Duct leakage expressed as a fraction of a maximum flow at a reference
/// pressure difference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeakageRatio {
    /// Leakage fraction of the maximum flow, 0..=1
    pub ratio: f64,
    /// Maximum (rated) mass flow (kg/s)
    pub max_flow: f64,
    /// Reference pressure difference (Pa)
    pub ref_dp: f64,
    /// Flow exponent
    pub exponent: f64,
}

impl LeakageRatio {
    pub fn new(ratio: f64, max_flow: f64, ref_dp: f64, exponent: f64) -> ElementResult<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ElementError::InvalidParameter {
                what: "leakage ratio must be in 0..=1",
            });
        }
        if !(max_flow > 0.0 && ref_dp > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "maximum flow and reference dP must be positive",
            });
        }
        if !(0.5..=1.0).contains(&exponent) {
            return Err(ElementError::InvalidParameter {
                what: "leakage exponent must be in 0.5..=1.0",
            });
        }
        Ok(Self {
            ratio,
            max_flow,
            ref_dp,
            exponent,
        })
    }

    /// Equivalent power-law coefficient: the leakage flow at the reference
    /// pressure difference, re-anchored to 1 Pa and normalized by sqrt(rho).
    fn coefficient(&self) -> f64 {
        let rho_std = crate::common::standard_density();
        self.ratio * self.max_flow / (rho_std.sqrt() * self.ref_dp.powf(self.exponent))
    }
}

impl FlowElement for LeakageRatio {
    fn kind(&self) -> &'static str {
        "leakage ratio"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        power_law_flow(
            self.coefficient(),
            self.exponent,
            dp,
            control,
            from_state,
            to_state,
            mode,
        )
    }
}
