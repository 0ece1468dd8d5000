//! Constant pressure drop element.

use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;

/// Device that imposes a fixed pressure drop (filter, damper plate) while
/// passing whatever flow the rest of the network sets.
///
/// Modeled as a stiff linear element around the target drop: the residual
/// pressure error is converted into flow with a large conductance, so at
/// convergence the pressure difference across the link settles at `drop`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantPressureDrop {
    /// Imposed pressure drop in the forward direction (Pa)
    pub drop: f64,
}

impl ConstantPressureDrop {
    /// Conductance of the penalty linearization (kg/s per Pa).
    const STIFFNESS: f64 = 1e6;

    pub fn new(drop: f64) -> ElementResult<Self> {
        if !(drop >= 0.0 && drop.is_finite()) {
            return Err(ElementError::InvalidParameter {
                what: "pressure drop must be non-negative",
            });
        }
        Ok(Self { drop })
    }
}

impl FlowElement for ConstantPressureDrop {
    fn kind(&self) -> &'static str {
        "constant pressure drop"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        _from_state: &AirState,
        _to_state: &AirState,
        _mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        if control <= 0.0 {
            return Ok(ElementFlow::Single(FlowDeriv::ZERO));
        }
        let flow = Self::STIFFNESS * (dp - self.drop);
        Ok(ElementFlow::Single(FlowDeriv::new(flow, Self::STIFFNESS)))
    }
}
