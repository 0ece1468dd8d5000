//! Specified-flow element.

use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;

/// Residual pressure sensitivity, keeping the Jacobian diagonal regular.
const REGULARIZING_SLOPE: f64 = 1e-6;

/// Whether the specified amount is a mass or a volume flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixedFlowKind {
    /// kg/s
    Mass,
    /// m^3/s, converted with the upstream density
    Volume,
}

/// Link that carries a specified flow regardless of the pressure difference
/// (scheduled exhaust, metered supply). Negative amounts reverse the link.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedFlow {
    /// Flow amount at full control, in the units selected by `kind`
    pub amount: f64,
    pub kind: FixedFlowKind,
}

impl FixedFlow {
    pub fn new(amount: f64, kind: FixedFlowKind) -> ElementResult<Self> {
        if !amount.is_finite() {
            return Err(ElementError::InvalidParameter {
                what: "fixed flow amount must be finite",
            });
        }
        Ok(Self { amount, kind })
    }
}

impl FlowElement for FixedFlow {
    fn kind(&self) -> &'static str {
        "fixed flow"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        _mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        if control <= 0.0 {
            return Ok(ElementFlow::Single(FlowDeriv::ZERO));
        }
        let mass = match self.kind {
            FixedFlowKind::Mass => self.amount,
            FixedFlowKind::Volume => {
                // Density of the side the flow leaves from
                let rho = if self.amount >= 0.0 {
                    from_state.density
                } else {
                    to_state.density
                };
                self.amount * rho
            }
        };
        let flow = control * mass + REGULARIZING_SLOPE * dp;
        Ok(ElementFlow::Single(FlowDeriv::new(flow, REGULARIZING_SLOPE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(e: &FixedFlow, dp: f64, ctl: f64) -> FlowDeriv {
        let air = AirState::default();
        match e.flow(dp, ctl, &air, &air, EvalMode::Full).unwrap() {
            ElementFlow::Single(f) => f,
            _ => panic!(),
        }
    }

    #[test]
    fn mass_flow_ignores_pressure() {
        let e = FixedFlow::new(0.25, FixedFlowKind::Mass).unwrap();
        let a = eval(&e, 100.0, 1.0).mass_flow;
        let b = eval(&e, -100.0, 1.0).mass_flow;
        assert!((a - 0.25).abs() < 1e-3);
        assert!((a - b).abs() < 1e-3);
    }

    #[test]
    fn volume_flow_uses_upstream_density() {
        let e = FixedFlow::new(0.1, FixedFlowKind::Volume).unwrap();
        let air = AirState::default();
        let f = eval(&e, 0.0, 1.0);
        assert!((f.mass_flow - 0.1 * air.density).abs() < 1e-12);
    }

    #[test]
    fn control_scales_and_gates() {
        let e = FixedFlow::new(0.2, FixedFlowKind::Mass).unwrap();
        assert!((eval(&e, 0.0, 0.5).mass_flow - 0.1).abs() < 1e-12);
        assert_eq!(eval(&e, 50.0, 0.0).mass_flow, 0.0);
    }
}
