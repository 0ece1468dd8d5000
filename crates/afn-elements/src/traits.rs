//! Core trait and result types for flow elements.

use crate::error::ElementResult;
use afn_air::AirState;

/// Evaluation mode requested by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Laminar/linearized form, used only to build the initial pressure guess.
    Linear,
    /// Full nonlinear flow law.
    Full,
}

/// One directed mass flow and its pressure derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowDeriv {
    /// Mass flow (kg/s), non-negative for `Dual` parts; signed for `Single`
    /// (positive = from -> to).
    pub mass_flow: f64,
    /// d(mass_flow)/d(pressure difference), finite always.
    pub dmass_dp: f64,
}

impl FlowDeriv {
    pub const ZERO: Self = Self {
        mass_flow: 0.0,
        dmass_dp: 0.0,
    };

    pub fn new(mass_flow: f64, dmass_dp: f64) -> Self {
        Self { mass_flow, dmass_dp }
    }
}

/// Result of evaluating a flow element.
///
/// Most elements pass flow in one direction at a time (`Single`, signed).
/// Large vertical openings under buoyancy can pass flow both ways at once;
/// that case is the explicit `Dual` variant with two non-negative directed
/// flows rather than a second slot that is usually zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementFlow {
    Single(FlowDeriv),
    Dual {
        /// Flow from -> to (kg/s, >= 0)
        forward: FlowDeriv,
        /// Flow to -> from (kg/s, >= 0)
        reverse: FlowDeriv,
    },
}

impl ElementFlow {
    /// Net signed flow from -> to.
    pub fn net(&self) -> f64 {
        match self {
            ElementFlow::Single(f) => f.mass_flow,
            ElementFlow::Dual { forward, reverse } => forward.mass_flow - reverse.mass_flow,
        }
    }

    /// Sum of flow magnitudes (used for relative-tolerance scaling).
    pub fn abs_sum(&self) -> f64 {
        match self {
            ElementFlow::Single(f) => f.mass_flow.abs(),
            ElementFlow::Dual { forward, reverse } => forward.mass_flow + reverse.mass_flow,
        }
    }

    /// Net derivative of the signed from -> to flow. Each `Dual` part stores
    /// the derivative of its own directed flow with respect to `dp` (the
    /// reverse part's is typically negative), so the net follows the same
    /// subtraction as the flows.
    pub fn net_derivative(&self) -> f64 {
        match self {
            ElementFlow::Single(f) => f.dmass_dp,
            ElementFlow::Dual { forward, reverse } => forward.dmass_dp - reverse.dmass_dp,
        }
    }
}

/// A flow element: the physical model carried by one link.
///
/// Elements are deterministic functions of the pressure difference, the link
/// control value and the air states at both ends. They never return NaN or
/// infinite values; a control of 0 yields exactly zero flow with a finite
/// derivative.
pub trait FlowElement: Send + Sync {
    /// Element kind for diagnostics.
    fn kind(&self) -> &'static str;

    /// Evaluate the element.
    ///
    /// # Arguments
    /// * `dp` - total pressure difference from -> to (unknown + stack + wind), Pa
    /// * `control` - link control value in 0..=1 for this timestep
    /// * `from_state` - air state at the link's `from` end
    /// * `to_state` - air state at the link's `to` end
    /// * `mode` - full nonlinear law or laminar-only initialization form
    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow>;

    /// Duct heat/moisture loss data for the scalar transport pass, if this
    /// element represents a duct.
    fn duct_loss(&self) -> Option<crate::duct::DuctLoss> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_and_abs_sum() {
        let single = ElementFlow::Single(FlowDeriv::new(-0.4, 0.1));
        assert_eq!(single.net(), -0.4);
        assert_eq!(single.abs_sum(), 0.4);

        let dual = ElementFlow::Dual {
            forward: FlowDeriv::new(0.3, 0.05),
            reverse: FlowDeriv::new(0.1, -0.02),
        };
        assert!((dual.net() - 0.2).abs() < 1e-15);
        assert!((dual.abs_sum() - 0.4).abs() < 1e-15);
        assert!((dual.net_derivative() - 0.07).abs() < 1e-15);
    }
}
