//! Distribution system components (coils, heat exchangers, terminal units).
//!
//! These are rated by a design flow at a design pressure drop; in the network
//! they behave as power-law restrictions with an exponent of 0.5 anchored at
//! the rated point.

use crate::crack::power_law_flow;
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowElement};
use afn_air::AirState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistributionKind {
    Coil,
    HeatExchanger,
    TerminalUnit,
}

impl DistributionKind {
    fn name(self) -> &'static str {
        match self {
            DistributionKind::Coil => "coil",
            DistributionKind::HeatExchanger => "heat exchanger",
            DistributionKind::TerminalUnit => "terminal unit",
        }
    }
}

/// In-duct component rated at a single operating point.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionComponent {
    pub kind: DistributionKind,
    /// Rated mass flow (kg/s)
    pub rated_flow: f64,
    /// Pressure drop at the rated flow (Pa)
    pub rated_dp: f64,
}

impl DistributionComponent {
    /// Flow exponent of the square-law restriction.
    const EXPONENT: f64 = 0.5;

    pub fn new(kind: DistributionKind, rated_flow: f64, rated_dp: f64) -> ElementResult<Self> {
        if !(rated_flow > 0.0 && rated_dp > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "rated flow and rated pressure drop must be positive",
            });
        }
        Ok(Self {
            kind,
            rated_flow,
            rated_dp,
        })
    }

    /// Equivalent power-law coefficient reproducing the rated point at
    /// standard conditions.
    fn coefficient(&self) -> f64 {
        let rho_std = crate::common::standard_density();
        self.rated_flow / (rho_std.sqrt() * self.rated_dp.powf(Self::EXPONENT))
    }
}

impl FlowElement for DistributionComponent {
    fn kind(&self) -> &'static str {
        self.kind.name()
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
            Self::EXPONENT,
            dp,
            control,
            from_state,
            to_state,
            mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FlowDeriv;

    fn eval(c: &DistributionComponent, dp: f64) -> FlowDeriv {
        let air = AirState::default();
        match c.flow(dp, 1.0, &air, &air, EvalMode::Full).unwrap() {
            ElementFlow::Single(f) => f,
            _ => panic!(),
        }
    }

    #[test]
    fn reproduces_rated_point() {
        let coil = DistributionComponent::new(DistributionKind::Coil, 0.8, 40.0).unwrap();
        let f = eval(&coil, 40.0);
        assert!((f.mass_flow - 0.8).abs() < 1e-12, "{}", f.mass_flow);
    }

    #[test]
    fn square_law_scaling() {
        let hx = DistributionComponent::new(DistributionKind::HeatExchanger, 1.0, 50.0).unwrap();
        let f1 = eval(&hx, 25.0).mass_flow;
        let f2 = eval(&hx, 100.0).mass_flow;
        assert!((f2 / f1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn kind_names() {
        let tu = DistributionComponent::new(DistributionKind::TerminalUnit, 0.5, 30.0).unwrap();
        assert_eq!(FlowElement::kind(&tu), "terminal unit");
    }

    #[test]
    fn rejects_non_positive_rating() {
        assert!(DistributionComponent::new(DistributionKind::Coil, 0.0, 40.0).is_err());
        assert!(DistributionComponent::new(DistributionKind::Coil, 0.8, -1.0).is_err());
    }
}
