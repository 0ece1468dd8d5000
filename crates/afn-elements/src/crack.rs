//! Power-law crack element.

use crate::common::{check_finite, laminar_turbulent_select, reference_correction};
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;

/// Surface crack or orifice-like leakage path following the power law
/// `F = C * |dP|^n`, with a laminar branch near zero pressure difference.
///
/// The coefficient is measured at standard conditions (kg/s at 1 Pa); a
/// density/viscosity correction translates it to the local upstream state.
/// Of the laminar and turbulent forms, the smaller-magnitude flow governs, so
/// the relation is linear (finite derivative) through dP = 0.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerLawCrack {
    /// Mass flow coefficient at 1 Pa, standard conditions (kg/s)
    pub coefficient: f64,
    /// Flow exponent, 0.5..=1.0
    pub exponent: f64,
}

impl PowerLawCrack {
    /// Default flow exponent for cracks.
    pub const DEFAULT_EXPONENT: f64 = 0.65;

    pub fn new(coefficient: f64, exponent: f64) -> ElementResult<Self> {
        if !(coefficient > 0.0 && coefficient.is_finite()) {
            return Err(ElementError::InvalidParameter {
                what: "crack coefficient must be positive",
            });
        }
        if !(0.5..=1.0).contains(&exponent) {
            return Err(ElementError::InvalidParameter {
                what: "crack exponent must be in 0.5..=1.0",
            });
        }
        Ok(Self {
            coefficient,
            exponent,
        })
    }

    /// Crack with the default exponent of 0.65.
    pub fn with_default_exponent(coefficient: f64) -> ElementResult<Self> {
        Self::new(coefficient, Self::DEFAULT_EXPONENT)
    }
}

/// Shared power-law evaluation used by the crack and the elements that reduce
/// to it (leakage areas, distribution components).
pub(crate) fn power_law_flow(
    coefficient: f64,
    expn: f64,
    dp: f64,
    control: f64,
    from_state: &AirState,
    to_state: &AirState,
    mode: EvalMode,
) -> ElementResult<ElementFlow> {
    if control <= 0.0 {
        return Ok(ElementFlow::Single(FlowDeriv::ZERO));
    }

    // Density and viscosity from the upstream side of the current difference.
    let up = if dp >= 0.0 { from_state } else { to_state };
    let corr = reference_correction(expn, up.density, up.viscosity);
    let coef = coefficient * control * corr;

    // Laminar form: linear in dp, slope from the upstream transport state.
    let cdm = coef * up.density / up.viscosity;
    let flow_lam = cdm * dp;

    if mode == EvalMode::Linear {
        return Ok(ElementFlow::Single(FlowDeriv::new(flow_lam, cdm)));
    }

    // Turbulent form: C * sqrt(rho) * |dp|^n, signed.
    let dp_abs = dp.abs();
    let flow_turb_mag = coef * up.density.sqrt() * dp_abs.powf(expn);
    let flow_turb = flow_turb_mag.copysign(dp);
    let dflow_turb = if dp_abs > 0.0 {
        flow_turb_mag * expn / dp_abs
    } else {
        cdm
    };

    let (flow, dflow) = laminar_turbulent_select(flow_lam, cdm, flow_turb, dflow_turb);
    check_finite(flow, "power-law flow")?;
    check_finite(dflow, "power-law flow derivative")?;
    Ok(ElementFlow::Single(FlowDeriv::new(flow, dflow)))
}

impl FlowElement for PowerLawCrack {
    fn kind(&self) -> &'static str {
        "power-law crack"
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
            self.coefficient,
            self.exponent,
            dp,
            control,
            from_state,
            to_state,
            mode,
        )
    }
}
