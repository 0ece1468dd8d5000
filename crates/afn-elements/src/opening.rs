//! Large vertical opening with buoyancy-driven two-way flow.
//!
//! The pressure difference across a tall opening varies linearly with height
//! when the air columns on either side have different densities. When the
//! neutral plane (zero pressure difference) falls inside the opening, air
//! flows both ways at once and the element reports an explicit dual-flow
//! result; otherwise the opening behaves as a height-integrated orifice.

use crate::common::check_finite;
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;
use afn_core::units::constants::G0_MPS2;

/// Pressure difference below which the orifice law is linearized (Pa).
const DP_LINEAR: f64 = 1e-4;

/// Simple large opening: rectangular, single discharge coefficient, two-way
/// flow when the end-to-end density difference exceeds a minimum.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleOpening {
    /// Opening width at full opening factor (m)
    pub width: f64,
    /// Opening height (m)
    pub height: f64,
    /// Discharge coefficient
    pub discharge_coeff: f64,
    /// Minimum density difference for two-way flow (kg/m^3)
    pub min_density_diff: f64,
}

impl SimpleOpening {
    pub fn new(
        width: f64,
        height: f64,
        discharge_coeff: f64,
        min_density_diff: f64,
    ) -> ElementResult<Self> {
        if !(width > 0.0 && height > 0.0 && discharge_coeff > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "opening width, height and discharge coefficient must be positive",
            });
        }
        if !(min_density_diff > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "minimum density difference must be positive",
            });
        }
        Ok(Self {
            width,
            height,
            discharge_coeff,
            min_density_diff,
        })
    }
}

impl FlowElement for SimpleOpening {
    fn kind(&self) -> &'static str {
        "simple opening"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        vertical_opening_flow(
            self.width * control,
            self.height,
            self.discharge_coeff,
            self.min_density_diff,
            dp,
            from_state,
            to_state,
            mode,
        )
    }
}

/// Height-resolved opening flow shared by the simple and detailed openings.
///
/// `dp` is interpreted at the opening's mid-height; the control factor is
/// already folded into the effective width.
#[allow(clippy::too_many_arguments)]
pub(crate) fn vertical_opening_flow(
    width: f64,
    height: f64,
    cd: f64,
    min_density_diff: f64,
    dp: f64,
    from_state: &AirState,
    to_state: &AirState,
    mode: EvalMode,
) -> ElementResult<ElementFlow> {
    if width <= 0.0 {
        return Ok(ElementFlow::Single(FlowDeriv::ZERO));
    }

    let area = width * height;
    let rho_avg = 0.5 * (from_state.density + to_state.density);

    if mode == EvalMode::Linear {
        // Orifice slope anchored at the linearization threshold
        let slope = cd * area * (2.0 * rho_avg / DP_LINEAR).sqrt();
        return Ok(ElementFlow::Single(FlowDeriv::new(slope * dp, slope)));
    }

    let drho = from_state.density - to_state.density;
    if drho.abs() < min_density_diff {
        return Ok(ElementFlow::Single(orifice(
            area, cd, dp, from_state, to_state,
        )?));
    }

    // Linear pressure profile over the opening height
    let slope_b = G0_MPS2 * drho;
    let dp_bottom = dp + slope_b * height * 0.5;
    let dp_top = dp - slope_b * height * 0.5;

    let k_from = cd * width * (2.0 * from_state.density).sqrt();
    let k_to = cd * width * (2.0 * to_state.density).sqrt();

    if dp_bottom * dp_top >= 0.0 {
        // Neutral plane outside the opening: one-way, height-integrated
        let sign = if dp_bottom + dp_top >= 0.0 { 1.0 } else { -1.0 };
        let k = if sign > 0.0 { k_from } else { k_to };
        let (ab, at) = (dp_bottom.abs(), dp_top.abs());
        let (flow_mag, dflow) = if (ab - at).abs() < 1e-12 {
            (
                k * height * ab.sqrt(),
                k * height / (2.0 * ab.sqrt().max(DP_LINEAR.sqrt())),
            )
        } else {
            (
                k * height * (ab.powf(1.5) - at.powf(1.5)) / (1.5 * (ab - at)),
                k * height / (ab.sqrt() + at.sqrt()),
            )
        };
        check_finite(flow_mag, "opening flow")?;
        check_finite(dflow, "opening flow derivative")?;
        return Ok(ElementFlow::Single(FlowDeriv::new(sign * flow_mag, dflow)));
    }

    // Two-way flow: split the opening at the neutral plane
    let z_neutral = dp_bottom / slope_b; // measured up from the bottom
    let z_neutral = z_neutral.clamp(0.0, height);

    let (span_pos, span_neg, dp_pos, dp_neg) = if dp_bottom > 0.0 {
        (z_neutral, height - z_neutral, dp_bottom, -dp_top)
    } else {
        (height - z_neutral, z_neutral, dp_top, -dp_bottom)
    };

    // Integral of sqrt(|dp(z)|) over a span that tapers linearly to zero
    let forward_flow = k_from * (2.0 / 3.0) * span_pos * dp_pos.sqrt();
    let reverse_flow = k_to * (2.0 / 3.0) * span_neg * dp_neg.sqrt();
    let b_abs = slope_b.abs();
    let forward_deriv = k_from * dp_pos.sqrt() / b_abs;
    let reverse_deriv = -(k_to * dp_neg.sqrt() / b_abs);

    check_finite(forward_flow, "opening forward flow")?;
    check_finite(reverse_flow, "opening reverse flow")?;

    Ok(ElementFlow::Dual {
        forward: FlowDeriv::new(forward_flow, forward_deriv),
        reverse: FlowDeriv::new(reverse_flow, reverse_deriv),
    })
}

/// Plain orifice law with a linear branch near zero pressure difference.
fn orifice(
    area: f64,
    cd: f64,
    dp: f64,
    from_state: &AirState,
    to_state: &AirState,
) -> ElementResult<FlowDeriv> {
    let rho_up = if dp >= 0.0 {
        from_state.density
    } else {
        to_state.density
    };
    let dp_abs = dp.abs();

    if dp_abs < DP_LINEAR {
        let slope = cd * area * (2.0 * rho_up / DP_LINEAR).sqrt();
        return Ok(FlowDeriv::new(slope * dp, slope));
    }

    let flow_mag = cd * area * (2.0 * rho_up * dp_abs).sqrt();
    let flow = flow_mag.copysign(dp);
    let dflow = 0.5 * flow_mag / dp_abs;
    check_finite(flow, "orifice flow")?;
    Ok(FlowDeriv::new(flow, dflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening() -> SimpleOpening {
        SimpleOpening::new(1.0, 2.0, 0.6, 0.001).unwrap()
    }

    fn warm_cold() -> (AirState, AirState) {
        // from: warm (light), to: cold (dense)
        (
            AirState::from_raw(101_325.0, 25.0, 0.0),
            AirState::from_raw(101_325.0, 0.0, 0.0),
        )
    }

    #[test]
    fn equal_density_is_single_orifice() {
        let air = AirState::default();
        let f = opening().flow(4.0, 1.0, &air, &air, EvalMode::Full).unwrap();
        let ElementFlow::Single(f) = f else {
            panic!("expected single flow")
        };
        let expected = 0.6 * 2.0 * (2.0 * air.density * 4.0).sqrt();
        assert!((f.mass_flow - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn buoyancy_produces_dual_flow_near_balance() {
        let (warm, cold) = warm_cold();
        // dp = 0 at mid-height with a real density difference: the neutral
        // plane sits inside the opening and air flows both ways.
        let f = opening()
            .flow(0.0, 1.0, &warm, &cold, EvalMode::Full)
            .unwrap();
        let ElementFlow::Dual { forward, reverse } = f else {
            panic!("expected dual flow, got {f:?}")
        };
        assert!(forward.mass_flow > 0.0);
        assert!(reverse.mass_flow > 0.0);
        // Cold (denser) inflow at the bottom outweighs warm outflow at the
        // top for equal spans.
        assert!(reverse.mass_flow > forward.mass_flow);
        assert!(forward.dmass_dp > 0.0);
        assert!(reverse.dmass_dp < 0.0);
    }

    #[test]
    fn large_dp_overwhelms_buoyancy() {
        let (warm, cold) = warm_cold();
        // A strong positive dp pushes the neutral plane below the opening
        let f = opening()
            .flow(50.0, 1.0, &warm, &cold, EvalMode::Full)
            .unwrap();
        let ElementFlow::Single(f) = f else {
            panic!("expected one-way flow")
        };
        assert!(f.mass_flow > 0.0);
        assert!(f.dmass_dp > 0.0);
    }

    #[test]
    fn control_scales_width() {
        let air = AirState::default();
        let full = opening().flow(4.0, 1.0, &air, &air, EvalMode::Full).unwrap();
        let half = opening().flow(4.0, 0.5, &air, &air, EvalMode::Full).unwrap();
        assert!((half.net() / full.net() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn closed_opening_no_flow() {
        let (warm, cold) = warm_cold();
        let f = opening()
            .flow(4.0, 0.0, &warm, &cold, EvalMode::Full)
            .unwrap();
        assert_eq!(f.net(), 0.0);
        assert_eq!(f.abs_sum(), 0.0);
    }

    #[test]
    fn dual_flow_conserves_direction_convention() {
        let (warm, cold) = warm_cold();
        // Negative mid-height dp: net flow should go to -> from
        let f = opening()
            .flow(-0.5, 1.0, &warm, &cold, EvalMode::Full)
            .unwrap();
        assert!(f.net() < 0.0);
    }
}
