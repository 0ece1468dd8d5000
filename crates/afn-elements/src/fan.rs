//! Fan elements.
//!
//! Fans drive flow in the link's `from` to `to` direction regardless of the
//! sign of the pressure difference. The pressure rise the fan works against
//! is `-dp` under the shared sign convention.

use crate::common::check_finite;
use crate::error::{ElementError, ElementResult};
use crate::traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
use afn_air::AirState;

/// Residual pressure sensitivity assigned to flows that are nominally
/// independent of dP, keeping the Jacobian diagonal regular.
const REGULARIZING_SLOPE: f64 = 1e-6;

/// Fan that delivers its rated mass flow scaled by the control signal,
/// independent of the system pressure.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantVolumeFan {
    /// Rated mass flow at full speed (kg/s)
    pub rated_flow: f64,
}

impl ConstantVolumeFan {
    pub fn new(rated_flow: f64) -> ElementResult<Self> {
        if !(rated_flow > 0.0 && rated_flow.is_finite()) {
            return Err(ElementError::InvalidParameter {
                what: "rated fan flow must be positive",
            });
        }
        Ok(Self { rated_flow })
    }
}

impl FlowElement for ConstantVolumeFan {
    fn kind(&self) -> &'static str {
        "constant volume fan"
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
        let flow = control * self.rated_flow + REGULARIZING_SLOPE * dp;
        Ok(ElementFlow::Single(FlowDeriv::new(flow, REGULARIZING_SLOPE)))
    }
}

/// Fan following a performance curve given as (pressure rise, mass flow)
/// points. Flow is interpolated linearly between points and clamped at the
/// curve ends; the control signal scales the delivered flow.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveFan {
    /// Curve points as (pressure rise in Pa, mass flow in kg/s), with the
    /// rise strictly increasing and the flow non-increasing.
    points: Vec<(f64, f64)>,
}

impl CurveFan {
    pub fn new(points: Vec<(f64, f64)>) -> ElementResult<Self> {
        if points.len() < 2 {
            return Err(ElementError::InvalidParameter {
                what: "fan curve needs at least two points",
            });
        }
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(ElementError::InvalidParameter {
                    what: "fan curve pressure rises must be strictly increasing",
                });
            }
            if pair[1].1 > pair[0].1 {
                return Err(ElementError::InvalidParameter {
                    what: "fan curve flow must not increase with pressure rise",
                });
            }
        }
        if points.iter().any(|&(_, f)| !(f >= 0.0) || !f.is_finite()) {
            return Err(ElementError::InvalidParameter {
                what: "fan curve flows must be finite and non-negative",
            });
        }
        Ok(Self { points })
    }

    /// Flow and its slope with respect to the pressure rise.
    fn interpolate(&self, rise: f64) -> (f64, f64) {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if rise <= first.0 {
            return (first.1, 0.0);
        }
        if rise >= last.0 {
            return (last.1, 0.0);
        }
        for pair in self.points.windows(2) {
            let (r0, f0) = pair[0];
            let (r1, f1) = pair[1];
            if rise <= r1 {
                let slope = (f1 - f0) / (r1 - r0);
                return (f0 + slope * (rise - r0), slope);
            }
        }
        (last.1, 0.0)
    }
}

impl FlowElement for CurveFan {
    fn kind(&self) -> &'static str {
        "curve fan"
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
        // The fan raises pressure from `from` to `to`, against the sign
        // convention of dp.
        let rise = -dp;
        let (flow, slope_rise) = self.interpolate(rise);
        // d(flow)/d(dp) = -d(flow)/d(rise); flat curve segments still get the
        // regularizing slope.
        let dflow = control * (-slope_rise) + REGULARIZING_SLOPE;
        let flow = control * flow + REGULARIZING_SLOPE * dp;
        check_finite(flow, "fan flow")?;
        Ok(ElementFlow::Single(FlowDeriv::new(flow, dflow)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fan: &dyn FlowElement, dp: f64, ctl: f64) -> FlowDeriv {
        let air = AirState::default();
        match fan.flow(dp, ctl, &air, &air, EvalMode::Full).unwrap() {
            ElementFlow::Single(f) => f,
            _ => panic!("fans are single-flow"),
        }
    }

    #[test]
    fn constant_fan_delivers_rated_flow() {
        let fan = ConstantVolumeFan::new(0.5).unwrap();
        let f = eval(&fan, -30.0, 1.0);
        assert!((f.mass_flow - 0.5).abs() < 1e-3);
        assert!(f.dmass_dp > 0.0);
    }

    #[test]
    fn constant_fan_scales_with_control() {
        let fan = ConstantVolumeFan::new(0.5).unwrap();
        assert!((eval(&fan, 0.0, 0.4).mass_flow - 0.2).abs() < 1e-12);
        assert_eq!(eval(&fan, -30.0, 0.0).mass_flow, 0.0);
    }

    #[test]
    fn curve_fan_validation() {
        assert!(CurveFan::new(vec![(0.0, 1.0)]).is_err());
        assert!(CurveFan::new(vec![(0.0, 1.0), (0.0, 0.5)]).is_err());
        assert!(CurveFan::new(vec![(0.0, 0.5), (100.0, 1.0)]).is_err());
        assert!(CurveFan::new(vec![(0.0, 1.0), (100.0, 0.0)]).is_ok());
    }

    #[test]
    fn curve_fan_follows_curve() {
        let fan = CurveFan::new(vec![(0.0, 1.0), (100.0, 0.0)]).unwrap();
        // Working against a 50 Pa rise: halfway down the curve
        let f = eval(&fan, -50.0, 1.0);
        assert!((f.mass_flow - 0.5).abs() < 1e-3);
        // Flow increases as dp increases (rise shrinks)
        assert!(f.dmass_dp > 0.0);
    }

    #[test]
    fn curve_fan_clamps_beyond_endpoints() {
        let fan = CurveFan::new(vec![(0.0, 1.0), (100.0, 0.0)]).unwrap();
        let free = eval(&fan, 10.0, 1.0); // negative rise: free delivery
        let stalled = eval(&fan, -200.0, 1.0); // beyond shutoff
        assert!((free.mass_flow - 1.0).abs() < 1e-3);
        assert!(stalled.mass_flow.abs() < 1e-3);
    }
}
