//! Detailed large opening with staged geometry.
//!
//! The opening is described at up to four opening-factor breakpoints; width,
//! height and discharge coefficient are interpolated linearly between the
//! stages bracketing the current control value, then evaluated with the same
//! neutral-plane flow math as the simple opening.

use crate::error::{ElementError, ElementResult};
use crate::opening::vertical_opening_flow;
use crate::traits::{ElementFlow, EvalMode, FlowElement};
use afn_air::AirState;

/// Maximum number of geometry breakpoints.
pub const MAX_STAGES: usize = 4;

/// Opening geometry at one opening-factor breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpeningStage {
    /// Opening factor this stage applies at, 0..=1
    pub opening_factor: f64,
    /// Openable width at this factor (m)
    pub width: f64,
    /// Openable height at this factor (m)
    pub height: f64,
    /// Discharge coefficient at this factor
    pub discharge_coeff: f64,
}

impl OpeningStage {
    pub fn new(opening_factor: f64, width: f64, height: f64, discharge_coeff: f64) -> Self {
        Self {
            opening_factor,
            width,
            height,
            discharge_coeff,
        }
    }
}

/// Large opening whose geometry changes with the opening factor (e.g. a
/// casement window that is taller than it is wide when cracked open).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedOpening {
    stages: Vec<OpeningStage>,
    /// Minimum density difference for two-way flow (kg/m^3)
    pub min_density_diff: f64,
}

impl DetailedOpening {
    /// Stages must be sorted by opening factor, start at 0 and end at 1.
    pub fn new(stages: Vec<OpeningStage>, min_density_diff: f64) -> ElementResult<Self> {
        if stages.len() < 2 || stages.len() > MAX_STAGES {
            return Err(ElementError::InvalidParameter {
                what: "detailed opening needs 2 to 4 stages",
            });
        }
        if stages.first().map(|s| s.opening_factor) != Some(0.0)
            || stages.last().map(|s| s.opening_factor) != Some(1.0)
        {
            return Err(ElementError::InvalidParameter {
                what: "opening factors must start at 0 and end at 1",
            });
        }
        for pair in stages.windows(2) {
            if pair[1].opening_factor <= pair[0].opening_factor {
                return Err(ElementError::InvalidParameter {
                    what: "opening factors must be strictly increasing",
                });
            }
        }
        for stage in &stages {
            if !(stage.width >= 0.0 && stage.height >= 0.0 && stage.discharge_coeff >= 0.0) {
                return Err(ElementError::InvalidParameter {
                    what: "stage geometry must be non-negative",
                });
            }
        }
        if !(min_density_diff > 0.0) {
            return Err(ElementError::InvalidParameter {
                what: "minimum density difference must be positive",
            });
        }
        Ok(Self {
            stages,
            min_density_diff,
        })
    }

    pub fn stages(&self) -> &[OpeningStage] {
        &self.stages
    }

    /// Geometry at an opening factor, interpolated between bracketing stages.
    fn geometry_at(&self, factor: f64) -> (f64, f64, f64) {
        let factor = factor.clamp(0.0, 1.0);
        let hi = self
            .stages
            .iter()
            .position(|s| s.opening_factor >= factor)
            .unwrap_or(self.stages.len() - 1);
        if hi == 0 {
            let s = &self.stages[0];
            return (s.width, s.height, s.discharge_coeff);
        }
        let (lo, hi) = (&self.stages[hi - 1], &self.stages[hi]);
        let t = (factor - lo.opening_factor) / (hi.opening_factor - lo.opening_factor);
        (
            lo.width + t * (hi.width - lo.width),
            lo.height + t * (hi.height - lo.height),
            lo.discharge_coeff + t * (hi.discharge_coeff - lo.discharge_coeff),
        )
    }
}

impl FlowElement for DetailedOpening {
    fn kind(&self) -> &'static str {
        "detailed opening"
    }

    fn flow(
        &self,
        dp: f64,
        control: f64,
        from_state: &AirState,
        to_state: &AirState,
        mode: EvalMode,
    ) -> ElementResult<ElementFlow> {
        let (width, height, cd) = self.geometry_at(control);
        vertical_opening_flow(
            width,
            height.max(0.0),
            cd,
            self.min_density_diff,
            dp,
            from_state,
            to_state,
            mode,
        )
    }
}
