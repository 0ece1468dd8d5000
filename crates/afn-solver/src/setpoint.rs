//! Pressure set-point search for relief/exhaust fan control.
//!
//! An outer 1-D root finder around the full Newton solve: bisect the control
//! value of one fan link until a chosen node's converged pressure hits a
//! target. Failure to hit the target is a warning, not an error; the nearest
//! achievable solution is returned so the simulation can continue.

use afn_core::{LinkId, NodeId};
use tracing::warn;

use crate::config::SolverConfig;
use crate::context::SolverContext;
use crate::error::{SolverError, SolverResult};
use crate::inputs::StepInputs;
use crate::problem::AirflowProblem;
use crate::solution::Solution;

/// What to control and what to aim for.
#[derive(Debug, Clone)]
pub struct SetPointSearch {
    /// Fan link whose control value is varied over 0..=1
    pub fan_link: LinkId,
    /// Node whose converged pressure must hit the target
    pub node: NodeId,
    /// Target relative pressure (Pa)
    pub target_pressure: f64,
    /// Acceptable distance from the target (Pa)
    pub pressure_tolerance: f64,
    /// Maximum bisection steps
    pub max_bisections: usize,
}

impl SolverContext {
    /// Solve with the fan control adjusted until the set-point node reaches
    /// its target pressure. Returns the solution and the control value used.
    pub fn solve_with_set_point(
        &mut self,
        problem: &AirflowProblem<'_>,
        inputs: &StepInputs,
        config: &SolverConfig,
        search: &SetPointSearch,
    ) -> SolverResult<(Solution, f64)> {
        let li = search.fan_link.index() as usize;
        if li >= inputs.controls.len() {
            return Err(SolverError::ProblemSetup {
                what: format!("set-point fan link {} out of range", search.fan_link),
            });
        }
        let mut trial = inputs.clone();
        let target = search.target_pressure;

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        trial.controls[li] = lo;
        let sol_lo = self.solve(problem, &trial, config)?;
        let mut p_lo = sol_lo.pressure(search.node);
        if (p_lo - target).abs() <= search.pressure_tolerance {
            return Ok((sol_lo, lo));
        }

        trial.controls[li] = hi;
        let sol_hi = self.solve(problem, &trial, config)?;
        let p_hi = sol_hi.pressure(search.node);
        if (p_hi - target).abs() <= search.pressure_tolerance {
            return Ok((sol_hi, hi));
        }

        if (p_lo - target) * (p_hi - target) > 0.0 {
            self.warn_set_point(
                search,
                "target pressure outside the fan's achievable range, using nearest endpoint",
            );
            return Ok(if (p_lo - target).abs() <= (p_hi - target).abs() {
                (sol_lo, lo)
            } else {
                (sol_hi, hi)
            });
        }

        let mut last = (sol_hi, hi);
        for _ in 0..search.max_bisections {
            let mid = 0.5 * (lo + hi);
            trial.controls[li] = mid;
            let sol = self.solve(problem, &trial, config)?;
            let p = sol.pressure(search.node);
            if (p - target).abs() <= search.pressure_tolerance {
                return Ok((sol, mid));
            }
            if (p - target) * (p_lo - target) > 0.0 {
                lo = mid;
                p_lo = p;
            } else {
                hi = mid;
            }
            last = (sol, mid);
        }

        self.warn_set_point(
            search,
            "bisection budget exhausted before reaching the target, using last estimate",
        );
        Ok(last)
    }

    fn warn_set_point(&mut self, search: &SetPointSearch, what: &str) {
        if !self.setpoint_warned {
            self.setpoint_warned = true;
            warn!(
                link = %search.fan_link,
                node = %search.node,
                target = search.target_pressure,
                "set-point search: {what}; further failures logged in brief"
            );
        } else {
            warn!("set-point search: {what}");
        }
    }
}
