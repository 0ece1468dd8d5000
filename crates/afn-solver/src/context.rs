//! Allocate-once solver workspace and the Newton pressure driver.

use afn_air::AirState;
use afn_elements::{ElementFlow, EvalMode, FlowDeriv};
use afn_graph::{Network, UnknownIndex};
use afn_skyline::{SkylineError, SkylineMatrix, SkylineStructure};
use nalgebra::DVector;
use tracing::{debug, warn};

use crate::config::{InitMethod, SolverConfig};
use crate::error::{SolverError, SolverResult};
use crate::inputs::StepInputs;
use crate::pressure::{stack_pressure, wind_pressure};
use crate::problem::AirflowProblem;
use crate::solution::Solution;
use crate::transport;

/// Reusable solver workspace sized once per topology.
///
/// Owns every array the Newton driver and the transport pass touch:
/// pressures, per-node air states, per-link flows, residuals, correction
/// history and both skyline matrices. A solve overwrites these in place, so
/// one context serves every timestep of a run without reallocating, and the
/// `&mut self` entry point makes the single-caller discipline a compile-time
/// fact.
pub struct SolverContext {
    pub(crate) index: UnknownIndex,
    /// Symmetric Jacobian for the pressure correction system.
    pub(crate) jacobian: SkylineMatrix,
    /// General matrix for the (non-symmetric) transport systems.
    pub(crate) transport: SkylineMatrix,

    /// Relative pressure per node; boundary entries hold the wind term.
    pub(crate) pressures: Vec<f64>,
    /// Air state per node, rebuilt each solve from the step inputs.
    pub(crate) states: Vec<AirState>,
    /// Resolved flow per link from the latest element evaluation.
    pub(crate) flows: Vec<ElementFlow>,
    /// Net flow per link from the previous iteration, for upstream selection.
    prev_net: Vec<f64>,

    /// Residual per unknown row: signed sum of flows, positive = net inflow.
    residual: DVector<f64>,
    /// Sum of flow magnitudes per unknown row, for the relative test.
    sum_abs: DVector<f64>,
    /// Current pressure correction per unknown row.
    ccf: DVector<f64>,
    /// Prior iteration's correction, for the acceleration trend.
    pcf: DVector<f64>,
    /// Right-hand side workspace for the transport systems.
    pub(crate) rhs: DVector<f64>,

    n_nodes: usize,
    n_links: usize,
    nonconv_detailed: bool,
    pub(crate) setpoint_warned: bool,
}

impl SolverContext {
    /// Build a context for a network. The skyline profile is computed here,
    /// once, from the link connectivity over the unknown numbering.
    pub fn new(network: &Network) -> Self {
        let index = UnknownIndex::from_network(network);
        let n = index.n_unknowns();

        let pairs = network.links().iter().filter_map(|link| {
            match (index.row(link.from), index.row(link.to)) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            }
        });
        let structure = SkylineStructure::from_pairs(n, pairs);

        Self {
            jacobian: SkylineMatrix::new(structure.clone(), true),
            transport: SkylineMatrix::new(structure, false),
            index,
            pressures: vec![0.0; network.nodes().len()],
            states: vec![AirState::default(); network.nodes().len()],
            flows: vec![ElementFlow::Single(FlowDeriv::ZERO); network.links().len()],
            prev_net: vec![0.0; network.links().len()],
            residual: DVector::zeros(n),
            sum_abs: DVector::zeros(n),
            ccf: DVector::zeros(n),
            pcf: DVector::zeros(n),
            rhs: DVector::zeros(n),
            n_nodes: network.nodes().len(),
            n_links: network.links().len(),
            nonconv_detailed: false,
            setpoint_warned: false,
        }
    }

    /// Solve one timestep: pressures and flows by Newton iteration, then the
    /// scalar transport pass over the converged flow field.
    pub fn solve(
        &mut self,
        problem: &AirflowProblem<'_>,
        inputs: &StepInputs,
        config: &SolverConfig,
    ) -> SolverResult<Solution> {
        let network = problem.network();
        problem.validate()?;
        inputs.validate(network)?;
        if network.nodes().len() != self.n_nodes || network.links().len() != self.n_links {
            return Err(SolverError::ProblemSetup {
                what: "context was built for a different network".into(),
            });
        }

        // Per-node air states and boundary pressures for this timestep
        for node in network.nodes() {
            let i = node.id.index() as usize;
            let cond = &inputs.nodes[i];
            self.states[i] = AirState::from_raw(
                inputs.barometric_pressure,
                cond.temperature,
                cond.humidity_ratio,
            );
            if node.is_boundary() {
                self.pressures[i] = wind_pressure(
                    inputs.wind_cp[i],
                    self.states[i].density,
                    inputs.wind_speed,
                );
            }
        }

        self.prev_net.fill(0.0);
        self.pcf.fill(0.0);

        if config.init == InitMethod::Linear {
            self.linear_guess(problem, inputs)?;
        }

        let iterations = self.newton_loop(problem, inputs, config)?;

        let scalars = transport::run(self, problem, inputs)?;

        Ok(Solution {
            pressures: self.pressures.clone(),
            flows: self.flows.clone(),
            temperature: scalars.temperature,
            humidity: scalars.humidity,
            co2: scalars.co2,
            contaminant: scalars.contaminant,
            iterations,
        })
    }

    /// One linear solve with every element's laminar form, starting the
    /// Newton iteration from a consistent pressure field instead of zeros.
    fn linear_guess(
        &mut self,
        problem: &AirflowProblem<'_>,
        inputs: &StepInputs,
    ) -> SolverResult<()> {
        for (_, node) in self.index.rows() {
            self.pressures[node.index() as usize] = 0.0;
        }
        self.assemble(problem, inputs, EvalMode::Linear)?;
        if self.index.n_unknowns() == 0 {
            return Ok(());
        }
        self.jacobian
            .factorize()
            .map_err(|e| self.map_singular(problem.network(), e))?;
        self.ccf.copy_from(&self.residual);
        self.jacobian
            .solve_in_place(self.ccf.as_mut_slice())
            .map_err(|e| self.map_singular(problem.network(), e))?;
        for (row, node) in self.index.rows() {
            self.pressures[node.index() as usize] += self.ccf[row];
        }
        Ok(())
    }

    /// The modified Newton iteration with per-node convergence tests and
    /// oscillation-damping acceleration. Returns the iteration count.
    fn newton_loop(
        &mut self,
        problem: &AirflowProblem<'_>,
        inputs: &StepInputs,
        config: &SolverConfig,
    ) -> SolverResult<usize> {
        for iter in 1..=config.max_iterations {
            self.assemble(problem, inputs, EvalMode::Full)?;

            let worst_res = self.worst_residual().1;
            if self.converged(config) {
                debug!(iteration = iter, residual = worst_res, "converged");
                return Ok(iter);
            }
            debug!(iteration = iter, residual = worst_res, "newton iteration");

            self.jacobian
                .factorize()
                .map_err(|e| self.map_singular(problem.network(), e))?;
            self.ccf.copy_from(&self.residual);
            self.jacobian
                .solve_in_place(self.ccf.as_mut_slice())
                .map_err(|e| self.map_singular(problem.network(), e))?;

            self.apply_correction(iter, config);
        }

        let (worst_row, worst_res) = self.worst_residual();
        let worst_node = self.index.node(worst_row);
        let worst_name = problem
            .network()
            .node(worst_node)
            .map(|n| n.name.clone())
            .unwrap_or_default();
        if !self.nonconv_detailed {
            self.nonconv_detailed = true;
            warn!(
                iterations = config.max_iterations,
                node = %worst_name,
                residual = worst_res,
                abs_tol = config.abs_tol,
                rel_tol = config.rel_tol,
                "pressure iteration failed to converge; further failures logged in brief"
            );
        } else {
            warn!(residual = worst_res, "pressure iteration failed to converge");
        }
        Err(SolverError::NonConvergence {
            iterations: config.max_iterations,
            worst_node: worst_name,
            residual: worst_res,
        })
    }

    /// Evaluate every link at the current pressures, accumulating residual,
    /// absolute-flow sums and the Jacobian.
    fn assemble(
        &mut self,
        problem: &AirflowProblem<'_>,
        inputs: &StepInputs,
        mode: EvalMode,
    ) -> SolverResult<()> {
        let network = problem.network();
        self.jacobian.zero();
        self.residual.fill(0.0);
        self.sum_abs.fill(0.0);

        for link in network.links() {
            let li = link.id.index() as usize;
            let fi = link.from.index() as usize;
            let ti = link.to.index() as usize;
            let from_state = self.states[fi];
            let to_state = self.states[ti];
            let (node_from, node_to) = match (network.node(link.from), network.node(link.to)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(SolverError::ProblemSetup {
                        what: format!("link {} references a missing node", link.name),
                    });
                }
            };

            let ps = stack_pressure(
                node_from.height,
                node_to.height,
                link.height_from,
                link.height_to,
                &from_state,
                &to_state,
                self.prev_net[li],
            );
            let dp = self.pressures[fi] - self.pressures[ti] + ps;

            let element = problem.element(link.id).ok_or_else(|| {
                SolverError::ProblemSetup {
                    what: format!("link {} has no flow element", link.name),
                }
            })?;
            let flow = element
                .flow(dp, inputs.controls[li], &from_state, &to_state, mode)
                .map_err(|source| SolverError::Element {
                    link: link.name.clone(),
                    source,
                })?;

            let net = flow.net();
            let c = flow.net_derivative();
            self.flows[li] = flow;
            self.prev_net[li] = net;

            let rows = [self.index.row(link.from), self.index.row(link.to)];
            if let Some(r) = rows[0] {
                self.residual[r] -= net;
                self.sum_abs[r] += flow.abs_sum();
            }
            if let Some(r) = rows[1] {
                self.residual[r] += net;
                self.sum_abs[r] += flow.abs_sum();
            }
            self.jacobian
                .add_block(rows, [[c, -c], [-c, c]])
                .map_err(|e| SolverError::Numeric {
                    what: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Per-node convergence: absolute tolerance or residual relative to the
    /// node's total absolute flow.
    fn converged(&self, config: &SolverConfig) -> bool {
        (0..self.index.n_unknowns()).all(|r| {
            let res = self.residual[r].abs();
            res <= config.abs_tol || res <= config.rel_tol * self.sum_abs[r]
        })
    }

    fn worst_residual(&self) -> (usize, f64) {
        let mut worst = (0, 0.0);
        for r in 0..self.index.n_unknowns() {
            let res = self.residual[r].abs();
            if res > worst.1 {
                worst = (r, res);
            }
        }
        worst
    }

    /// Apply the pressure correction with Steffensen-style acceleration.
    ///
    /// The per-node ratio of the current to the prior correction is inspected
    /// only after iteration 2 and only on every other iteration; when it
    /// falls below the acceleration limit (slowly damped oscillation) the
    /// step is scaled by `1 / (1 - ratio)`. Each node's step is clamped to
    /// the configured maximum.
    fn apply_correction(&mut self, iter: usize, config: &SolverConfig) {
        let accelerate = iter > 2 && iter % 2 == 0;
        for (row, node) in self.index.rows() {
            let ccf = self.ccf[row];
            let mut cef = 1.0;
            if accelerate {
                let pcf = self.pcf[row];
                if pcf != 0.0 {
                    let ratio = ccf / pcf;
                    if ratio < config.accel_limit {
                        cef = 1.0 / (1.0 - ratio);
                    }
                }
            }
            let mut step = cef * ccf;
            if step.abs() > config.max_pressure_step {
                step = config.max_pressure_step.copysign(step);
            }
            self.pressures[node.index() as usize] += step;
            self.pcf[row] = ccf;
        }
    }

    fn map_singular(&self, network: &Network, e: SkylineError) -> SolverError {
        match e {
            SkylineError::SingularPivot { row, .. } => {
                let node = self.index.node(row);
                let name = network
                    .node(node)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                SolverError::SingularSystem { node, name }
            }
            other => SolverError::Numeric {
                what: other.to_string(),
            },
        }
    }
}
