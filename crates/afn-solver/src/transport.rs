//! Scalar transport pass over the converged flow field.
//!
//! Temperature, humidity ratio, CO2 and a generic contaminant are advected
//! through the network by the resolved link flows. Each quantity is an
//! independent linear system on the unknown numbering: a node's diagonal
//! collects its outflows, off-diagonals couple it to upstream internal
//! nodes, and upstream boundary values land on the right-hand side. Duct
//! links attenuate what arrives downstream, the lost fraction relaxing
//! toward the duct's environment.

use afn_core::NodeId;
use afn_elements::ElementFlow;

use crate::context::SolverContext;
use crate::error::{SolverError, SolverResult};
use crate::inputs::StepInputs;
use crate::problem::AirflowProblem;

/// Flows below this carry no scalar transport (kg/s).
const MIN_TRANSPORT_FLOW: f64 = 1e-12;

/// Scalar fields after the transport pass, per node.
pub(crate) struct ScalarFields {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub co2: Vec<f64>,
    pub contaminant: Vec<f64>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Temperature,
    Humidity,
    Co2,
    Contaminant,
}

pub(crate) fn run(
    ctx: &mut SolverContext,
    problem: &AirflowProblem<'_>,
    inputs: &StepInputs,
) -> SolverResult<ScalarFields> {
    Ok(ScalarFields {
        temperature: solve_quantity(ctx, problem, inputs, Quantity::Temperature)?,
        humidity: solve_quantity(ctx, problem, inputs, Quantity::Humidity)?,
        co2: solve_quantity(ctx, problem, inputs, Quantity::Co2)?,
        contaminant: solve_quantity(ctx, problem, inputs, Quantity::Contaminant)?,
    })
}

fn solve_quantity(
    ctx: &mut SolverContext,
    problem: &AirflowProblem<'_>,
    inputs: &StepInputs,
    quantity: Quantity,
) -> SolverResult<Vec<f64>> {
    let network = problem.network();
    let mut values: Vec<f64> = inputs
        .nodes
        .iter()
        .map(|c| match quantity {
            Quantity::Temperature => c.temperature,
            Quantity::Humidity => c.humidity_ratio,
            Quantity::Co2 => c.co2,
            Quantity::Contaminant => c.contaminant,
        })
        .collect();
    if ctx.index.n_unknowns() == 0 {
        return Ok(values);
    }

    ctx.transport.zero();
    ctx.rhs.fill(0.0);

    for link in network.links() {
        let li = link.id.index() as usize;

        // Directed parts: (upstream, downstream, magnitude)
        let mut parts: [Option<(NodeId, NodeId, f64)>; 2] = [None, None];
        match ctx.flows[li] {
            ElementFlow::Single(f) => {
                if f.mass_flow >= 0.0 {
                    parts[0] = Some((link.from, link.to, f.mass_flow));
                } else {
                    parts[0] = Some((link.to, link.from, -f.mass_flow));
                }
            }
            ElementFlow::Dual { forward, reverse } => {
                parts[0] = Some((link.from, link.to, forward.mass_flow));
                parts[1] = Some((link.to, link.from, reverse.mass_flow));
            }
        }

        for (up, down, m) in parts.into_iter().flatten() {
            if m <= MIN_TRANSPORT_FLOW {
                continue;
            }
            let ui = up.index() as usize;
            let factor = match quantity {
                Quantity::Temperature => ctx.states[ui].specific_heat(),
                _ => 1.0,
            };

            // Duct attenuation: the fraction surviving to the downstream
            // end; the remainder relaxes toward the duct environment.
            let (att, env) = match problem.element(link.id).and_then(|e| e.duct_loss()) {
                Some(loss) => match quantity {
                    Quantity::Temperature if loss.ua_heat > 0.0 => (
                        (-loss.ua_heat / (m * factor)).exp(),
                        inputs.duct_env_temperature,
                    ),
                    Quantity::Humidity if loss.ua_moisture > 0.0 => {
                        ((-loss.ua_moisture / m).exp(), inputs.duct_env_humidity)
                    }
                    _ => (1.0, 0.0),
                },
                None => (1.0, 0.0),
            };

            let ru = ctx.index.row(up);
            let rd = ctx.index.row(down);

            // Outflow leaves the upstream node's balance
            if let Some(ru) = ru {
                add(&mut ctx.transport, ru, ru, m * factor)?;
            }
            // Inflow couples the downstream node to upstream
            if let Some(rd) = rd {
                let coupling = m * factor * att;
                match ru {
                    Some(ru) => add(&mut ctx.transport, rd, ru, -coupling)?,
                    None => ctx.rhs[rd] += coupling * values[ui],
                }
                if att < 1.0 {
                    ctx.rhs[rd] += m * factor * (1.0 - att) * env;
                }
            }
        }
    }

    // A node no flow reaches or leaves keeps its input value
    for (row, node) in ctx.index.rows() {
        if ctx.transport.diag(row).abs() < MIN_TRANSPORT_FLOW {
            add(&mut ctx.transport, row, row, 1.0)?;
            ctx.rhs[row] = values[node.index() as usize];
        }
    }

    ctx.transport.factorize().map_err(|e| SolverError::Numeric {
        what: format!("transport factorization: {e}"),
    })?;
    ctx.transport
        .solve_in_place(ctx.rhs.as_mut_slice())
        .map_err(|e| SolverError::Numeric {
            what: format!("transport solve: {e}"),
        })?;

    for (row, node) in ctx.index.rows() {
        values[node.index() as usize] = ctx.rhs[row];
    }
    Ok(values)
}

fn add(
    matrix: &mut afn_skyline::SkylineMatrix,
    row: usize,
    col: usize,
    value: f64,
) -> SolverResult<()> {
    matrix
        .add(row, col, value)
        .map_err(|e| SolverError::Numeric {
            what: format!("transport assembly: {e}"),
        })
}
