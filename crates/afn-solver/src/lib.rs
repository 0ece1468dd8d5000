//! Steady-state airflow network solver.
//!
//! Finds the nodal pressure field that conserves mass across a network of
//! flow elements (cracks, openings, ducts, fans), including buoyancy (stack)
//! and wind pressure source terms, then advects temperature, humidity, CO2
//! and a generic contaminant through the resolved flows.
//!
//! Usage shape: build a [`afn_graph::Network`], attach one element per link
//! in an [`AirflowProblem`], create one [`SolverContext`] per topology, and
//! call [`SolverContext::solve`] once per timestep with that timestep's
//! [`StepInputs`]. The context owns all working storage and is reused across
//! calls without reallocating.

pub mod config;
pub mod context;
pub mod error;
pub mod inputs;
pub mod pressure;
pub mod problem;
pub mod setpoint;
pub mod solution;
mod transport;

pub use config::{InitMethod, SolverConfig};
pub use context::SolverContext;
pub use error::{SolverError, SolverResult};
pub use inputs::{NodeConditions, StepInputs};
pub use problem::AirflowProblem;
pub use setpoint::SetPointSearch;
pub use solution::Solution;
