//! Error types for solver operations.

use afn_core::NodeId;
use afn_elements::ElementError;
use afn_graph::NetworkError;
use thiserror::Error;

/// Errors that can occur while solving an airflow network.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Singular pressure system at node {node} ({name}): disconnected or rank-deficient")]
    SingularSystem { node: NodeId, name: String },

    #[error(
        "Pressure iteration failed to converge after {iterations} iterations \
         (worst node {worst_node}, residual {residual:e} kg/s)"
    )]
    NonConvergence {
        iterations: usize,
        worst_node: String,
        residual: f64,
    },

    #[error("Element error on link {link}: {source}")]
    Element {
        link: String,
        source: ElementError,
    },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
