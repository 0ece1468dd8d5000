//! Airflow network topology.
//!
//! A network is a connected multigraph of pressure nodes (zones, outdoor
//! boundaries, distribution points) joined by links, each link carrying one
//! flow element. Topology is fixed once per simulation run: the builder
//! validates and freezes it into an immutable [`Network`], and the solver
//! derives its unknown numbering from it exactly once.

pub mod builder;
pub mod error;
pub mod indexing;
pub mod network;
mod validate;

pub use builder::NetworkBuilder;
pub use error::NetworkError;
pub use indexing::UnknownIndex;
pub use network::{Link, Network, Node, NodeKind};
