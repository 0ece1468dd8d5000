//! Network-specific error types.

use afn_core::{AfnError, LinkId, NodeId};
use thiserror::Error;

/// Network construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Link {link} refers to non-existent node {node}")]
    InvalidNodeRef { link: LinkId, node: NodeId },

    #[error("Link {link} connects node {node} to itself")]
    SelfLoop { link: LinkId, node: NodeId },

    #[error("Network has no boundary node; the pressure system has no reference")]
    NoBoundaryNode,

    #[error("Node {node} ({name}) has no connected links")]
    IsolatedNode { node: NodeId, name: String },

    #[error("Node {node} ({name}) is not reachable from any boundary node")]
    UnreachableNode { node: NodeId, name: String },

    #[error("ID not found: {what}")]
    IdNotFound { what: &'static str },
}

impl From<NetworkError> for AfnError {
    fn from(_: NetworkError) -> Self {
        AfnError::Invariant {
            what: "network topology",
        }
    }
}
