//! Core network data structures.

use afn_core::{LinkId, NodeId};

/// Role of a node in the pressure system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Pressure unknown, solved by the Newton driver (zone or distribution node).
    Internal,
    /// Pressure known (0 Pa relative plus wind); temperature/humidity supplied
    /// by the host each timestep. Excluded from the unknown numbering.
    Boundary,
}

/// A pressure node: a zone, an outdoor boundary, or a duct junction.
///
/// Nodes carry topology and elevation only; mutable per-timestep state
/// (pressure, scalar fields) lives in the solver context.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Reference elevation of the node (m)
    pub height: f64,
}

impl Node {
    /// True for boundary (pressure-known) nodes.
    pub fn is_boundary(&self) -> bool {
        self.kind == NodeKind::Boundary
    }
}

/// A connection between two nodes carrying one flow element.
///
/// Directed by convention: positive flow runs `from` -> `to`. Physically the
/// element may pass flow either way (and, for large openings, both ways at
/// once). The element instance itself is attached in the problem definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    /// Elevation of the link opening at the `from` end (m)
    pub height_from: f64,
    /// Elevation of the link opening at the `to` end (m)
    pub height_to: f64,
}

/// The network: a validated, immutable collection of nodes and links.
///
/// Stores compact adjacency: for each node, which links are incident. The
/// layout (offsets + flat list) is optimized for the solver's per-node
/// residual accumulation.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,

    /// Offsets for node->link adjacency: node i's links are in
    /// node_links[node_link_offsets[i]..node_link_offsets[i+1]].
    pub(crate) node_link_offsets: Vec<usize>,

    /// Flat list of link IDs incident to nodes (sorted for determinism).
    pub(crate) node_links: Vec<LinkId>,
}

impl Network {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    /// Get a link by ID (returns None if ID out of bounds).
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index() as usize)
    }

    /// Iterate over all link IDs incident to a given node.
    pub fn node_links(&self, node_id: NodeId) -> &[LinkId] {
        let idx = node_id.index() as usize;
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_link_offsets[idx];
        let end = self.node_link_offsets[idx + 1];
        &self.node_links[start..end]
    }

    /// Number of boundary nodes.
    pub fn boundary_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_boundary()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afn_core::Id;

    #[test]
    fn node_kind_predicates() {
        let n = Node {
            id: Id::from_index(0),
            name: "outdoor".into(),
            kind: NodeKind::Boundary,
            height: 0.0,
        };
        assert!(n.is_boundary());

        let z = Node {
            id: Id::from_index(1),
            name: "zone".into(),
            kind: NodeKind::Internal,
            height: 1.5,
        };
        assert!(!z.is_boundary());
    }
}
