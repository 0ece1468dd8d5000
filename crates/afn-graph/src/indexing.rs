//! Unknown-row numbering for solver integration.
//!
//! Boundary nodes have known pressure and are excluded from the numbering
//! entirely: the linear systems (Newton correction and scalar transport) are
//! sized to the internal nodes only, and assembly routines emit entries for
//! internal rows alone. Boundary contributions land on the right-hand side.

use afn_core::NodeId;

use crate::network::Network;

/// Bidirectional mapping between internal nodes and contiguous solver rows.
#[derive(Debug, Clone)]
pub struct UnknownIndex {
    /// Node index -> solver row; None for boundary nodes.
    row_of_node: Vec<Option<usize>>,

    /// Solver row -> node ID.
    node_of_row: Vec<NodeId>,
}

impl UnknownIndex {
    /// Build the numbering from a network. Internal nodes are numbered in
    /// node-ID order, which keeps the skyline profile tied to construction
    /// order and the result deterministic.
    pub fn from_network(network: &Network) -> Self {
        let mut row_of_node = vec![None; network.nodes().len()];
        let mut node_of_row = Vec::new();

        for node in network.nodes() {
            if !node.is_boundary() {
                row_of_node[node.id.index() as usize] = Some(node_of_row.len());
                node_of_row.push(node.id);
            }
        }

        Self {
            row_of_node,
            node_of_row,
        }
    }

    /// Number of unknowns (internal nodes).
    pub fn n_unknowns(&self) -> usize {
        self.node_of_row.len()
    }

    /// Solver row for a node, or None if the node is a boundary node.
    pub fn row(&self, node: NodeId) -> Option<usize> {
        self.row_of_node
            .get(node.index() as usize)
            .copied()
            .flatten()
    }

    /// Node ID for a solver row (panics if out of bounds).
    pub fn node(&self, row: usize) -> NodeId {
        self.node_of_row[row]
    }

    /// Iterate over (row, node) pairs in row order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.node_of_row.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use afn_core::units::m;

    #[test]
    fn boundary_nodes_have_no_row() {
        let mut builder = NetworkBuilder::new();
        let out = builder.add_boundary("outdoor", m(0.0));
        let z1 = builder.add_zone("z1", m(0.0));
        let z2 = builder.add_zone("z2", m(0.0));
        builder.add_link("c1", out, z1, m(0.0), m(0.0));
        builder.add_link("c2", z1, z2, m(0.0), m(0.0));
        let net = builder.build().unwrap();

        let index = UnknownIndex::from_network(&net);
        assert_eq!(index.n_unknowns(), 2);
        assert_eq!(index.row(out), None);
        assert_eq!(index.row(z1), Some(0));
        assert_eq!(index.row(z2), Some(1));
        assert_eq!(index.node(0), z1);
        assert_eq!(index.node(1), z2);
    }

    #[test]
    fn rows_iterate_in_order() {
        let mut builder = NetworkBuilder::new();
        let out = builder.add_boundary("outdoor", m(0.0));
        let z1 = builder.add_zone("z1", m(0.0));
        builder.add_link("c1", out, z1, m(0.0), m(0.0));
        let net = builder.build().unwrap();

        let index = UnknownIndex::from_network(&net);
        let rows: Vec<_> = index.rows().collect();
        assert_eq!(rows, vec![(0, z1)]);
    }
}
