//! Incremental network builder.

use std::collections::HashMap;

use afn_core::units::Length;
use afn_core::{LinkId, NodeId};
use uom::si::length::meter;

use crate::error::NetworkError;
use crate::network::{Link, Network, Node, NodeKind};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Use `add_zone` / `add_boundary` / `add_link` to build up the topology,
/// then call `build()` to validate and freeze it into an immutable [`Network`].
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_node_id: u32,
    next_link_id: u32,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an internal (pressure-unknown) node and return its ID.
    pub fn add_zone(&mut self, name: impl Into<String>, height: Length) -> NodeId {
        self.push_node(name, NodeKind::Internal, height)
    }

    /// Add a boundary (pressure-known) node and return its ID.
    pub fn add_boundary(&mut self, name: impl Into<String>, height: Length) -> NodeId {
        self.push_node(name, NodeKind::Boundary, height)
    }

    fn push_node(&mut self, name: impl Into<String>, kind: NodeKind, height: Length) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
            kind,
            height: height.get::<meter>(),
        });
        id
    }

    /// Add a link between two existing nodes, with explicit opening heights
    /// at each end. Returns the link ID.
    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        height_from: Length,
        height_to: Length,
    ) -> LinkId {
        let id = LinkId::from_index(self.next_link_id);
        self.next_link_id += 1;
        self.links.push(Link {
            id,
            name: name.into(),
            from,
            to,
            height_from: height_from.get::<meter>(),
            height_to: height_to.get::<meter>(),
        });
        id
    }

    /// Add a link whose opening heights coincide with its node elevations.
    pub fn add_link_at_node_heights(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
    ) -> LinkId {
        let hf = self
            .nodes
            .get(from.index() as usize)
            .map(|n| n.height)
            .unwrap_or(0.0);
        let ht = self
            .nodes
            .get(to.index() as usize)
            .map(|n| n.height)
            .unwrap_or(0.0);
        self.add_link(
            name,
            from,
            to,
            Length::new::<meter>(hf),
            Length::new::<meter>(ht),
        )
    }

    /// Build and validate the network, returning an immutable [`Network`].
    pub fn build(self) -> Result<Network, NetworkError> {
        validate::validate_structure(&self.nodes, &self.links)?;

        let (node_link_offsets, node_links) = Self::build_adjacency(&self.nodes, &self.links);

        validate::validate_connectivity(&self.nodes, &self.links, &node_link_offsets, &node_links)?;

        Ok(Network {
            nodes: self.nodes,
            links: self.links,
            node_link_offsets,
            node_links,
        })
    }

    /// Build compact adjacency lists: for each node, collect its incident links.
    fn build_adjacency(nodes: &[Node], links: &[Link]) -> (Vec<usize>, Vec<LinkId>) {
        let mut node_to_links: HashMap<NodeId, Vec<LinkId>> = HashMap::new();
        for link in links {
            node_to_links.entry(link.from).or_default().push(link.id);
            node_to_links.entry(link.to).or_default().push(link.id);
        }

        // Sort each node's link list for determinism
        for list in node_to_links.values_mut() {
            list.sort_by_key(|l| l.index());
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(list) = node_to_links.get(&node.id) {
                flat.extend_from_slice(list);
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
