//! Structural and connectivity validation, run once at build time.
//!
//! The solver core assumes a well-formed network: every link endpoint exists,
//! at least one boundary node anchors the pressure reference, and every node
//! can be reached from a boundary node. Anything else is rejected here so the
//! numeric code never has to defend against it.

use afn_core::{LinkId, NodeId};

use crate::error::NetworkError;
use crate::network::{Link, Node};

/// Validate per-object structure: endpoint existence, no self-loops.
pub(crate) fn validate_structure(nodes: &[Node], links: &[Link]) -> Result<(), NetworkError> {
    let node_count = nodes.len();

    for link in links {
        for end in [link.from, link.to] {
            if end.index() as usize >= node_count {
                return Err(NetworkError::InvalidNodeRef {
                    link: link.id,
                    node: end,
                });
            }
        }
        if link.from == link.to {
            return Err(NetworkError::SelfLoop {
                link: link.id,
                node: link.from,
            });
        }
    }

    if !nodes.iter().any(|n| n.is_boundary()) {
        return Err(NetworkError::NoBoundaryNode);
    }

    Ok(())
}

/// Validate connectivity: no isolated nodes, every node reachable from a
/// boundary node through the link adjacency.
pub(crate) fn validate_connectivity(
    nodes: &[Node],
    links: &[Link],
    node_link_offsets: &[usize],
    node_links: &[LinkId],
) -> Result<(), NetworkError> {
    for node in nodes {
        let idx = node.id.index() as usize;
        if node_link_offsets[idx] == node_link_offsets[idx + 1] {
            return Err(NetworkError::IsolatedNode {
                node: node.id,
                name: node.name.clone(),
            });
        }
    }

    // Breadth-first sweep from all boundary nodes at once
    let mut reached = vec![false; nodes.len()];
    let mut queue: Vec<NodeId> = nodes
        .iter()
        .filter(|n| n.is_boundary())
        .map(|n| n.id)
        .collect();
    for id in &queue {
        reached[id.index() as usize] = true;
    }

    while let Some(current) = queue.pop() {
        let idx = current.index() as usize;
        for &link_id in &node_links[node_link_offsets[idx]..node_link_offsets[idx + 1]] {
            let link = &links[link_id.index() as usize];
            let other = if link.from == current {
                link.to
            } else {
                link.from
            };
            let other_idx = other.index() as usize;
            if !reached[other_idx] {
                reached[other_idx] = true;
                queue.push(other);
            }
        }
    }

    for node in nodes {
        if !reached[node.id.index() as usize] {
            return Err(NetworkError::UnreachableNode {
                node: node.id,
                name: node.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use afn_core::units::m;

    #[test]
    fn rejects_missing_boundary() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_zone("a", m(0.0));
        let b = builder.add_zone("b", m(0.0));
        builder.add_link("crack", a, b, m(0.0), m(0.0));

        assert!(matches!(
            builder.build(),
            Err(NetworkError::NoBoundaryNode)
        ));
    }

    #[test]
    fn rejects_isolated_node() {
        let mut builder = NetworkBuilder::new();
        let out = builder.add_boundary("outdoor", m(0.0));
        let a = builder.add_zone("a", m(0.0));
        builder.add_link("crack", out, a, m(0.0), m(0.0));
        builder.add_zone("stranded", m(0.0));

        assert!(matches!(
            builder.build(),
            Err(NetworkError::IsolatedNode { .. })
        ));
    }

    #[test]
    fn rejects_unreachable_island() {
        let mut builder = NetworkBuilder::new();
        let out = builder.add_boundary("outdoor", m(0.0));
        let a = builder.add_zone("a", m(0.0));
        builder.add_link("crack", out, a, m(0.0), m(0.0));
        // Two zones linked to each other but not to the boundary side
        let b = builder.add_zone("b", m(0.0));
        let c = builder.add_zone("c", m(0.0));
        builder.add_link("island crack", b, c, m(0.0), m(0.0));

        assert!(matches!(
            builder.build(),
            Err(NetworkError::UnreachableNode { .. })
        ));
    }

    #[test]
    fn rejects_self_loop() {
        let mut builder = NetworkBuilder::new();
        let out = builder.add_boundary("outdoor", m(0.0));
        builder.add_link("loop", out, out, m(0.0), m(0.0));

        assert!(matches!(builder.build(), Err(NetworkError::SelfLoop { .. })));
    }
}
