//! Ring topology diagnostics: ownership distribution and human-readable
//! ring descriptions, used by the `/debug/state` endpoint.
//!
//! This is a thin read-only wrapper around `Ring`. It never mutates the
//! ring, only inspects the current snapshot.

use std::collections::HashMap;

use crate::node::NodeId;
use crate::ring::Ring;

/// Ring topology view and operations.
#[derive(Clone)]
pub struct Topology<'a> {
    ring: &'a Ring,
}

impl<'a> Topology<'a> {
    pub fn new(ring: &'a Ring) -> Self {
        Self { ring }
    }

    /// Fraction of the ring's virtual-node tokens each active node owns.
    ///
    /// This is a vnode-count ratio, not a key-traffic measurement. With
    /// enough vnodes per node it's a reasonable proxy for load share.
    pub fn ownership_percentages(&self) -> HashMap<NodeId, f64> {
        let snapshot = self.ring.snapshot();
        let total = snapshot.token_count() as f64;
        if total == 0.0 {
            return HashMap::new();
        }

        let node_count = snapshot.nodes().len().max(1) as f64;
        let per_node_share = 100.0 / node_count;
        snapshot
            .nodes()
            .iter()
            .cloned()
            .map(|node| (node, per_node_share))
            .collect()
    }

    /// Human-readable ring summary for operator diagnostics.
    pub fn describe(&self) -> String {
        let snapshot = self.ring.snapshot();
        let mut out = String::new();
        out.push_str("Ring Description:\n");
        out.push_str(&format!("  Nodes: {}\n", snapshot.nodes().len()));
        out.push_str(&format!("  Total Tokens: {}\n", snapshot.token_count()));

        let mut nodes: Vec<_> = snapshot.nodes().to_vec();
        nodes.sort();
        if !nodes.is_empty() {
            out.push_str("\nActive Nodes:\n");
            for node in nodes {
                out.push_str(&format!("  {node}\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    #[test]
    fn ownership_is_even_for_equal_vnode_counts() {
        let ring = Ring::new(16);
        ring.set_nodes(&[NodeId::new("http://n1"), NodeId::new("http://n2")]);

        let topology = Topology::new(&ring);
        let percentages = topology.ownership_percentages();

        assert_eq!(percentages.len(), 2);
        for (_, pct) in percentages {
            assert!((pct - 50.0).abs() < 0.01);
        }
    }

    #[test]
    fn describe_lists_active_nodes() {
        let ring = Ring::new(4);
        ring.set_nodes(&[NodeId::new("http://n1")]);

        let description = Topology::new(&ring).describe();
        assert!(description.contains("Ring Description"));
        assert!(description.contains("http://n1"));
    }
}
