//! Hash ring data structure: a token-sorted vector of virtual-node entries,
//! wrapped so readers never observe a torn rebuild.
//!
//! Lookups walk clockwise from a key's hash to the first virtual node at or
//! past it; replica selection continues walking and skips repeats of the
//! same physical node.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::token::{hash_key, vnode_token};
use crate::vnode::VirtualNode;

/// An immutable view of the ring at a point in time.
///
/// Built wholesale from an active node set; never mutated after
/// construction. `Ring::set_nodes` swaps in a fresh `RingSnapshot`, so any
/// reader holding one sees a consistent ring for the whole operation.
#[derive(Debug, Clone)]
pub struct RingSnapshot {
    /// Virtual-node entries, sorted ascending by token. Ties keep the order
    /// they were built in (a stable sort), matching the spec's tie-break
    /// rule: "the earlier one in build order wins."
    vnodes: Vec<VirtualNode>,
    /// Sorted, deduplicated active node set this snapshot was built from.
    nodes: Vec<NodeId>,
}

impl RingSnapshot {
    fn build(nodes: &[NodeId], vnodes_per_node: usize) -> Self {
        let mut nodes: Vec<NodeId> = nodes.to_vec();
        nodes.sort();
        nodes.dedup();

        let mut vnodes = Vec::with_capacity(nodes.len() * vnodes_per_node);
        for node in &nodes {
            for i in 0..vnodes_per_node {
                vnodes.push(VirtualNode::new(vnode_token(node.as_str(), i), node.clone()));
            }
        }
        vnodes.sort_by_key(|v| v.token);

        Self { vnodes, nodes }
    }

    /// Sorted, deduplicated active node set.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Total virtual-node entry count.
    pub fn token_count(&self) -> usize {
        self.vnodes.len()
    }

    /// Index of the first ring entry whose token is strictly greater than
    /// `key`'s hash, wrapping to 0 if none exists.
    fn start_index(&self, key: &str) -> usize {
        let h = hash_key(key);
        let idx = self.vnodes.partition_point(|v| v.token <= h);
        if idx == self.vnodes.len() {
            0
        } else {
            idx
        }
    }

    pub fn owner(&self, key: &str) -> Option<NodeId> {
        if self.vnodes.is_empty() {
            return None;
        }
        let idx = self.start_index(key);
        Some(self.vnodes[idx].node_id.clone())
    }

    pub fn replicas(&self, key: &str, r: usize) -> Vec<NodeId> {
        if self.vnodes.is_empty() {
            return Vec::new();
        }
        let want = r.max(1).min(self.nodes.len());
        let start = self.start_index(key);

        let mut seen = HashSet::with_capacity(want);
        let mut out = Vec::with_capacity(want);
        let len = self.vnodes.len();
        let mut i = start;
        loop {
            let node = &self.vnodes[i].node_id;
            if seen.insert(node.clone()) {
                out.push(node.clone());
                if out.len() == want {
                    break;
                }
            }
            i = (i + 1) % len;
        }
        out
    }
}

/// The consistent hash ring.
///
/// Holds the current active node set behind a `RwLock<Arc<RingSnapshot>>`:
/// `set_nodes` builds a brand new snapshot and swaps it in under a write
/// lock; every other operation clones the `Arc` under a (cheap, concurrent)
/// read lock and operates on its own immutable snapshot. This is the
/// "replace wholesale on refresh" discipline the design calls for: readers
/// never see a half-built ring.
pub struct Ring {
    vnodes_per_node: usize,
    inner: RwLock<Arc<RingSnapshot>>,
}

impl Ring {
    pub fn new(vnodes_per_node: usize) -> Self {
        let vnodes_per_node = vnodes_per_node.max(1);
        Self {
            vnodes_per_node,
            inner: RwLock::new(Arc::new(RingSnapshot::build(&[], vnodes_per_node))),
        }
    }

    /// Replace the active node set and rebuild the ring.
    pub fn set_nodes(&self, nodes: &[NodeId]) {
        let snapshot = RingSnapshot::build(nodes, self.vnodes_per_node);
        *self.inner.write() = Arc::new(snapshot);
    }

    /// Take a consistent, point-in-time view of the ring.
    pub fn snapshot(&self) -> Arc<RingSnapshot> {
        self.inner.read().clone()
    }

    /// The node owning `key`: the first ring entry clockwise from `key`'s hash.
    pub fn owner(&self, key: &str) -> Result<NodeId> {
        self.snapshot().owner(key).ok_or(Error::EmptyRing)
    }

    /// Up to `r` distinct nodes clockwise from `key`'s hash (primary first).
    pub fn replicas(&self, key: &str, r: usize) -> Result<Vec<NodeId>> {
        let snapshot = self.snapshot();
        if snapshot.nodes().is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(snapshot.replicas(key, r))
    }

    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.snapshot().nodes().to_vec()
    }
}
