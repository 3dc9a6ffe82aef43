//! Cluster membership view: who's alive, as seen from this node.
//!
//! Liveness here is gossip-free and asymmetric: each node only heartbeats
//! the peers it was configured with, and only trusts what it's heard
//! directly. There's no failure detector consensus; a peer this node hasn't
//! heard from in `dead_after_s` is "dead" from this node's point of view
//! even if every other node still considers it alive.

use std::collections::HashMap;

use dashmap::DashMap;

use corelib::node::NodeId;

use crate::peer::{now_secs, PeerState};

/// This node's view of cluster membership.
pub struct Membership {
    self_url: NodeId,
    timeout_s: f64,
    dead_after_s: f64,
    peers: DashMap<String, PeerState>,
}

impl Membership {
    /// Seed membership with the configured peer list (self excluded,
    /// duplicates collapsed), all considered alive as of now.
    pub fn new(self_url: NodeId, peers: &[NodeId], timeout_s: f64, dead_after_s: f64) -> Self {
        let table = DashMap::new();
        for peer in peers {
            if peer == &self_url {
                continue;
            }
            table.insert(peer.as_str().to_string(), PeerState::seen_now(peer.as_str()));
        }
        Self {
            self_url,
            timeout_s,
            dead_after_s,
            peers: table,
        }
    }

    pub fn self_url(&self) -> &NodeId {
        &self.self_url
    }

    pub fn request_timeout_s(&self) -> f64 {
        self.timeout_s
    }

    /// Self plus every peer currently considered alive, sorted and deduped.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .peers
            .iter()
            .filter(|entry| entry.alive)
            .map(|entry| NodeId::new(entry.base_url.clone()))
            .collect();
        nodes.push(self.self_url.clone());
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Snapshot of every known peer's liveness state, for `/debug/state`.
    pub fn peer_snapshot(&self) -> HashMap<String, PeerState> {
        self.peers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Record a successful contact with `peer_url`: marks it alive and
    /// resets its clock. A no-op if `peer_url` is this node's own URL, or
    /// a never-configured peer silently joins the table on first contact
    /// (the reference implementation does the same on an inbound heartbeat).
    pub fn mark_seen(&self, peer_url: &str) {
        if peer_url == self.self_url.as_str() {
            return;
        }
        self.peers
            .entry(peer_url.to_string())
            .and_modify(|st| {
                st.last_seen = now_secs();
                st.alive = true;
            })
            .or_insert_with(|| PeerState::seen_now(peer_url));
    }

    /// Mark every peer not heard from in over `dead_after_s` as dead.
    pub fn tick_dead(&self) {
        let now = now_secs();
        for mut entry in self.peers.iter_mut() {
            if now - entry.last_seen > self.dead_after_s {
                entry.alive = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(url: &str) -> NodeId {
        NodeId::new(url)
    }

    #[test]
    fn all_nodes_includes_self_and_excludes_duplicates() {
        let m = Membership::new(n("http://self"), &[n("http://self"), n("http://peer")], 1.0, 5.0);
        let nodes = m.all_nodes();
        assert_eq!(nodes, vec![n("http://peer"), n("http://self")]);
    }

    #[test]
    fn mark_seen_revives_a_dead_peer() {
        let m = Membership::new(n("http://self"), &[n("http://peer")], 1.0, 0.0);
        m.tick_dead();
        assert_eq!(m.all_nodes(), vec![n("http://self")]);

        m.mark_seen("http://peer");
        assert!(m.all_nodes().contains(&n("http://peer")));
    }

    #[test]
    fn mark_seen_on_self_is_a_no_op() {
        let m = Membership::new(n("http://self"), &[], 1.0, 5.0);
        m.mark_seen("http://self");
        assert!(m.peer_snapshot().is_empty());
    }

    #[test]
    fn unconfigured_peer_joins_on_first_contact() {
        let m = Membership::new(n("http://self"), &[], 1.0, 5.0);
        m.mark_seen("http://newcomer");
        assert!(m.all_nodes().contains(&n("http://newcomer")));
    }

    #[test]
    fn tick_dead_leaves_recently_seen_peers_alive() {
        let m = Membership::new(n("http://self"), &[n("http://peer")], 1.0, 60.0);
        m.tick_dead();
        assert!(m.all_nodes().contains(&n("http://peer")));
    }
}
