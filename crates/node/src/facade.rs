//! Glues the ring, the local store, membership, and the quorum coordinator
//! into the operations the HTTP adapter calls.
//!
//! Grounded on the reference `create_app`'s `kv_put`/`kv_get`/`kv_delete`
//! handler bodies: refresh the ring from membership, compute the
//! preference list, write locally first if this node is a replica, then
//! fan out and wait for quorum.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use corelib::node::NodeId;
use corelib::ring::Ring;
use corelib::store::{Record, Store};
use membership::Membership;
use replication::{QuorumCoordinator, QuorumReadOutcome, QuorumWriteOutcome};

use crate::config::NodeConfig;
use crate::error::{Error, QuorumFailureDetail, Result};

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}

pub struct PutOutcome {
    pub ts: f64,
    pub replicas: Vec<NodeId>,
    pub quorum: QuorumWriteOutcome,
}

pub struct DeleteOutcome {
    pub ts: f64,
    pub replicas: Vec<NodeId>,
    pub quorum: QuorumWriteOutcome,
}

pub struct GetOutcome {
    pub replicas: Vec<NodeId>,
    pub outcome: QuorumReadOutcome,
}

/// Owns everything one node needs to serve client and peer requests.
#[derive(Clone)]
pub struct NodeFacade {
    self_url: NodeId,
    replication: usize,
    w: usize,
    q: usize,
    store: Arc<Store>,
    ring: Arc<Ring>,
    membership: Arc<Membership>,
    coordinator: Arc<QuorumCoordinator>,
}

impl NodeFacade {
    pub fn new(config: &NodeConfig, membership: Arc<Membership>) -> Self {
        let ring = Arc::new(Ring::new(config.virtual_nodes));
        ring.set_nodes(&membership.all_nodes());
        Self {
            self_url: config.self_id(),
            replication: config.replication,
            w: config.w,
            q: config.q,
            store: Arc::new(Store::new()),
            ring,
            membership,
            coordinator: Arc::new(QuorumCoordinator::new(config.request_timeout_s)),
        }
    }

    pub fn self_url(&self) -> &NodeId {
        &self.self_url
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn ring(&self) -> &Arc<Ring> {
        &self.ring
    }

    pub fn membership(&self) -> &Arc<Membership> {
        &self.membership
    }

    pub fn replication(&self) -> usize {
        self.replication
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// Rebuild the ring from the current membership view. Called once per
    /// client op, and periodically by a background refresh task.
    pub fn refresh_ring(&self) {
        self.ring.set_nodes(&self.membership.all_nodes());
    }

    pub async fn put(&self, key: &str, value: String) -> Result<PutOutcome> {
        self.refresh_ring();
        let replicas = self.ring.replicas(key, self.replication)?;
        let ts = now_secs();

        if replicas.contains(&self.self_url) {
            self.store.put(key, value.clone(), ts);
        }

        let quorum = self
            .coordinator
            .replicate_put(&replicas, key, &value, ts, self.w)
            .await;

        if !quorum.met() {
            return Err(Error::QuorumNotMet {
                op: "write",
                acks: quorum.acks,
                needed: quorum.needed,
                replicas,
                detail: QuorumFailureDetail::Write {
                    results: quorum.results,
                },
            });
        }

        Ok(PutOutcome {
            ts,
            replicas,
            quorum,
        })
    }

    pub async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
        self.refresh_ring();
        let replicas = self.ring.replicas(key, self.replication)?;
        let ts = now_secs();

        if replicas.contains(&self.self_url) {
            self.store.delete(key, ts);
        }

        let quorum = self
            .coordinator
            .replicate_delete(&replicas, key, ts, self.w)
            .await;

        if !quorum.met() {
            return Err(Error::QuorumNotMet {
                op: "delete",
                acks: quorum.acks,
                needed: quorum.needed,
                replicas,
                detail: QuorumFailureDetail::Write {
                    results: quorum.results,
                },
            });
        }

        Ok(DeleteOutcome {
            ts,
            replicas,
            quorum,
        })
    }

    pub async fn get(&self, key: &str) -> Result<GetOutcome> {
        self.refresh_ring();
        let replicas = self.ring.replicas(key, self.replication)?;
        let outcome = self.coordinator.quorum_get(&replicas, key, self.q).await;

        if !outcome.ok {
            return Err(Error::QuorumNotMet {
                op: "read",
                acks: outcome.acks,
                needed: outcome.needed,
                replicas,
                detail: QuorumFailureDetail::Read {
                    responses: outcome.responses,
                },
            });
        }

        Ok(GetOutcome { replicas, outcome })
    }

    /// Handle `/internal/replica/put`: apply the write locally, unconditionally.
    pub fn replica_put(&self, key: &str, value: String, ts: f64) {
        self.store.put(key, value, ts);
    }

    /// Handle `/internal/replica/delete`: apply the tombstone locally, unconditionally.
    pub fn replica_delete(&self, key: &str, ts: f64) {
        self.store.delete(key, ts);
    }

    /// Handle `/internal/replica/get`.
    pub fn replica_get(&self, key: &str) -> Option<Record> {
        self.store.get(key)
    }

    /// Handle `/internal/heartbeat`.
    pub fn mark_seen(&self, peer_url: &str) {
        self.membership.mark_seen(peer_url);
    }
}
