//! Facade-level error taxonomy: what a client-facing operation can fail with.

use std::collections::HashMap;

use corelib::node::NodeId;
use corelib::store::Record;

pub type Result<T> = std::result::Result<T, Error>;

/// Per-replica diagnostic payload for a failed quorum, shaped differently
/// for writes (did this replica ack) and reads (what did this replica have).
#[derive(Debug, Clone)]
pub enum QuorumFailureDetail {
    Write { results: HashMap<NodeId, bool> },
    Read { responses: HashMap<NodeId, Option<Record>> },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A client operation arrived before any node had joined the ring.
    /// Not expected after startup; surfaced as an internal error.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// The replica fan-out finished without reaching the required
    /// threshold. Carries the full per-replica outcome for diagnosis.
    #[error("{op} quorum not met: {acks}/{needed} replicas acked")]
    QuorumNotMet {
        op: &'static str,
        acks: usize,
        needed: usize,
        replicas: Vec<NodeId>,
        detail: QuorumFailureDetail,
    },
}
