//! Per-peer liveness state.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub(crate) fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}

/// Liveness record for one peer, keyed by its base URL elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerState {
    pub base_url: String,
    pub last_seen: f64,
    pub alive: bool,
}

impl PeerState {
    pub fn seen_now(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            last_seen: now_secs(),
            alive: true,
        }
    }
}
