//! Lifecycle-managed heartbeat loop.
//!
//! The reference implementation fires its heartbeat loop with a bare
//! `asyncio.create_task` and never looks at the handle again. Here the loop
//! is owned: `start` returns a handle that `stop` can cancel, so a node
//! shutting down (or a test tearing down a fixture) doesn't leave a task
//! spinning against a dead runtime.

use std::sync::Arc;
use std::time::Duration;

use corelib::wire::HeartbeatRequest;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};
use crate::membership::Membership;

/// Owns the background task that heartbeats peers and ages out the dead.
pub struct MembershipHandle {
    membership: Arc<Membership>,
    task: Option<JoinHandle<()>>,
}

impl MembershipHandle {
    pub fn new(membership: Arc<Membership>) -> Self {
        Self {
            membership,
            task: None,
        }
    }

    pub fn membership(&self) -> &Arc<Membership> {
        &self.membership
    }

    /// Spawn the heartbeat loop: every `interval_s`, POST to every known
    /// peer and mark it seen on a 200, then age out anyone overdue.
    pub fn start(&mut self, interval_s: f64, self_id: String) -> Result<()> {
        if self.task.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let membership = self.membership.clone();
        let timeout = Duration::from_secs_f64(membership.request_timeout_s().max(0.0));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builds with a finite timeout");
        let interval = Duration::from_secs_f64(interval_s.max(0.0));

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                heartbeat_round(&membership, &client, &self_id).await;
                membership.tick_dead();
            }
        }));
        Ok(())
    }

    /// Cancel the heartbeat loop. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MembershipHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn heartbeat_round(membership: &Membership, client: &reqwest::Client, self_id: &str) {
    let targets: Vec<String> = membership
        .peer_snapshot()
        .into_keys()
        .collect();

    for peer_url in targets {
        let body = HeartbeatRequest {
            from: membership.self_url().as_str().to_string(),
            node_id: Some(self_id.to_string()),
        };
        let url = format!("{peer_url}/internal/heartbeat");
        match client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                membership.mark_seen(&peer_url);
            }
            Ok(resp) => debug!(%peer_url, status = %resp.status(), "heartbeat rejected"),
            Err(err) => debug!(%peer_url, %err, "heartbeat failed"),
        }
    }
}
