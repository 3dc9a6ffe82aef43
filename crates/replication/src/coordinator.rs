//! Quorum fan-out to replica nodes: writes wait for W acks, reads wait for
//! Q responses and reconcile them with last-write-wins.
//!
//! Grounded on the reference `QuorumClient`'s `asyncio.as_completed` +
//! early-break pattern: fan a request out to every replica, stop counting
//! the moment the threshold is met, and don't wait on the stragglers.
//! `tokio::task::JoinSet` is the direct equivalent here: `join_next` yields
//! whichever task finishes first, and `abort_all` cancels whatever's left
//! once the quorum is satisfied.

use std::collections::HashMap;
use std::time::Duration;

use corelib::node::NodeId;
use corelib::store::{Record, Store};
use corelib::wire::{ReplicaDeleteRequest, ReplicaGetResponse, ReplicaPutRequest};
use tokio::task::JoinSet;
use tracing::debug;

/// Outcome of a `replicate_put`/`replicate_delete` fan-out.
#[derive(Debug, Clone)]
pub struct QuorumWriteOutcome {
    pub acks: usize,
    pub needed: usize,
    pub results: HashMap<NodeId, bool>,
}

impl QuorumWriteOutcome {
    pub fn met(&self) -> bool {
        self.acks >= self.needed
    }
}

/// Outcome of a `quorum_get` fan-out.
#[derive(Debug, Clone)]
pub struct QuorumReadOutcome {
    pub ok: bool,
    pub acks: usize,
    pub needed: usize,
    pub found: bool,
    pub record: Option<Record>,
    pub responses: HashMap<NodeId, Option<Record>>,
}

/// Fans write/read RPCs out to a key's replica set and aggregates acks.
pub struct QuorumCoordinator {
    client: reqwest::Client,
}

impl QuorumCoordinator {
    pub fn new(timeout_s: f64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(timeout_s.max(0.0)))
            .build()
            .expect("reqwest client builds with a finite timeout");
        Self { client }
    }

    pub async fn replicate_put(
        &self,
        replicas: &[NodeId],
        key: &str,
        value: &str,
        ts: f64,
        w: usize,
    ) -> QuorumWriteOutcome {
        let mut tasks = JoinSet::new();
        for replica in replicas.iter().cloned() {
            let client = self.client.clone();
            let body = ReplicaPutRequest {
                key: key.to_string(),
                value: value.to_string(),
                ts,
            };
            tasks.spawn(async move {
                let url = format!("{replica}/internal/replica/put");
                let ok = post_ok(&client, &url, &body).await;
                (replica, ok)
            });
        }
        collect_write_outcome(tasks, w).await
    }

    pub async fn replicate_delete(
        &self,
        replicas: &[NodeId],
        key: &str,
        ts: f64,
        w: usize,
    ) -> QuorumWriteOutcome {
        let mut tasks = JoinSet::new();
        for replica in replicas.iter().cloned() {
            let client = self.client.clone();
            let body = ReplicaDeleteRequest {
                key: key.to_string(),
                ts,
            };
            tasks.spawn(async move {
                let url = format!("{replica}/internal/replica/delete");
                let ok = post_ok(&client, &url, &body).await;
                (replica, ok)
            });
        }
        collect_write_outcome(tasks, w).await
    }

    pub async fn quorum_get(&self, replicas: &[NodeId], key: &str, q: usize) -> QuorumReadOutcome {
        let mut tasks = JoinSet::new();
        for replica in replicas.iter().cloned() {
            let client = self.client.clone();
            let key = key.to_string();
            tasks.spawn(async move {
                let url = format!("{replica}/internal/replica/get");
                let record = get_record(&client, &url, &key).await;
                (replica, record)
            });
        }

        let want = q.max(1);
        let mut oks = 0usize;
        let mut best: Option<Record> = None;
        let mut responses = HashMap::new();

        while let Some(joined) = tasks.join_next().await {
            let Ok((replica, record)) = joined else {
                continue;
            };
            responses.insert(replica, record.clone());
            if let Some(record) = record {
                oks += 1;
                best = Store::newer(best, Some(record));
            }
            if oks >= want {
                break;
            }
        }
        tasks.abort_all();

        match best {
            None => QuorumReadOutcome {
                ok: false,
                acks: oks,
                needed: want,
                found: false,
                record: None,
                responses,
            },
            Some(record) => {
                let found = !record.tombstone;
                QuorumReadOutcome {
                    ok: true,
                    acks: oks,
                    needed: want,
                    found,
                    record: Some(record),
                    responses,
                }
            }
        }
    }
}

async fn post_ok(client: &reqwest::Client, url: &str, body: &impl serde::Serialize) -> bool {
    match client.post(url).json(body).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(err) => {
            debug!(%url, %err, "replica rpc failed");
            false
        }
    }
}

async fn get_record(client: &reqwest::Client, url: &str, key: &str) -> Option<Record> {
    let resp = client.get(url).query(&[("key", key)]).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<ReplicaGetResponse>()
        .await
        .ok()
        .map(ReplicaGetResponse::into_record)
}

async fn collect_write_outcome(mut tasks: JoinSet<(NodeId, bool)>, w: usize) -> QuorumWriteOutcome {
    let needed = w.max(1);
    let mut acks = 0usize;
    let mut results = HashMap::new();

    while let Some(joined) = tasks.join_next().await {
        let Ok((replica, ok)) = joined else {
            continue;
        };
        results.insert(replica, ok);
        if ok {
            acks += 1;
        }
        if acks >= needed {
            break;
        }
    }
    tasks.abort_all();

    QuorumWriteOutcome {
        acks,
        needed,
        results,
    }
}
