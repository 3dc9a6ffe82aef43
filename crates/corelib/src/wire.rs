//! Shared wire types for the HTTP boundary between peers.
//!
//! Every JSON shape that crosses a node-to-node RPC lives here so
//! `membership`, `replication`, and `node` agree on the wire format without
//! duplicating struct definitions. Client-facing request/response bodies
//! (`/kv/*`) stay in the `node` crate's HTTP adapter; these are the
//! bit-stable internal/peer contracts.

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Body of `POST /internal/replica/put`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaPutRequest {
    pub key: String,
    pub value: String,
    pub ts: f64,
}

/// Body of `POST /internal/replica/delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaDeleteRequest {
    pub key: String,
    pub ts: f64,
}

/// Response body shared by `/internal/replica/put` and
/// `/internal/replica/delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaAck {
    pub ok: bool,
}

impl Default for ReplicaAck {
    fn default() -> Self {
        Self { ok: true }
    }
}

/// Response body of `GET /internal/replica/get`.
///
/// An absent key is reported as `value: None, ts: 0.0, tombstone: true`,
/// the "absent-as-tombstone" wire quirk that lets the coordinator reconcile
/// "never written here" uniformly against real tombstones via LWW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaGetResponse {
    pub ok: bool,
    pub value: Option<String>,
    pub ts: f64,
    pub tombstone: bool,
}

impl From<Option<Record>> for ReplicaGetResponse {
    fn from(record: Option<Record>) -> Self {
        let record = record.unwrap_or_else(Record::absent);
        Self {
            ok: true,
            value: record.value,
            ts: record.ts,
            tombstone: record.tombstone,
        }
    }
}

impl ReplicaGetResponse {
    pub fn into_record(self) -> Record {
        Record {
            value: self.value,
            ts: self.ts,
            tombstone: self.tombstone,
        }
    }
}

/// Body of `POST /internal/heartbeat`.
///
/// The reference implementation accepted a loosely-typed payload with three
/// possible field names for the sender's URL (`from`, `from_url`,
/// `from_url_alt`). Rather than port that permissive parsing verbatim, this
/// models it as one canonical field with the legacy names as serde aliases:
/// any of the three on the wire deserializes into `from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    #[serde(alias = "from_url", alias = "from_url_alt")]
    pub from: String,
    #[serde(default)]
    pub node_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_accepts_canonical_field() {
        let req: HeartbeatRequest = serde_json::from_str(
            r#"{"from": "http://n1", "node_id": "n1"}"#,
        )
        .unwrap();
        assert_eq!(req.from, "http://n1");
    }

    #[test]
    fn heartbeat_accepts_legacy_aliases() {
        let req: HeartbeatRequest =
            serde_json::from_str(r#"{"from_url": "http://n2"}"#).unwrap();
        assert_eq!(req.from, "http://n2");

        let req: HeartbeatRequest =
            serde_json::from_str(r#"{"from_url_alt": "http://n3"}"#).unwrap();
        assert_eq!(req.from, "http://n3");
    }

    #[test]
    fn absent_record_round_trips_as_tombstone_zero() {
        let resp = ReplicaGetResponse::from(None);
        assert_eq!(resp.ts, 0.0);
        assert!(resp.tombstone);
        assert_eq!(resp.value, None);
    }
}
