//! HTTP adapter: translates the public and internal wire protocol onto
//! `NodeFacade` calls.
//!
//! Grounded on `PrivStackApp-PrivStack-IO/relay`'s `build_router`/`State`/
//! `Json` idiom, the only example in the pack with a working axum server,
//! and on `original_source/dynamo/node_api.py`'s route table for the exact
//! path/method/body shapes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use corelib::node::NodeId;
use corelib::wire::{
    HeartbeatRequest, ReplicaAck, ReplicaDeleteRequest, ReplicaGetResponse, ReplicaPutRequest,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, QuorumFailureDetail};
use crate::facade::NodeFacade;

pub fn build_router(facade: Arc<NodeFacade>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/debug/state", get(debug_state))
        .route("/kv/put", post(kv_put))
        .route("/kv/get", get(kv_get))
        .route("/kv/delete", post(kv_delete))
        .route("/internal/replica/put", post(replica_put))
        .route("/internal/replica/delete", post(replica_delete))
        .route("/internal/replica/get", get(replica_get))
        .route("/internal/heartbeat", post(heartbeat))
        .with_state(facade)
}

#[derive(Deserialize)]
struct PutReq {
    key: String,
    value: String,
}

#[derive(Deserialize)]
struct DelReq {
    key: String,
}

#[derive(Deserialize)]
struct KeyQuery {
    key: String,
}

async fn health(State(facade): State<Arc<NodeFacade>>) -> impl IntoResponse {
    Json(json!({"ok": true, "node_id": facade.self_url().as_str()}))
}

async fn debug_state(State(facade): State<Arc<NodeFacade>>) -> impl IntoResponse {
    Json(json!({
        "node_id": facade.self_url().as_str(),
        "base_url": facade.self_url().as_str(),
        "ring_nodes": facade.ring().active_nodes(),
        "peers": facade.membership().peer_snapshot(),
        "replication": facade.replication(),
        "w": facade.w(),
        "q": facade.q(),
    }))
}

async fn kv_put(
    State(facade): State<Arc<NodeFacade>>,
    Json(req): Json<PutReq>,
) -> Response {
    if req.key.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "empty key"}))).into_response();
    }
    match facade.put(&req.key, req.value).await {
        Ok(outcome) => Json(json!({
            "ok": true,
            "key": req.key,
            "ts": outcome.ts,
            "replicas": outcome.replicas,
            "quorum": quorum_write_json(&outcome.quorum),
        }))
        .into_response(),
        Err(err) => error_response("write_quorum_not_met", err),
    }
}

async fn kv_delete(
    State(facade): State<Arc<NodeFacade>>,
    Json(req): Json<DelReq>,
) -> Response {
    if req.key.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "empty key"}))).into_response();
    }
    match facade.delete(&req.key).await {
        Ok(outcome) => Json(json!({
            "ok": true,
            "key": req.key,
            "ts": outcome.ts,
            "replicas": outcome.replicas,
            "quorum": quorum_write_json(&outcome.quorum),
        }))
        .into_response(),
        Err(err) => error_response("delete_quorum_not_met", err),
    }
}

async fn kv_get(
    State(facade): State<Arc<NodeFacade>>,
    Query(q): Query<KeyQuery>,
) -> Response {
    match facade.get(&q.key).await {
        Ok(outcome) => {
            let record = outcome.outcome.record.clone();
            Json(json!({
                "ok": true,
                "key": q.key,
                "replicas": outcome.replicas,
                "found": outcome.outcome.found,
                "record": record.map(|r| json!({"value": r.value, "ts": r.ts, "tombstone": r.tombstone})),
                "responses": responses_json(&outcome.outcome.responses),
            }))
            .into_response()
        }
        Err(err) => error_response("read_quorum_not_met", err),
    }
}

async fn replica_put(
    State(facade): State<Arc<NodeFacade>>,
    Json(req): Json<ReplicaPutRequest>,
) -> Json<ReplicaAck> {
    facade.replica_put(&req.key, req.value, req.ts);
    Json(ReplicaAck::default())
}

async fn replica_delete(
    State(facade): State<Arc<NodeFacade>>,
    Json(req): Json<ReplicaDeleteRequest>,
) -> Json<ReplicaAck> {
    facade.replica_delete(&req.key, req.ts);
    Json(ReplicaAck::default())
}

async fn replica_get(
    State(facade): State<Arc<NodeFacade>>,
    Query(q): Query<KeyQuery>,
) -> Json<ReplicaGetResponse> {
    Json(ReplicaGetResponse::from(facade.replica_get(&q.key)))
}

async fn heartbeat(
    State(facade): State<Arc<NodeFacade>>,
    Json(req): Json<HeartbeatRequest>,
) -> Json<ReplicaAck> {
    facade.mark_seen(&req.from);
    Json(ReplicaAck::default())
}

fn quorum_write_json(outcome: &replication::QuorumWriteOutcome) -> serde_json::Value {
    json!({
        "acks": outcome.acks,
        "needed": outcome.needed,
        "results": outcome.results,
    })
}

fn responses_json(responses: &HashMap<NodeId, Option<corelib::store::Record>>) -> serde_json::Value {
    let as_json: HashMap<&NodeId, serde_json::Value> = responses
        .iter()
        .map(|(node, record)| {
            let value = match record {
                Some(r) => json!({"value": r.value, "ts": r.ts, "tombstone": r.tombstone}),
                None => serde_json::Value::Null,
            };
            (node, value)
        })
        .collect();
    json!(as_json)
}

fn error_response(kind: &'static str, err: Error) -> Response {
    match err {
        Error::Ring(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": {"error": "empty_ring"}})),
        )
            .into_response(),
        Error::QuorumNotMet {
            acks,
            needed,
            replicas,
            detail,
            ..
        } => {
            let mut body = json!({
                "error": kind,
                "acks": acks,
                "needed": needed,
                "replicas": replicas,
            });
            let object = body.as_object_mut().expect("object literal");
            match detail {
                QuorumFailureDetail::Write { results } => {
                    object.insert("results".to_string(), json!(results));
                }
                QuorumFailureDetail::Read { responses } => {
                    object.insert("responses".to_string(), responses_json(&responses));
                }
            }
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "detail": body }))).into_response()
        }
    }
}
