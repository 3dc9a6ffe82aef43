//! Network-level test: a real heartbeat loop against a real axum server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use corelib::node::NodeId;
use corelib::wire::{HeartbeatRequest, ReplicaAck};
use membership::{Membership, MembershipHandle};
use tokio::net::TcpListener;

async fn heartbeat_handler(Json(_req): Json<HeartbeatRequest>) -> Json<ReplicaAck> {
    Json(ReplicaAck::default())
}

async fn spawn_peer() -> String {
    let app = Router::new().route("/internal/heartbeat", post(heartbeat_handler));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn heartbeat_loop_keeps_a_responsive_peer_alive() {
    let peer_url = spawn_peer().await;
    let self_url = NodeId::new("http://self");

    let membership = Arc::new(Membership::new(
        self_url,
        &[NodeId::new(peer_url.clone())],
        1.0,
        0.2,
    ));
    let mut handle = MembershipHandle::new(membership.clone());
    handle.start(0.05, "self-node".to_string()).unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert!(membership.all_nodes().contains(&NodeId::new(peer_url)));
    handle.stop();
}

#[tokio::test]
async fn heartbeat_loop_ages_out_an_unreachable_peer() {
    let self_url = NodeId::new("http://self");
    let dead_peer = NodeId::new("http://127.0.0.1:1");

    let membership = Arc::new(Membership::new(self_url, &[dead_peer.clone()], 0.05, 0.1));
    let mut handle = MembershipHandle::new(membership.clone());
    handle.start(0.05, "self-node".to_string()).unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(!membership.all_nodes().contains(&dead_peer));
    handle.stop();
}

#[tokio::test]
async fn starting_twice_is_rejected() {
    let membership = Arc::new(Membership::new(NodeId::new("http://self"), &[], 1.0, 5.0));
    let mut handle = MembershipHandle::new(membership);
    handle.start(1.0, "n".to_string()).unwrap();
    assert!(handle.start(1.0, "n".to_string()).is_err());
    handle.stop();
}
