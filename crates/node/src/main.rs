//! Process bootstrap: parse config, init tracing, build the facade, start
//! the heartbeat and ring-refresh background handles, serve axum.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use membership::{Membership, MembershipHandle};
use node::{http::build_router, NodeConfig, NodeFacade, RingRefreshHandle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NodeConfig::parse();

    let log_level = if config.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!(
        node_id = %config.node_id,
        base_url = %config.base_url,
        peers = ?config.peers,
        "starting node"
    );

    let membership = Arc::new(Membership::new(
        config.self_id(),
        &config.peer_ids(),
        config.request_timeout_s,
        config.peer_dead_after_s,
    ));
    let facade = Arc::new(NodeFacade::new(&config, membership.clone()));

    let mut heartbeat = MembershipHandle::new(membership.clone());
    heartbeat
        .start(config.heartbeat_interval_s, config.node_id.clone())
        .context("failed to start heartbeat loop")?;

    let mut ring_refresh = RingRefreshHandle::new();
    ring_refresh.start(facade.clone(), Duration::from_millis(500));

    let app = build_router(facade);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(addr = %config.listen_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    heartbeat.stop();
    ring_refresh.stop();
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
}
