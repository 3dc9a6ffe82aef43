//! Per-node configuration, parsed from CLI arguments.

use clap::Parser;
use corelib::node::NodeId;

/// Configuration surface for one `dynamo-node` process.
#[derive(Parser, Debug, Clone)]
#[command(name = "dynamo-node", about = "A Dynamo-style replicated key-value node")]
pub struct NodeConfig {
    /// This node's identifier, used in logs and `/debug/state`.
    #[arg(long)]
    pub node_id: String,

    /// This node's own base URL, as other peers will reach it.
    #[arg(long)]
    pub base_url: String,

    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// Comma-separated list of peer base URLs.
    #[arg(long, value_delimiter = ',', default_value = "")]
    pub peers: Vec<String>,

    /// Replication factor: how many replicas each key is written to.
    #[arg(long, default_value_t = 2)]
    pub replication: usize,

    /// Write quorum: acks required before a write is considered successful.
    #[arg(long, default_value_t = 1)]
    pub w: usize,

    /// Read quorum: responses required before a read is considered successful.
    #[arg(long, default_value_t = 1)]
    pub q: usize,

    /// Per-RPC timeout, in seconds.
    #[arg(long, default_value_t = 1.5)]
    pub request_timeout_s: f64,

    /// Interval between heartbeat rounds, in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub heartbeat_interval_s: f64,

    /// How long a peer may go unheard-from before it's marked dead, in seconds.
    #[arg(long, default_value_t = 3.5)]
    pub peer_dead_after_s: f64,

    /// Virtual nodes per physical node on the hash ring.
    #[arg(long, default_value_t = 50)]
    pub virtual_nodes: usize,

    /// Bump the tracing level from info to debug.
    #[arg(short, long)]
    pub verbose: bool,
}

impl NodeConfig {
    pub fn self_id(&self) -> NodeId {
        NodeId::new(self.base_url.clone())
    }

    pub fn peer_ids(&self) -> Vec<NodeId> {
        self.peers
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| NodeId::new(p.clone()))
            .collect()
    }
}
