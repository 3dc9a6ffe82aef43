//! Core library for the replicated key-value store.
//!
//! - `store`: the per-node record map (LWW-timestamped values/tombstones)
//! - `token`/`vnode`/`ring`: consistent hashing with virtual nodes
//! - `node`: node identity (base URL)
//! - `topology`: ring diagnostics for the `/debug/state` endpoint
//! - `wire`: JSON types shared across the peer-to-peer HTTP boundary
//! - `error`: the crate's `Result`/`Error` types

pub mod error;
pub mod node;
pub mod ring;
pub mod store;
pub mod token;
pub mod topology;
pub mod vnode;
pub mod wire;

pub use error::{Error, Result};
pub use node::NodeId;
pub use ring::{Ring, RingSnapshot};
pub use store::{Record, Store};
pub use token::{hash_key, vnode_token, Token};
pub use topology::Topology;
pub use vnode::VirtualNode;
