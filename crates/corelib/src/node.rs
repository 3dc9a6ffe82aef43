//! Node identity for the consistent hash ring.
//!
//! A node in this cluster has no identity beyond the base URL other peers use
//! to reach it (e.g. `http://127.0.0.1:8001`), so `NodeId` is a thin newtype
//! over that string rather than an opaque integer. Comparing, ordering, and
//! hashing a `NodeId` is comparing, ordering, and hashing its URL.

use std::fmt;

/// Identifier for a node in the cluster: its base URL.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
