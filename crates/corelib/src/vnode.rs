//! Virtual node abstractions.
//!
//! Instead of placing each physical node at a single ring position, every
//! node gets `vnodes` positions scattered around the ring. This smooths load
//! distribution and means only a small, roughly even fraction of keys move
//! when a node joins or leaves (see `ring`'s rebalance tests).

use crate::node::NodeId;
use crate::token::Token;

/// A single virtual-node entry on the ring: a token position owned by a
/// physical node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Token,
    /// The physical node that owns this virtual node.
    pub node_id: NodeId,
}

impl VirtualNode {
    #[inline]
    pub fn new(token: Token, node_id: NodeId) -> Self {
        Self { token, node_id }
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, node={})", self.token, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vnode_creation() {
        let vnode = VirtualNode::new(Token(100), NodeId::new("http://n1"));
        assert_eq!(vnode.token, Token(100));
        assert_eq!(vnode.node_id, NodeId::new("http://n1"));
    }
}
