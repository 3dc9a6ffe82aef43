//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node token positions and provides lookup
//! operations for finding the node (or ordered replica list) responsible for
//! a key.

pub mod ring;

pub use ring::{Ring, RingSnapshot};
