//! Quorum-based replica coordination: fan a write or read out to a key's
//! replica set and resolve the result once enough replicas have answered.

pub mod coordinator;

pub use coordinator::{QuorumCoordinator, QuorumReadOutcome, QuorumWriteOutcome};
