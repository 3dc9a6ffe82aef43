//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A ring operation was attempted before any node was registered.
    ///
    /// Should not occur after startup; callers treat it as fatal for the
    /// single operation, not for the process.
    #[error("ring has no registered nodes")]
    EmptyRing,

    /// A key failed a boundary-level validity check (empty string).
    #[error("invalid key: {0}")]
    InvalidKey(String),
}
