pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("heartbeat loop already running")]
    AlreadyRunning,
}
