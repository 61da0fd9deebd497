use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid date key '{0}'")]
    InvalidDateKey(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("remote sync is not configured: {0}")]
    NotConfigured(String),
    #[error("credential store error: {0}")]
    Credential(String),
}
