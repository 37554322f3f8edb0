use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine transport failed: {0}")]
    Transport(#[from] crate::unix::Error),
    #[error("failed to read engine response body: {0}")]
    Body(#[source] hyper::Error),
    #[error("engine responded with status {status}: {message}")]
    Status {
        status: hyper::StatusCode,
        message: String,
    },
    #[error("engine reported an error: {0}")]
    Engine(String),
    #[error("failed to decode engine response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
