use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebugError {
    #[error("Failed to trigger workflow: {0}")]
    Trigger(String),

    #[error("Run did not complete within the deadline (waited {elapsed:?})")]
    Timeout { elapsed: Duration },

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DebugError>;
