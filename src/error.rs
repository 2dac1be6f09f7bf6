use crate::domain::TaskId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskboardError>;

#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("Invalid task status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TaskboardError {
    /// True for failures caused by the backend being unreachable or unhappy,
    /// as opposed to bad input on our side
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::MalformedResponse(_)
        )
    }
}
