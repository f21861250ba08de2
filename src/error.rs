//! Error types for the timer core and its persistence layer

use thiserror::Error;

use crate::state::TimerId;

/// Errors surfaced by the timer core
#[derive(Debug, Error)]
pub enum CoreError {
    /// An intent referenced a timer that is not in the store
    #[error("timer {0} not found")]
    NotFound(TimerId),

    /// The storage slot could not be read or written
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored payload decoded but breaks store invariants
    #[error("corrupt timer payload: {0}")]
    Corrupt(String),

    /// A shared lock was poisoned by a panicking holder
    #[error("failed to lock {0}")]
    Lock(String),

    /// A blocking dispatch task panicked or was cancelled
    #[error("dispatch task failed: {0}")]
    Task(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
