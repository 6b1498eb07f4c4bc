//! Error types for the match board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors surfaced to callers of the board controller
#[derive(Debug, Error)]
pub enum BoardError {
    /// The remote mutation rejected; the optimistic move has been rolled back
    #[error("mutation failed: {0}")]
    Mutation(#[from] MutationError),

    /// Match not present in the current snapshot
    #[error("match not found: {id}")]
    MatchNotFound { id: String },

    /// Configuration could not be parsed
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Create a configuration error
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Mutation(e) if e.is_retryable())
    }
}

/// Failures reported by the remote system of record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The request never reached the server or timed out
    #[error("network error: {message}")]
    Network { message: String },

    /// The match no longer exists remotely
    #[error("not found: {id}")]
    NotFound { id: String },

    /// The server refused the requested change
    #[error("validation failed: {message}")]
    Validation { message: String },
}

impl MutationError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Failures of the keyed order storage. Never escapes [`crate::OrderStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not a valid order record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Another process holds the storage lock
    #[error("lock busy - another write in progress")]
    LockBusy,
}
