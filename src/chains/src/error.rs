//! Error types for the access path engine

use accesstrace_core::CoreError;
use thiserror::Error;

/// Access path engine errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// User, group, application or rule id did not resolve
    #[error(transparent)]
    Lookup(#[from] CoreError),

    /// Snapshot document is inconsistent
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    /// Whether this is a lookup failure for an unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChainError::Lookup(e) if e.is_not_found())
    }
}

/// Result type for access path operations
pub type Result<T> = std::result::Result<T, ChainError>;
