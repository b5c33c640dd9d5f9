//! Unified lookup errors for the accesstrace workspace

use crate::types::EntityKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for snapshot lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An id did not resolve to an entity in the snapshot
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
}

impl CoreError {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(kind: EntityKind, id: S) -> Self {
        CoreError::NotFound { kind, id: id.into() }
    }

    /// Whether this error is a failed lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}
