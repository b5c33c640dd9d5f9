//! Shared traits for the accesstrace workspace

pub mod relationships;

// Re-export commonly used traits
pub use relationships::RelationshipIndex;
