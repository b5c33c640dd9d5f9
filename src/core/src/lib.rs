//! # Accesstrace Core
//!
//! Shared entity types, the relationship index trait, and error handling
//! for the accesstrace workspace. The access path engine in
//! `accesstrace-chains` depends only on what is defined here, so any data
//! layer able to implement [`RelationshipIndex`] can feed it.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::RelationshipIndex;
pub use types::{
    AppStatus, Application, EntityKind, Group, GroupRule, GroupType, RuleStatus, User,
    UserProfile, UserStatus,
};
