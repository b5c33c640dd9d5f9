//! Access path resolution
//!
//! Answers "how does user X reach application Y?" with exactly one
//! explanation, chosen by a fixed priority:
//!
//! 1. a direct user → application assignment;
//! 2. otherwise the first group (in membership order) assigned the
//!    application, explained by the first active rule feeding that group
//!    that matches the user's profile, if any;
//! 3. otherwise no explanation: the path holds only the user.
//!
//! Later groups that would also grant access are never considered.
//!
//! # Example
//!
//! ```rust
//! use accesstrace_chains::paths::PathResolver;
//! use accesstrace_chains::snapshot::SnapshotBuilder;
//! use accesstrace_core::{Application, User, UserProfile};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .user(User::new("u1", UserProfile::new("u1@company.com")))
//!     .application(Application::new("a1", "jira-app", "Jira"))
//!     .assign("u1", "a1")
//!     .build()
//!     .unwrap();
//!
//! let chain = PathResolver::new(&snapshot).resolve("u1", "a1").unwrap();
//! assert_eq!(chain.total_hops, 1);
//! ```

pub mod types;
pub mod resolver;


pub use resolver::PathResolver;
pub use types::{AccessChain, AccessKind, AccessPathNode};
