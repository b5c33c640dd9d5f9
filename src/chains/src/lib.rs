//! # Accesstrace Chains
//!
//! Explains how identities reach applications in an identity-provider
//! backed organization.
//!
//! ## Features
//!
//! - **Path resolution**: one explainable path per (user, application),
//!   chosen by a fixed direct → group → rule priority
//! - **Access graphs**: every group, rule and application around a user,
//!   deduplicated by entity
//! - **Aggregation**: per-user and per-application chain batches with
//!   per-item failure reporting, complexity and rule statistics
//! - **Rule expressions**: attribute-equality evaluation and rendering
//! - **HTTP API** (feature `server`): JSON endpoints over a loaded snapshot
//!
//! ## Example
//!
//! ```rust
//! use accesstrace_chains::{AccessEngine, EngineConfig, SnapshotBuilder};
//! use accesstrace_core::{Application, Group, GroupRule, User, UserProfile};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .user(User::new(
//!         "u1",
//!         UserProfile::new("ada@company.com").with_department("Engineering"),
//!     ))
//!     .group(Group::new("g1", "Engineering"))
//!     .application(Application::new("a1", "github", "GitHub"))
//!     .rule(GroupRule::new(
//!         "r1",
//!         "Engineering Department",
//!         r#"user.department == "Engineering""#,
//!         vec!["g1".to_string()],
//!     ))
//!     .member("u1", "g1")
//!     .grant("g1", "a1")
//!     .build()
//!     .unwrap();
//!
//! let engine = AccessEngine::from_snapshot(snapshot, EngineConfig::default()).unwrap();
//! let chain = engine.resolve_access_path("u1", "a1").unwrap();
//!
//! assert_eq!(chain.node_ids(), vec!["u1", "r1", "g1", "a1"]);
//! assert_eq!(chain.total_hops, 3);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod paths;
pub mod rules;
pub mod snapshot;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use aggregate::{ChainAggregator, ChainBatch, ChainOutcome, ComplexityStats, RuleStatistics};
pub use cache::{CacheStats, ChainCache};
pub use config::{EngineConfig, ServerConfig};
pub use engine::AccessEngine;
pub use error::{ChainError, Result};
pub use graph::{EdgeKind, GraphBuilder, GraphData, GraphEdge, GraphNode};
pub use paths::{AccessChain, AccessKind, AccessPathNode, PathResolver};
pub use rules::{evaluate_rule, render_rule, RuleEvaluator, RuleExpression, RuleOutcome};
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotData};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
