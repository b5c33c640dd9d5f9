//! Access graph builder
//!
//! Materializes every entity and relationship reachable from one user:
//! the user's groups, the active rules feeding those groups, the
//! applications those groups grant, and the user's direct applications.
//! Nodes are unique per (kind, id) and edges per (source, target, kind).
//! Presentation (layout, colours) is left to the consumer.

mod builder;
mod types;

pub use builder::GraphBuilder;
pub use types::{EdgeKind, GraphData, GraphEdge, GraphMetadata, GraphNode, GraphStats, NodeData};
