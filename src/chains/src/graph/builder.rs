//! Access graph construction

use super::types::{EdgeKind, GraphData, GraphEdge, GraphMetadata, GraphNode};
use crate::error::Result;
use crate::rules::RuleEvaluator;
use accesstrace_core::{EntityKind, RelationshipIndex, User};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Node and edge sets with key-based deduplication
#[derive(Debug, Default)]
struct GraphAccumulator {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_keys: HashSet<(EntityKind, String)>,
    edge_keys: HashSet<(String, String, EdgeKind)>,
}

impl GraphAccumulator {
    /// Insert a node; returns false if (kind, id) was already present
    fn add_node(&mut self, node: GraphNode) -> bool {
        if !self.node_keys.insert((node.kind, node.id.clone())) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    fn add_edge(&mut self, edge: GraphEdge) -> bool {
        let key = (edge.source.clone(), edge.target.clone(), edge.kind);
        if !self.edge_keys.insert(key) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    fn finish(self, center_node_id: &str, max_depth: usize) -> GraphData {
        let metadata = GraphMetadata {
            center_node_id: center_node_id.to_string(),
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            max_depth,
        };
        GraphData {
            nodes: self.nodes,
            edges: self.edges,
            metadata,
        }
    }
}

/// Builds the one-hop explanatory graph around a user
///
/// Rule matching uses the same evaluator as [`crate::paths::PathResolver`],
/// so a "matches rule" edge appears exactly when the resolver would explain
/// the membership by that rule.
pub struct GraphBuilder<'a, I: RelationshipIndex + ?Sized> {
    index: &'a I,
    evaluator: RuleEvaluator,
}

impl<'a, I: RelationshipIndex + ?Sized> GraphBuilder<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            evaluator: RuleEvaluator::new(),
        }
    }

    /// Build the graph for `user_id`
    ///
    /// `max_depth` is recorded in the metadata only. Expansion stops at
    /// user → group → rule/application regardless of its value.
    ///
    /// # Errors
    ///
    /// Returns a not-found lookup error for an unknown user. Dangling group
    /// and application ids are skipped.
    pub fn build(&self, user_id: &str, max_depth: usize) -> Result<GraphData> {
        let user = self.index.require_user(user_id)?;
        let mut graph = GraphAccumulator::default();

        graph.add_node(GraphNode::user(user));

        for group_id in self.index.groups_for_user(user_id) {
            self.add_group(&mut graph, user, group_id);
        }

        for application_id in self.index.direct_applications_for_user(user_id) {
            let Some(application) = self.index.application(application_id) else {
                warn!("User {} is assigned unknown application {}", user_id, application_id);
                continue;
            };
            graph.add_node(GraphNode::application(application));
            graph.add_edge(GraphEdge::directly_assigned(user_id, application_id));
        }

        let data = graph.finish(user_id, max_depth);
        debug!(
            "Built access graph for {}: {} nodes, {} edges",
            user_id, data.metadata.total_nodes, data.metadata.total_edges
        );
        Ok(data)
    }

    fn add_group(&self, graph: &mut GraphAccumulator, user: &User, group_id: &str) {
        let Some(group) = self.index.group(group_id) else {
            warn!("User {} is a member of unknown group {}", user.id, group_id);
            return;
        };
        if !graph.add_node(GraphNode::group(group)) {
            // listed twice in the membership
            return;
        }

        let mut explained = false;
        for rule in self
            .index
            .rules_for_group(group_id)
            .into_iter()
            .filter(|rule| rule.is_active())
        {
            graph.add_node(GraphNode::rule(rule));
            if self.evaluator.matches(&rule.expression, &user.profile) {
                graph.add_edge(GraphEdge::matches_rule(&user.id, &rule.id));
                graph.add_edge(GraphEdge::assigns_to(&rule.id, group_id));
                explained = true;
            }
        }

        if !explained {
            graph.add_edge(GraphEdge::member_of(&user.id, group_id));
        }

        for application_id in self.index.applications_for_group(group_id) {
            let Some(application) = self.index.application(application_id) else {
                warn!("Group {} grants unknown application {}", group_id, application_id);
                continue;
            };
            graph.add_node(GraphNode::application(application));
            graph.add_edge(GraphEdge::grants_access(group_id, application_id));
        }
    }
}
