//! Access graph type definitions

use accesstrace_core::{Application, EntityKind, Group, GroupRule, User};
use serde::Serialize;
use std::collections::BTreeMap;

/// Entity payload carried by a graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeData {
    User(User),
    Group(Group),
    Rule(GroupRule),
    Application(Application),
}

/// Graph node, unique per (kind, id)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: EntityKind,

    pub label: String,

    pub data: NodeData,
}

impl GraphNode {
    pub fn user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            kind: EntityKind::User,
            label: user.display_name(),
            data: NodeData::User(user.clone()),
        }
    }

    pub fn group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            kind: EntityKind::Group,
            label: group.name.clone(),
            data: NodeData::Group(group.clone()),
        }
    }

    pub fn rule(rule: &GroupRule) -> Self {
        Self {
            id: rule.id.clone(),
            kind: EntityKind::Rule,
            label: rule.name.clone(),
            data: NodeData::Rule(rule.clone()),
        }
    }

    pub fn application(application: &Application) -> Self {
        Self {
            id: application.id.clone(),
            kind: EntityKind::Application,
            label: application.label.clone(),
            data: NodeData::Application(application.clone()),
        }
    }

    pub fn key(&self) -> (EntityKind, &str) {
        (self.kind, self.id.as_str())
    }
}

/// Relationship kind of a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// user → group
    Membership,
    /// user → application
    Assignment,
    /// user → rule and rule → group
    RuleAssignment,
    /// group → application
    AppAccess,
}

impl EdgeKind {
    fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Membership => "membership",
            EdgeKind::Assignment => "assignment",
            EdgeKind::RuleAssignment => "rule_assignment",
            EdgeKind::AppAccess => "app_access",
        }
    }
}

/// Directed graph edge, unique per (source, target, kind)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(rename = "type")]
    pub kind: EdgeKind,

    pub label: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, kind: EdgeKind, label: &str) -> Self {
        Self {
            id: format!("{}-{}-{}", source, target, kind.as_str()),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            label: label.to_string(),
        }
    }

    /// User → group membership not explained by a rule
    pub fn member_of(user_id: &str, group_id: &str) -> Self {
        Self::new(user_id, group_id, EdgeKind::Membership, "member of")
    }

    /// User → application direct assignment, id `<user>-<app>-direct`
    pub fn directly_assigned(user_id: &str, application_id: &str) -> Self {
        let mut edge = Self::new(
            user_id,
            application_id,
            EdgeKind::Assignment,
            "directly assigned",
        );
        edge.id = format!("{}-{}-direct", user_id, application_id);
        edge
    }

    pub fn matches_rule(user_id: &str, rule_id: &str) -> Self {
        Self::new(user_id, rule_id, EdgeKind::RuleAssignment, "matches rule")
    }

    pub fn assigns_to(rule_id: &str, group_id: &str) -> Self {
        Self::new(rule_id, group_id, EdgeKind::RuleAssignment, "assigns to")
    }

    pub fn grants_access(group_id: &str, application_id: &str) -> Self {
        Self::new(group_id, application_id, EdgeKind::AppAccess, "grants access to")
    }

    pub fn key(&self) -> (&str, &str, EdgeKind) {
        (self.source.as_str(), self.target.as_str(), self.kind)
    }
}

/// Graph metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    /// Originating user id
    pub center_node_id: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Requested depth; the graph itself is always one hop deep
    pub max_depth: usize,
}

/// Explanatory graph around one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

/// Per-kind node and edge counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub nodes_by_kind: BTreeMap<EntityKind, usize>,
    pub edges_by_kind: BTreeMap<EdgeKind, usize>,
}

impl GraphData {
    pub fn node(&self, kind: EntityKind, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.key() == (kind, id))
    }

    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        self.edges.iter().any(|e| e.key() == (source, target, kind))
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        for node in &self.nodes {
            *stats.nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }
        for edge in &self.edges {
            *stats.edges_by_kind.entry(edge.kind).or_insert(0) += 1;
        }
        stats
    }
}
