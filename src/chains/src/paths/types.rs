//! Access path type definitions

use crate::rules::render_rule;
use accesstrace_core::{Application, EntityKind, Group, GroupRule, User};
use serde::{Deserialize, Serialize};

/// Reason on the first step of every path
pub const REASON_STARTING_POINT: &str = "Starting point";
/// Application reason on a direct path
pub const REASON_DIRECT_ASSIGNMENT: &str = "Direct assignment";
/// Group reason when a rule explains membership
pub const REASON_ASSIGNED_BY_RULE: &str = "Assigned by rule";
/// Group reason when no rule explains membership
pub const REASON_DIRECT_MEMBERSHIP: &str = "Direct membership";
/// Reason on a rule step
pub const REASON_RULE_MATCH: &str = "User matches rule condition";

/// One step of an access path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPathNode {
    #[serde(rename = "type")]
    pub kind: EntityKind,

    pub id: String,

    /// Display name of the entity
    pub name: String,

    /// Why this step is on the path
    pub reason: String,

    /// Raw rule expression (rule steps only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_expression: Option<String>,

    /// Rendered rule expression (rule steps only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_readable_reason: Option<String>,
}

impl AccessPathNode {
    fn new(kind: EntityKind, id: &str, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.to_string(),
            name: name.into(),
            reason: reason.into(),
            rule_expression: None,
            human_readable_reason: None,
        }
    }

    pub fn user(user: &User) -> Self {
        Self::new(EntityKind::User, &user.id, user.display_name(), REASON_STARTING_POINT)
    }

    pub fn group(group: &Group, reason: impl Into<String>) -> Self {
        Self::new(EntityKind::Group, &group.id, group.name.clone(), reason)
    }

    /// Rule step annotated with its raw and rendered expression
    pub fn rule(rule: &GroupRule, reason: impl Into<String>) -> Self {
        let mut node = Self::new(EntityKind::Rule, &rule.id, rule.name.clone(), reason);
        node.rule_expression = Some(rule.expression.clone());
        node.human_readable_reason = Some(render_rule(&rule.expression));
        node
    }

    pub fn application(application: &Application, reason: impl Into<String>) -> Self {
        Self::new(
            EntityKind::Application,
            &application.id,
            application.label.clone(),
            reason,
        )
    }
}

/// How an application was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Direct,
    GroupBased,
    RuleBased,
}

/// Explained path from a user to an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessChain {
    pub user: User,
    pub application: Application,
    pub path: Vec<AccessPathNode>,

    /// Always `path.len() - 1`
    pub total_hops: usize,
}

impl AccessChain {
    pub fn new(user: User, application: Application, path: Vec<AccessPathNode>) -> Self {
        let total_hops = path.len().saturating_sub(1);
        Self {
            user,
            application,
            path,
            total_hops,
        }
    }

    /// Whether the path reaches the application
    pub fn has_access(&self) -> bool {
        self.path
            .last()
            .map(|n| n.kind == EntityKind::Application && n.id == self.application.id)
            .unwrap_or(false)
    }

    /// No direct, group or rule explanation could be built
    pub fn is_unexplained(&self) -> bool {
        self.total_hops == 0
    }

    pub fn contains_kind(&self, kind: EntityKind) -> bool {
        self.path.iter().any(|n| n.kind == kind)
    }

    /// Rule-based if any step is a rule, else group-based if any step is a
    /// group, else direct
    pub fn access_kind(&self) -> AccessKind {
        if self.contains_kind(EntityKind::Rule) {
            AccessKind::RuleBased
        } else if self.contains_kind(EntityKind::Group) {
            AccessKind::GroupBased
        } else {
            AccessKind::Direct
        }
    }

    /// Entity ids along the path, in order
    pub fn node_ids(&self) -> Vec<&str> {
        self.path.iter().map(|n| n.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accesstrace_core::UserProfile;

    fn user() -> User {
        User::new("u1", UserProfile::new("u1@company.com").with_name("Ada", "Lovelace"))
    }

    fn app() -> Application {
        Application::new("a1", "github-app", "GitHub Enterprise")
    }

    #[test]
    fn test_node_constructors() {
        let node = AccessPathNode::user(&user());
        assert_eq!(node.kind, EntityKind::User);
        assert_eq!(node.name, "Ada Lovelace");
        assert_eq!(node.reason, REASON_STARTING_POINT);

        let node = AccessPathNode::application(&app(), REASON_DIRECT_ASSIGNMENT);
        assert_eq!(node.name, "GitHub Enterprise");

        let rule = GroupRule::new("r1", "Eng", r#"user.department == "Eng""#, vec![]);
        let node = AccessPathNode::rule(&rule, REASON_RULE_MATCH);
        assert_eq!(node.rule_expression.as_deref(), Some(r#"user.department == "Eng""#));
        assert_eq!(
            node.human_readable_reason.as_deref(),
            Some(r#"User department is "Eng""#)
        );
    }

    #[test]
    fn test_hops_and_classification() {
        let direct = AccessChain::new(
            user(),
            app(),
            vec![
                AccessPathNode::user(&user()),
                AccessPathNode::application(&app(), REASON_DIRECT_ASSIGNMENT),
            ],
        );
        assert_eq!(direct.total_hops, 1);
        assert!(direct.has_access());
        assert_eq!(direct.access_kind(), AccessKind::Direct);

        let group = Group::new("g1", "Everyone");
        let via_group = AccessChain::new(
            user(),
            app(),
            vec![
                AccessPathNode::user(&user()),
                AccessPathNode::group(&group, REASON_DIRECT_MEMBERSHIP),
                AccessPathNode::application(&app(), "Access granted via group \"Everyone\""),
            ],
        );
        assert_eq!(via_group.total_hops, 2);
        assert_eq!(via_group.access_kind(), AccessKind::GroupBased);
        assert_eq!(via_group.node_ids(), vec!["u1", "g1", "a1"]);
    }

    #[test]
    fn test_unexplained_chain() {
        let chain = AccessChain::new(user(), app(), vec![AccessPathNode::user(&user())]);
        assert_eq!(chain.total_hops, 0);
        assert!(chain.is_unexplained());
        assert!(!chain.has_access());
    }

    #[test]
    fn test_empty_path_never_underflows() {
        let chain = AccessChain::new(user(), app(), Vec::new());
        assert_eq!(chain.total_hops, 0);
    }

    #[test]
    fn test_chain_serializes_camel_case() {
        let chain = AccessChain::new(user(), app(), vec![AccessPathNode::user(&user())]);
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(json["totalHops"], 0);
        assert_eq!(json["path"][0]["type"], "user");
        assert!(json["path"][0].get("ruleExpression").is_none());
    }
}
