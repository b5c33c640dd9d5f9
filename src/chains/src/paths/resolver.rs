//! Single-explanation path resolver

use super::types::{
    AccessChain, AccessPathNode, REASON_ASSIGNED_BY_RULE, REASON_DIRECT_ASSIGNMENT,
    REASON_DIRECT_MEMBERSHIP, REASON_RULE_MATCH,
};
use crate::error::Result;
use crate::rules::{render_rule, RuleEvaluator};
use accesstrace_core::{Group, GroupRule, RelationshipIndex, User, UserProfile};
use tracing::{debug, warn};

/// Resolves one explainable path from a user to an application
///
/// The resolver borrows the relationship index and holds no other state,
/// so it is cheap to construct per call and safe to share across threads.
pub struct PathResolver<'a, I: RelationshipIndex + ?Sized> {
    index: &'a I,
    evaluator: RuleEvaluator,
}

impl<'a, I: RelationshipIndex + ?Sized> PathResolver<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            evaluator: RuleEvaluator::new(),
        }
    }

    /// Resolve the path by which `user_id` reaches `application_id`
    ///
    /// # Errors
    ///
    /// Returns a not-found lookup error if either id is unknown. A user
    /// with no explainable access is not an error: the chain holds only the
    /// user step and has zero hops.
    pub fn resolve(&self, user_id: &str, application_id: &str) -> Result<AccessChain> {
        let user = self.index.require_user(user_id)?;
        let application = self.index.require_application(application_id)?;

        let mut path = vec![AccessPathNode::user(user)];

        if self.index.has_direct_assignment(user_id, application_id) {
            debug!("{} -> {}: direct assignment", user_id, application_id);
            path.push(AccessPathNode::application(
                application,
                REASON_DIRECT_ASSIGNMENT,
            ));
        } else if let Some((group, rule)) = self.first_granting_group(user, application_id) {
            debug!(
                "{} -> {}: via group {} (rule: {:?})",
                user_id,
                application_id,
                group.id,
                rule.map(|r| r.id.as_str())
            );

            let group_reason = match rule {
                Some(rule) => {
                    path.push(AccessPathNode::rule(rule, REASON_RULE_MATCH));
                    REASON_ASSIGNED_BY_RULE
                }
                None => REASON_DIRECT_MEMBERSHIP,
            };
            path.push(AccessPathNode::group(group, group_reason));
            path.push(AccessPathNode::application(
                application,
                format!("Access granted via group \"{}\"", group.name),
            ));
        } else {
            debug!("{} -> {}: no explainable access", user_id, application_id);
        }

        Ok(AccessChain::new(user.clone(), application.clone(), path))
    }

    /// First group in membership order that is assigned the application,
    /// with the rule explaining the user's membership, if any
    fn first_granting_group(
        &self,
        user: &User,
        application_id: &str,
    ) -> Option<(&'a Group, Option<&'a GroupRule>)> {
        let index: &'a I = self.index;
        for group_id in index.groups_for_user(&user.id) {
            if !index.group_grants(group_id, application_id) {
                continue;
            }
            let Some(group) = index.group(group_id) else {
                warn!("User {} is a member of unknown group {}", user.id, group_id);
                continue;
            };
            return Some((group, self.explaining_rule(group_id, &user.profile)));
        }
        None
    }

    /// First active rule feeding `group_id` that matches `profile`
    pub fn explaining_rule(&self, group_id: &str, profile: &UserProfile) -> Option<&'a GroupRule> {
        let index: &'a I = self.index;
        index
            .rules_for_group(group_id)
            .into_iter()
            .filter(|rule| rule.is_active())
            .find(|rule| self.evaluator.matches(&rule.expression, profile))
    }

    /// Explain why `user_id` is in `group_id`
    ///
    /// Returns `[user, rule, group]` when an active rule feeding the group
    /// matches the user, otherwise `[user, group]`. Membership itself is not
    /// checked.
    pub fn explain_group_membership(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<AccessPathNode>> {
        let user = self.index.require_user(user_id)?;
        let group = self.index.require_group(group_id)?;

        let mut path = vec![AccessPathNode::user(user)];
        let group_reason = match self.explaining_rule(group_id, &user.profile) {
            Some(rule) => {
                let reason = format!("Rule condition: {}", render_rule(&rule.expression));
                path.push(AccessPathNode::rule(rule, reason));
                REASON_ASSIGNED_BY_RULE
            }
            None => REASON_DIRECT_MEMBERSHIP,
        };
        path.push(AccessPathNode::group(group, group_reason));

        Ok(path)
    }
}
