//! Read-only relationship index over an identity snapshot

use crate::error::{CoreError, Result};
use crate::types::{Application, EntityKind, Group, GroupRule, User};

/// Lookup structure over a point-in-time snapshot of identity data
///
/// Implementations must be immutable for as long as they are borrowed:
/// the access path engine caches results on the assumption that the same
/// query always yields the same answer.
///
/// All membership lists are ordered. The order is significant: the path
/// resolver explains access through the *first* qualifying group.
pub trait RelationshipIndex: Send + Sync {
    /// User lookup by id
    fn user(&self, id: &str) -> Option<&User>;

    /// Group lookup by id
    fn group(&self, id: &str) -> Option<&Group>;

    /// Application lookup by id
    fn application(&self, id: &str) -> Option<&Application>;

    /// Rule lookup by id
    fn rule(&self, id: &str) -> Option<&GroupRule>;

    /// Groups the user is a member of, in stored order
    fn groups_for_user(&self, user_id: &str) -> &[String];

    /// Applications assigned to the group, in stored order
    fn applications_for_group(&self, group_id: &str) -> &[String];

    /// Applications assigned directly to the user, in stored order
    fn direct_applications_for_user(&self, user_id: &str) -> &[String];

    /// Ids of rules that assign users into the group, in rule order
    fn rule_ids_for_group(&self, group_id: &str) -> &[String];

    /// All user ids in snapshot order
    fn user_ids(&self) -> Vec<&str>;

    /// Every user id that holds a membership or direct assignment,
    /// including ids the snapshot has no user record for
    ///
    /// Known users come first in snapshot order, then unknown ids sorted.
    fn related_user_ids(&self) -> Vec<&str>;

    /// All rule ids in snapshot order
    fn rule_ids(&self) -> Vec<&str>;

    /// Rules feeding the group; dangling rule ids are skipped
    fn rules_for_group(&self, group_id: &str) -> Vec<&GroupRule> {
        self.rule_ids_for_group(group_id)
            .iter()
            .filter_map(|id| self.rule(id))
            .collect()
    }

    fn require_user(&self, id: &str) -> Result<&User> {
        self.user(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::User, id))
    }

    fn require_group(&self, id: &str) -> Result<&Group> {
        self.group(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Group, id))
    }

    fn require_application(&self, id: &str) -> Result<&Application> {
        self.application(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Application, id))
    }

    fn require_rule(&self, id: &str) -> Result<&GroupRule> {
        self.rule(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Rule, id))
    }

    /// Whether the user holds a direct assignment to the application
    fn has_direct_assignment(&self, user_id: &str, application_id: &str) -> bool {
        self.direct_applications_for_user(user_id)
            .iter()
            .any(|a| a == application_id)
    }

    /// Whether the group is assigned the application
    fn group_grants(&self, group_id: &str, application_id: &str) -> bool {
        self.applications_for_group(group_id)
            .iter()
            .any(|a| a == application_id)
    }
}
