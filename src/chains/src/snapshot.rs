//! In-memory relationship snapshot
//!
//! A [`Snapshot`] is the point-in-time view of users, groups, applications,
//! rules and their relationships that every engine operation runs over. It
//! is immutable once built; loading fresh data means building a new one.
//!
//! Snapshots are built either from a serialized [`SnapshotData`] document
//! or programmatically through [`SnapshotBuilder`]:
//!
//! ```rust
//! use accesstrace_chains::snapshot::SnapshotBuilder;
//! use accesstrace_core::{Application, Group, RelationshipIndex, User, UserProfile};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .user(User::new("u1", UserProfile::new("u1@company.com")))
//!     .group(Group::new("g1", "Everyone"))
//!     .application(Application::new("a1", "slack-app", "Slack"))
//!     .member("u1", "g1")
//!     .grant("g1", "a1")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(snapshot.groups_for_user("u1"), ["g1".to_string()]);
//! ```

use crate::error::{ChainError, Result};
use accesstrace_core::{Application, Group, GroupRule, RelationshipIndex, User};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Serialized snapshot document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(default)]
    pub applications: Vec<Application>,

    #[serde(default)]
    pub rules: Vec<GroupRule>,

    /// user id -> group ids, in membership order
    #[serde(default)]
    pub user_groups: HashMap<String, Vec<String>>,

    /// group id -> application ids
    #[serde(default)]
    pub group_applications: HashMap<String, Vec<String>>,

    /// user id -> directly assigned application ids
    #[serde(default)]
    pub user_applications: HashMap<String, Vec<String>>,
}

/// Immutable relationship index over one snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    users: Vec<User>,
    groups: Vec<Group>,
    applications: Vec<Application>,
    rules: Vec<GroupRule>,

    user_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    application_index: HashMap<String, usize>,
    rule_index: HashMap<String, usize>,

    user_groups: HashMap<String, Vec<String>>,
    group_applications: HashMap<String, Vec<String>>,
    user_applications: HashMap<String, Vec<String>>,

    /// group id -> ids of rules targeting it, in rule order
    group_rules: HashMap<String, Vec<String>>,
}

impl Snapshot {
    /// Build a snapshot from a document
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshot` if any entity id is empty or duplicated.
    /// Relationships that reference unknown ids are kept and logged.
    pub fn from_data(data: SnapshotData) -> Result<Self> {
        let user_index = index_by_id("user", data.users.iter().map(|u| u.id.as_str()))?;
        let group_index = index_by_id("group", data.groups.iter().map(|g| g.id.as_str()))?;
        let application_index =
            index_by_id("application", data.applications.iter().map(|a| a.id.as_str()))?;
        let rule_index = index_by_id("rule", data.rules.iter().map(|r| r.id.as_str()))?;

        let mut group_rules: HashMap<String, Vec<String>> = HashMap::new();
        for rule in &data.rules {
            for group_id in &rule.target_group_ids {
                let ids = group_rules.entry(group_id.clone()).or_default();
                if !ids.contains(&rule.id) {
                    ids.push(rule.id.clone());
                }
            }
        }

        let snapshot = Self {
            users: data.users,
            groups: data.groups,
            applications: data.applications,
            rules: data.rules,
            user_index,
            group_index,
            application_index,
            rule_index,
            user_groups: data.user_groups,
            group_applications: data.group_applications,
            user_applications: data.user_applications,
            group_rules,
        };

        snapshot.warn_dangling_references();

        info!(
            "Snapshot loaded: users={}, groups={}, applications={}, rules={}",
            snapshot.users.len(),
            snapshot.groups.len(),
            snapshot.applications.len(),
            snapshot.rules.len()
        );

        Ok(snapshot)
    }

    /// Parse a JSON snapshot document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: SnapshotData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load a JSON snapshot document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Convert back into a serializable document
    pub fn to_data(&self) -> SnapshotData {
        SnapshotData {
            users: self.users.clone(),
            groups: self.groups.clone(),
            applications: self.applications.clone(),
            rules: self.rules.clone(),
            user_groups: self.user_groups.clone(),
            group_applications: self.group_applications.clone(),
            user_applications: self.user_applications.clone(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    fn warn_dangling_references(&self) {
        for (user_id, group_ids) in &self.user_groups {
            if !self.user_index.contains_key(user_id) {
                warn!("Membership references unknown user {}", user_id);
            }
            for group_id in group_ids {
                if !self.group_index.contains_key(group_id) {
                    warn!("User {} is a member of unknown group {}", user_id, group_id);
                }
            }
        }

        for (group_id, app_ids) in &self.group_applications {
            if !self.group_index.contains_key(group_id) {
                warn!("Assignment references unknown group {}", group_id);
            }
            for app_id in app_ids {
                if !self.application_index.contains_key(app_id) {
                    warn!("Group {} is assigned unknown application {}", group_id, app_id);
                }
            }
        }

        for (user_id, app_ids) in &self.user_applications {
            if !self.user_index.contains_key(user_id) {
                warn!("Direct assignment references unknown user {}", user_id);
            }
            for app_id in app_ids {
                if !self.application_index.contains_key(app_id) {
                    warn!("User {} is assigned unknown application {}", user_id, app_id);
                }
            }
        }

        for rule in &self.rules {
            for group_id in &rule.target_group_ids {
                if !self.group_index.contains_key(group_id) {
                    warn!("Rule {} targets unknown group {}", rule.id, group_id);
                }
            }
        }
    }
}

fn index_by_id<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if id.is_empty() {
            return Err(ChainError::InvalidSnapshot(format!(
                "{} at position {} has an empty id",
                kind, position
            )));
        }
        if index.insert(id.to_string(), position).is_some() {
            return Err(ChainError::InvalidSnapshot(format!(
                "duplicate {} id: {}",
                kind, id
            )));
        }
    }
    Ok(index)
}

fn list<'a>(map: &'a HashMap<String, Vec<String>>, key: &str) -> &'a [String] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}

impl RelationshipIndex for Snapshot {
    fn user(&self, id: &str) -> Option<&User> {
        self.user_index.get(id).map(|&i| &self.users[i])
    }

    fn group(&self, id: &str) -> Option<&Group> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    fn application(&self, id: &str) -> Option<&Application> {
        self.application_index.get(id).map(|&i| &self.applications[i])
    }

    fn rule(&self, id: &str) -> Option<&GroupRule> {
        self.rule_index.get(id).map(|&i| &self.rules[i])
    }

    fn groups_for_user(&self, user_id: &str) -> &[String] {
        list(&self.user_groups, user_id)
    }

    fn applications_for_group(&self, group_id: &str) -> &[String] {
        list(&self.group_applications, group_id)
    }

    fn direct_applications_for_user(&self, user_id: &str) -> &[String] {
        list(&self.user_applications, user_id)
    }

    fn rule_ids_for_group(&self, group_id: &str) -> &[String] {
        list(&self.group_rules, group_id)
    }

    fn user_ids(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.id.as_str()).collect()
    }

    fn related_user_ids(&self) -> Vec<&str> {
        let related = |id: &str| {
            self.user_groups.get(id).is_some_and(|g| !g.is_empty())
                || self.user_applications.get(id).is_some_and(|a| !a.is_empty())
        };

        let mut unknown: Vec<&str> = self
            .user_groups
            .keys()
            .chain(self.user_applications.keys())
            .map(String::as_str)
            .filter(|id| !self.user_index.contains_key(*id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();

        self.users
            .iter()
            .map(|u| u.id.as_str())
            .filter(|id| related(*id))
            .chain(unknown)
            .collect()
    }

    fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Programmatic snapshot construction
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    data: SnapshotData,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: User) -> Self {
        self.data.users.push(user);
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.data.groups.push(group);
        self
    }

    pub fn application(mut self, application: Application) -> Self {
        self.data.applications.push(application);
        self
    }

    pub fn rule(mut self, rule: GroupRule) -> Self {
        self.data.rules.push(rule);
        self
    }

    /// Add `user_id` to `group_id` (appended to the user's membership order)
    pub fn member(mut self, user_id: &str, group_id: &str) -> Self {
        push_unique(&mut self.data.user_groups, user_id, group_id);
        self
    }

    /// Assign `application_id` to `group_id`
    pub fn grant(mut self, group_id: &str, application_id: &str) -> Self {
        push_unique(&mut self.data.group_applications, group_id, application_id);
        self
    }

    /// Assign `application_id` directly to `user_id`
    pub fn assign(mut self, user_id: &str, application_id: &str) -> Self {
        push_unique(&mut self.data.user_applications, user_id, application_id);
        self
    }

    pub fn build(self) -> Result<Snapshot> {
        Snapshot::from_data(self.data)
    }
}

fn push_unique(map: &mut HashMap<String, Vec<String>>, key: &str, value: &str) {
    let values = map.entry(key.to_string()).or_default();
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Distinct values in first-seen order
pub(crate) fn dedup_ordered<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use accesstrace_core::UserProfile;

    fn sample() -> SnapshotBuilder {
        SnapshotBuilder::new()
            .user(User::new("u1", UserProfile::new("u1@company.com")))
            .user(User::new("u2", UserProfile::new("u2@company.com")))
            .group(Group::new("g1", "Engineering"))
            .group(Group::new("g2", "Everyone"))
            .application(Application::new("a1", "github-app", "GitHub"))
            .rule(GroupRule::new(
                "r1",
                "Eng",
                r#"user.department == "Engineering""#,
                vec!["g1".to_string(), "g2".to_string()],
            ))
            .rule(GroupRule::new(
                "r2",
                "Everyone",
                r#"user.title == "Staff""#,
                vec!["g2".to_string()],
            ))
    }

    #[test]
    fn test_lookups() {
        let snapshot = sample().member("u1", "g1").build().unwrap();

        assert_eq!(snapshot.user("u1").unwrap().id, "u1");
        assert!(snapshot.user("u9").is_none());
        assert_eq!(snapshot.group("g2").unwrap().name, "Everyone");
        assert_eq!(snapshot.application("a1").unwrap().label, "GitHub");
        assert_eq!(snapshot.rule("r2").unwrap().name, "Everyone");
        assert_eq!(snapshot.user_ids(), vec!["u1", "u2"]);
    }

    #[test]
    fn test_membership_order_preserved() {
        let snapshot = sample()
            .member("u1", "g2")
            .member("u1", "g1")
            .member("u1", "g2")
            .build()
            .unwrap();

        assert_eq!(snapshot.groups_for_user("u1"), ["g2".to_string(), "g1".to_string()]);
        assert!(snapshot.groups_for_user("u2").is_empty());
    }

    #[test]
    fn test_group_rules_index_derived_from_targets() {
        let snapshot = sample().build().unwrap();

        assert_eq!(snapshot.rule_ids_for_group("g1"), ["r1".to_string()]);
        assert_eq!(
            snapshot.rule_ids_for_group("g2"),
            ["r1".to_string(), "r2".to_string()]
        );
        assert!(snapshot.rule_ids_for_group("g3").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = sample()
            .user(User::new("u1", UserProfile::new("again@company.com")))
            .build();

        match result {
            Err(ChainError::InvalidSnapshot(msg)) => assert!(msg.contains("duplicate user id: u1")),
            other => panic!("Expected InvalidSnapshot, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = SnapshotBuilder::new().group(Group::new("", "Nameless")).build();
        assert!(matches!(result, Err(ChainError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_dangling_references_are_kept() {
        let snapshot = sample()
            .member("u1", "g-missing")
            .assign("u1", "a-missing")
            .build()
            .unwrap();

        assert_eq!(snapshot.groups_for_user("u1"), ["g-missing".to_string()]);
        assert!(snapshot.has_direct_assignment("u1", "a-missing"));
        assert!(snapshot.group("g-missing").is_none());
    }

    #[test]
    fn test_related_user_ids_include_unknown_users() {
        let snapshot = sample()
            .member("u2", "g1")
            .assign("u-zed", "a1")
            .member("u-ghost", "g2")
            .assign("u-ghost", "a1")
            .build()
            .unwrap();

        // u1 holds no relationships; unknown ids follow known users, sorted
        assert_eq!(snapshot.related_user_ids(), vec!["u2", "u-ghost", "u-zed"]);
    }

    #[test]
    fn test_json_roundtrip_through_data() {
        let snapshot = sample().member("u1", "g1").grant("g1", "a1").build().unwrap();
        let json = serde_json::to_string(&snapshot.to_data()).unwrap();
        let reloaded = Snapshot::from_json_str(&json).unwrap();

        assert_eq!(reloaded.to_data(), snapshot.to_data());
        assert!(reloaded.group_grants("g1", "a1"));
    }

    #[test]
    fn test_invalid_json() {
        let result = Snapshot::from_json_str("{ not json");
        assert!(matches!(result, Err(ChainError::Serialization(_))));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let json = serde_json::to_string(&sample().build().unwrap().to_data()).unwrap();
        std::fs::write(&path, json).unwrap();

        let snapshot = Snapshot::from_path(&path).unwrap();
        assert_eq!(snapshot.users().len(), 2);

        let missing = Snapshot::from_path(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ChainError::Io(_))));
    }

    #[test]
    fn test_dedup_ordered() {
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_ordered(&values), vec!["b".to_string(), "a".to_string()]);
    }
}
