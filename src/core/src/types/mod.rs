//! Snapshot entity types

pub mod identity;
pub mod rule;

pub use identity::{AppStatus, Application, Group, GroupType, User, UserProfile, UserStatus};
pub use rule::{GroupRule, RuleStatus};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity that can appear in an access path or graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Group,
    Rule,
    Application,
}

impl EntityKind {
    /// Lowercase name used in keys and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Rule => "rule",
            EntityKind::Application => "application",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_serde() {
        let json = serde_json::to_string(&EntityKind::Application).unwrap();
        assert_eq!(json, "\"application\"");

        let kind: EntityKind = serde_json::from_str("\"rule\"").unwrap();
        assert_eq!(kind, EntityKind::Rule);
    }
}
