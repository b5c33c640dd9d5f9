//! Group rule definitions

use serde::{Deserialize, Serialize};

/// Group rule status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    #[default]
    Active,
    Inactive,
}

/// Group rule
///
/// Group rules automatically place users whose profile satisfies
/// `expression` into every group listed in `target_group_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRule {
    /// Unique rule id (e.g., "rule-engineering")
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub status: RuleStatus,

    /// Condition, e.g. `user.department == "Engineering"`
    pub expression: String,

    /// Groups the rule assigns matching users into
    #[serde(default)]
    pub target_group_ids: Vec<String>,
}

impl GroupRule {
    /// Create a new active rule
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        expression: impl Into<String>,
        target_group_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: RuleStatus::Active,
            expression: expression.into(),
            target_group_ids,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.status = RuleStatus::Inactive;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }

    /// Whether the rule assigns into `group_id`
    pub fn targets(&self, group_id: &str) -> bool {
        self.target_group_ids.iter().any(|g| g == group_id)
    }
}
