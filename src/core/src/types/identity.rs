//! Users, groups and applications as held by the identity provider

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Staged,
    Provisioned,
    Recovery,
    Deprovisioned,
}

/// User profile attributes
///
/// The well-known attributes are typed fields; anything else the identity
/// provider returns lands in `attributes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub login: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    /// Custom attributes
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl UserProfile {
    /// Create a profile with the given login (also used as email)
    pub fn new(login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            email: login.clone(),
            login,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a custom string attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Look up an attribute by its profile name
    ///
    /// Returns `None` for missing attributes, empty strings, and custom
    /// attributes that are not strings.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let value = match name {
            "firstName" => self.first_name.as_deref(),
            "lastName" => self.last_name.as_deref(),
            "email" => Some(self.email.as_str()),
            "login" => Some(self.login.as_str()),
            "department" => self.department.as_deref(),
            "title" => self.title.as_deref(),
            "manager" => self.manager.as_deref(),
            other => self.attributes.get(other).and_then(|v| v.as_str()),
        };
        value.filter(|v| !v.is_empty())
    }

    /// "First Last", or the login when no name is set
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            self.login.clone()
        } else {
            full.to_string()
        }
    }
}

/// Identity-provider user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub status: UserStatus,

    pub profile: UserProfile,
}

impl User {
    pub fn new(id: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            id: id.into(),
            status: UserStatus::Active,
            profile,
        }
    }

    pub fn display_name(&self) -> String {
        self.profile.display_name()
    }
}

/// Group type as reported by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    /// Ordinary directory group
    #[default]
    OktaGroup,
    /// Group scoped to a single application
    AppGroup,
    /// Built-in group such as "Everyone"
    BuiltIn,
}

/// Directory group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,

    #[serde(rename = "type", default)]
    pub group_type: GroupType,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_type: GroupType::OktaGroup,
            name: name.into(),
            description: None,
        }
    }
}

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    #[default]
    Active,
    Inactive,
}

/// Application integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,

    /// Integration name (e.g. "github-app")
    pub name: String,

    /// Human-facing label (e.g. "GitHub Enterprise")
    pub label: String,

    #[serde(default)]
    pub status: AppStatus,

    #[serde(default)]
    pub sign_on_mode: String,
}

impl Application {
    pub fn new(id: impl Into<String>, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            status: AppStatus::Active,
            sign_on_mode: String::new(),
        }
    }

    pub fn with_status(mut self, status: AppStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == AppStatus::Active
    }
}
