//! Rule expression parsing and evaluation

use accesstrace_core::UserProfile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static ATTRIBUTE_EQUALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*user\.([A-Za-z_][A-Za-z0-9_]*)\s*==\s*(?:"([^"]*)"|'([^']*)')\s*$"#)
        .expect("attribute equality pattern is valid")
});

/// Parsed rule expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleExpression {
    /// `user.<attribute> == "<value>"`
    AttributeEquals { attribute: String, value: String },

    /// Anything the restricted grammar does not cover
    Unsupported { raw: String },
}

impl RuleExpression {
    /// Parse an expression. Never fails: unknown shapes become `Unsupported`.
    pub fn parse(expression: &str) -> Self {
        match ATTRIBUTE_EQUALS.captures(expression) {
            Some(caps) => {
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                RuleExpression::AttributeEquals {
                    attribute: caps[1].to_string(),
                    value: value.to_string(),
                }
            }
            None => RuleExpression::Unsupported {
                raw: expression.to_string(),
            },
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, RuleExpression::AttributeEquals { .. })
    }

    /// Attribute the expression compares, if supported
    pub fn attribute(&self) -> Option<&str> {
        match self {
            RuleExpression::AttributeEquals { attribute, .. } => Some(attribute),
            RuleExpression::Unsupported { .. } => None,
        }
    }
}

impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleExpression::AttributeEquals { attribute, value } => {
                write!(f, "user.{} == \"{}\"", attribute, value)
            }
            RuleExpression::Unsupported { raw } => f.write_str(raw),
        }
    }
}

/// Profile attribute that satisfied a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedAttribute {
    Department,
    Title,
}

impl MatchedAttribute {
    /// Keyword looked for in the expression text
    pub fn keyword(&self) -> &'static str {
        match self {
            MatchedAttribute::Department => "department",
            MatchedAttribute::Title => "title",
        }
    }

    fn profile_value<'a>(&self, profile: &'a UserProfile) -> Option<&'a str> {
        profile.attribute(self.keyword())
    }
}

/// Result of evaluating a rule against a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The rule explains membership through this attribute
    Matched { attribute: MatchedAttribute },

    /// Department/title were checked and did not match
    NotMatched,

    /// Well-formed, but compares an attribute access matching ignores
    NotEvaluated { attribute: String },

    /// Outside the restricted grammar
    Unsupported,
}

impl RuleOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, RuleOutcome::Matched { .. })
    }

    pub fn matched_attribute(&self) -> Option<MatchedAttribute> {
        match self {
            RuleOutcome::Matched { attribute } => Some(*attribute),
            _ => None,
        }
    }
}

/// Attribute-equality rule evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Keyword priority for access matching
    pub const MATCH_ORDER: [MatchedAttribute; 2] =
        [MatchedAttribute::Department, MatchedAttribute::Title];

    pub fn new() -> Self {
        Self
    }

    /// Evaluate `expression` against `profile`
    ///
    /// For each keyword in [`Self::MATCH_ORDER`]: if the expression text
    /// mentions the keyword and the profile carries that attribute, the
    /// outcome is decided by whether the quoted profile value appears
    /// verbatim in the expression. Later keywords are not consulted.
    pub fn evaluate(&self, expression: &str, profile: &UserProfile) -> RuleOutcome {
        let parsed = RuleExpression::parse(expression);
        let attribute = match &parsed {
            RuleExpression::AttributeEquals { attribute, .. } => attribute,
            RuleExpression::Unsupported { .. } => return RuleOutcome::Unsupported,
        };

        for candidate in Self::MATCH_ORDER {
            if !expression.contains(candidate.keyword()) {
                continue;
            }
            if let Some(value) = candidate.profile_value(profile) {
                let quoted = format!("\"{}\"", value);
                return if expression.contains(&quoted) {
                    RuleOutcome::Matched {
                        attribute: candidate,
                    }
                } else {
                    RuleOutcome::NotMatched
                };
            }
        }

        if Self::MATCH_ORDER.iter().any(|a| a.keyword() == attribute) {
            RuleOutcome::NotMatched
        } else {
            RuleOutcome::NotEvaluated {
                attribute: attribute.clone(),
            }
        }
    }

    pub fn matches(&self, expression: &str, profile: &UserProfile) -> bool {
        self.evaluate(expression, profile).is_match()
    }
}

/// Whether `expression` matches `profile` under the access matching policy
pub fn evaluate_rule(expression: &str, profile: &UserProfile) -> bool {
    RuleEvaluator::new().matches(expression, profile)
}
