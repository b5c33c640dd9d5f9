//! Group rule expressions
//!
//! Group rules use a restricted attribute-equality language:
//!
//! ```text
//! user.<attribute> == "<value>"
//! ```
//!
//! Anything outside that form parses to [`RuleExpression::Unsupported`] and
//! never matches. Boolean combinators (AND/OR) and other operators are not
//! part of the language; adding them means adding variants to
//! [`RuleExpression`], not widening the keyword matching below.
//!
//! # Matching policy
//!
//! Only `department` and `title` take part in access matching, checked in
//! that order. When an expression mentions `department` and the user has a
//! department, the department decides the outcome and `title` is never
//! consulted.
//!
//! # Case and quoting
//!
//! Parsing is strict: the `user.` prefix and attribute names are
//! case-sensitive. [`render_rule`] is lenient about case, quote style and
//! surrounding text, so an expression can render as a sentence and still
//! evaluate to [`RuleOutcome::Unsupported`]:
//!
//! ```rust
//! use accesstrace_chains::rules::{render_rule, RuleEvaluator, RuleOutcome};
//! use accesstrace_core::UserProfile;
//!
//! let profile = UserProfile::new("sam@company.com").with_department("Sales");
//! let expr = "USER.Department=='Sales'";
//!
//! assert_eq!(render_rule(expr), r#"User department is "Sales""#);
//! assert_eq!(RuleEvaluator::new().evaluate(expr, &profile), RuleOutcome::Unsupported);
//! ```
//!
//! # Example
//!
//! ```rust
//! use accesstrace_chains::rules::{evaluate_rule, render_rule};
//! use accesstrace_core::UserProfile;
//!
//! let profile = UserProfile::new("john@company.com").with_department("Engineering");
//! let expr = r#"user.department == "Engineering""#;
//!
//! assert!(evaluate_rule(expr, &profile));
//! assert_eq!(render_rule(expr), r#"User department is "Engineering""#);
//! ```

mod expression;
mod render;

pub use expression::{
    evaluate_rule, MatchedAttribute, RuleEvaluator, RuleExpression, RuleOutcome,
};
pub use render::render_rule;
