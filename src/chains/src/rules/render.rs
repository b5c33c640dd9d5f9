//! Human-readable rendering of rule expressions

use once_cell::sync::Lazy;
use regex::Regex;

/// (attribute, sentence prefix) pairs, tried in order
const TEMPLATES: [(&str, &str); 6] = [
    ("department", "User department is"),
    ("title", "User title is"),
    ("manager", "User manager is"),
    ("employeeType", "User employee type is"),
    ("costCenter", "User cost center is"),
    ("division", "User division is"),
];

static PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TEMPLATES
        .iter()
        .map(|(attribute, prefix)| {
            let pattern = format!(r#"(?i)user\.{}\s*==\s*["']([^"']+)["']"#, attribute);
            let regex = Regex::new(&pattern).expect("rule template pattern is valid");
            (regex, *prefix)
        })
        .collect()
});

/// Render a rule expression as a sentence
///
/// Known attribute-equality shapes map to a fixed template, e.g.
/// `user.title == "CEO"` becomes `User title is "CEO"`. Anything else is
/// returned unchanged. Matching ignores case and quote style, unlike
/// [`RuleExpression::parse`](crate::rules::RuleExpression::parse).
pub fn render_rule(expression: &str) -> String {
    for (regex, prefix) in PATTERNS.iter() {
        if let Some(caps) = regex.captures(expression) {
            return format!("{} \"{}\"", prefix, &caps[1]);
        }
    }
    expression.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_known_templates() {
        let cases = [
            (r#"user.department == "Engineering""#, r#"User department is "Engineering""#),
            (r#"user.title == "DevOps Engineer""#, r#"User title is "DevOps Engineer""#),
            (r#"user.manager == "jane""#, r#"User manager is "jane""#),
            (r#"user.employeeType == "Contractor""#, r#"User employee type is "Contractor""#),
            (r#"user.costCenter == "CC-7""#, r#"User cost center is "CC-7""#),
            (r#"user.division == "EMEA""#, r#"User division is "EMEA""#),
        ];

        for (expr, expected) in cases {
            assert_eq!(render_rule(expr), expected);
        }
    }

    #[test]
    fn test_render_is_lenient_about_quotes_and_case() {
        assert_eq!(render_rule("USER.Department=='Sales'"), r#"User department is "Sales""#);
    }

    #[test]
    fn test_lenient_render_does_not_widen_evaluation() {
        use crate::rules::{RuleEvaluator, RuleOutcome};
        use accesstrace_core::UserProfile;

        let profile = UserProfile::new("sam@company.com").with_department("Sales");
        let expr = "USER.Department=='Sales'";

        assert_eq!(render_rule(expr), r#"User department is "Sales""#);
        assert_eq!(RuleEvaluator::new().evaluate(expr, &profile), RuleOutcome::Unsupported);
        assert!(RuleEvaluator::new().matches(r#"user.department == "Sales""#, &profile));
    }

    #[test]
    fn test_department_template_wins() {
        let expr = r#"user.department == "HR" AND user.title == "Manager""#;
        assert_eq!(render_rule(expr), r#"User department is "HR""#);
    }

    #[test]
    fn test_unknown_expression_returned_verbatim() {
        let expr = r#"user.location == "Berlin""#;
        assert_eq!(render_rule(expr), expr);
        assert_eq!(render_rule(""), "");
    }
}
