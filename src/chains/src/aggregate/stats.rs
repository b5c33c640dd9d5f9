//! Summary statistics over resolved chains and rules

use super::batch::ChainBatch;
use crate::paths::{AccessChain, AccessKind};
use accesstrace_core::RelationshipIndex;
use serde::Serialize;

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Path complexity summary for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityStats {
    pub user_id: String,

    /// Applications with a resolved chain
    pub total_applications: usize,

    pub direct_access: usize,
    pub group_access: usize,
    pub rule_access: usize,

    /// Mean hop count, rounded to two decimals
    pub average_hops: f64,

    /// First chain with the highest hop count
    pub most_complex_chain: Option<AccessChain>,

    /// Applications whose chain could not be resolved
    pub failed_resolutions: usize,
}

impl ComplexityStats {
    pub fn from_batch(user_id: &str, batch: &ChainBatch) -> Self {
        let mut stats = Self {
            user_id: user_id.to_string(),
            total_applications: 0,
            direct_access: 0,
            group_access: 0,
            rule_access: 0,
            average_hops: 0.0,
            most_complex_chain: None,
            failed_resolutions: batch.failed_count(),
        };

        let mut total_hops = 0;
        let mut max_hops = 0;
        for chain in batch.chains() {
            stats.total_applications += 1;
            total_hops += chain.total_hops;

            match chain.access_kind() {
                AccessKind::Direct => stats.direct_access += 1,
                AccessKind::GroupBased => stats.group_access += 1,
                AccessKind::RuleBased => stats.rule_access += 1,
            }

            // strict: ties keep the earlier chain
            if chain.total_hops > max_hops {
                max_hops = chain.total_hops;
                stats.most_complex_chain = Some(chain.clone());
            }
        }

        if stats.total_applications > 0 {
            stats.average_hops = round2(total_hops as f64 / stats.total_applications as f64);
        }

        stats
    }
}

/// Rule inventory summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStatistics {
    pub total_rules: usize,
    pub active_rules: usize,
    pub inactive_rules: usize,
    pub rules_with_multiple_groups: usize,
    /// Mean target groups per rule, rounded to two decimals
    pub average_groups_per_rule: f64,
}

impl RuleStatistics {
    pub fn collect<I: RelationshipIndex + ?Sized>(index: &I) -> Self {
        let rules: Vec<_> = index
            .rule_ids()
            .into_iter()
            .filter_map(|id| index.rule(id))
            .collect();

        let total_rules = rules.len();
        let active_rules = rules.iter().filter(|r| r.is_active()).count();
        let target_total: usize = rules.iter().map(|r| r.target_group_ids.len()).sum();

        Self {
            total_rules,
            active_rules,
            inactive_rules: total_rules - active_rules,
            rules_with_multiple_groups: rules
                .iter()
                .filter(|r| r.target_group_ids.len() > 1)
                .count(),
            average_groups_per_rule: if total_rules == 0 {
                0.0
            } else {
                round2(target_total as f64 / total_rules as f64)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ChainOutcome;
    use crate::paths::AccessPathNode;
    use crate::snapshot::SnapshotBuilder;
    use accesstrace_core::{Application, Group, GroupRule, User, UserProfile};

    fn chain_with_hops(app: &str, groups: usize) -> AccessChain {
        let user = User::new("u1", UserProfile::new("u1@company.com"));
        let application = Application::new(app, app, app);
        let mut path = vec![AccessPathNode::user(&user)];
        for i in 0..groups {
            path.push(AccessPathNode::group(
                &Group::new(format!("g{}", i), "Group"),
                "Direct membership",
            ));
        }
        path.push(AccessPathNode::application(&application, "Direct assignment"));
        AccessChain::new(user, application, path)
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.754), 2.75);
        assert_eq!(round2(1.166_666), 1.17);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_complexity_from_batch() {
        let batch = ChainBatch {
            outcomes: vec![
                ChainOutcome::Resolved { chain: chain_with_hops("a1", 0) },
                ChainOutcome::Resolved { chain: chain_with_hops("a2", 1) },
                ChainOutcome::Resolved { chain: chain_with_hops("a3", 1) },
                ChainOutcome::Failed {
                    subject_id: "a4".to_string(),
                    error: "application not found: a4".to_string(),
                },
            ],
        };
        let stats = ComplexityStats::from_batch("u1", &batch);

        assert_eq!(stats.total_applications, 3);
        assert_eq!(stats.direct_access, 1);
        assert_eq!(stats.group_access, 2);
        assert_eq!(stats.rule_access, 0);
        assert_eq!(stats.average_hops, 1.67);
        assert_eq!(stats.failed_resolutions, 1);
        // a2 and a3 tie at 2 hops; the first wins
        assert_eq!(stats.most_complex_chain.unwrap().application.id, "a2");
    }

    #[test]
    fn test_complexity_of_empty_batch() {
        let stats = ComplexityStats::from_batch("u1", &ChainBatch::default());
        assert_eq!(stats.total_applications, 0);
        assert_eq!(stats.average_hops, 0.0);
        assert!(stats.most_complex_chain.is_none());
    }

    #[test]
    fn test_rule_statistics() {
        let snapshot = SnapshotBuilder::new()
            .rule(GroupRule::new("r1", "A", r#"user.title == "A""#, vec!["g1".into()]))
            .rule(GroupRule::new(
                "r2",
                "B",
                r#"user.title == "B""#,
                vec!["g1".into(), "g2".into()],
            ))
            .rule(GroupRule::new("r3", "C", r#"user.title == "C""#, vec![]).inactive())
            .build()
            .unwrap();
        let stats = RuleStatistics::collect(&snapshot);

        assert_eq!(stats.total_rules, 3);
        assert_eq!(stats.active_rules, 2);
        assert_eq!(stats.inactive_rules, 1);
        assert_eq!(stats.rules_with_multiple_groups, 1);
        assert_eq!(stats.average_groups_per_rule, 1.0);
    }

    #[test]
    fn test_rule_statistics_empty() {
        let snapshot = SnapshotBuilder::new().build().unwrap();
        let stats = RuleStatistics::collect(&snapshot);
        assert_eq!(stats.total_rules, 0);
        assert_eq!(stats.average_groups_per_rule, 0.0);
    }
}
