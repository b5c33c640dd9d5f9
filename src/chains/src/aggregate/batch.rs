//! Batch chain resolution with per-item failure isolation

use crate::error::Result;
use crate::paths::{AccessChain, PathResolver};
use crate::rules::RuleEvaluator;
use crate::snapshot::dedup_ordered;
use accesstrace_core::{RelationshipIndex, User};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of resolving one item of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainOutcome {
    Resolved {
        chain: AccessChain,
    },
    /// `subject_id` is the application (per-user batch) or user
    /// (per-application batch) whose resolution failed
    Failed {
        #[serde(rename = "subjectId")]
        subject_id: String,
        error: String,
    },
}

impl ChainOutcome {
    pub fn chain(&self) -> Option<&AccessChain> {
        match self {
            ChainOutcome::Resolved { chain } => Some(chain),
            ChainOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChainOutcome::Failed { .. })
    }
}

/// Ordered per-item outcomes of a batch resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainBatch {
    pub outcomes: Vec<ChainOutcome>,
}

impl ChainBatch {
    /// Successfully resolved chains, in input order
    pub fn chains(&self) -> impl Iterator<Item = &AccessChain> {
        self.outcomes.iter().filter_map(ChainOutcome::chain)
    }

    pub fn into_chains(self) -> Vec<AccessChain> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ChainOutcome::Resolved { chain } => Some(chain),
                ChainOutcome::Failed { .. } => None,
            })
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.chains().count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Runs the path resolver across many user/application pairs
pub struct ChainAggregator<'a, I: RelationshipIndex + ?Sized> {
    index: &'a I,
    parallel: bool,
}

impl<'a, I: RelationshipIndex + ?Sized> ChainAggregator<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            parallel: false,
        }
    }

    /// Fan batches out over the rayon pool; output order is unchanged
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Applications `user_id` can reach: direct assignments first, then
    /// applications of each group in membership order, without repeats
    pub fn reachable_applications(&self, user_id: &str) -> Vec<String> {
        let direct = self.index.direct_applications_for_user(user_id);
        let via_groups = self
            .index
            .groups_for_user(user_id)
            .iter()
            .flat_map(|group_id| self.index.applications_for_group(group_id));

        dedup_ordered(direct.iter().chain(via_groups))
    }

    /// Users that can reach `application_id` according to the relationship
    /// data, in [`RelationshipIndex::related_user_ids`] order
    ///
    /// Ids with no user record are included so the batch reports them.
    pub fn users_reaching(&self, application_id: &str) -> Vec<String> {
        self.index
            .related_user_ids()
            .into_iter()
            .filter(|user_id| {
                self.index.has_direct_assignment(user_id, application_id)
                    || self
                        .index
                        .groups_for_user(user_id)
                        .iter()
                        .any(|group_id| self.index.group_grants(group_id, application_id))
            })
            .map(str::to_string)
            .collect()
    }

    /// Resolve a chain for every application the user can reach
    pub fn chains_for_user(&self, user_id: &str) -> Result<ChainBatch> {
        let resolver = PathResolver::new(self.index);
        self.chains_for_user_with(user_id, |u, a| resolver.resolve(u, a))
    }

    /// Like [`Self::chains_for_user`], resolving each pair through `resolve`
    ///
    /// # Errors
    ///
    /// Only an unknown `user_id` fails the call. Failures for individual
    /// applications are recorded as [`ChainOutcome::Failed`].
    pub fn chains_for_user_with<F>(&self, user_id: &str, resolve: F) -> Result<ChainBatch>
    where
        F: Fn(&str, &str) -> Result<AccessChain> + Sync + Send,
    {
        self.index.require_user(user_id)?;
        let applications = self.reachable_applications(user_id);
        debug!("Resolving {} chains for user {}", applications.len(), user_id);

        Ok(self.run(&applications, |application_id| {
            resolve(user_id, application_id)
        }))
    }

    /// Resolve a chain for every user that can reach the application
    pub fn chains_for_application(&self, application_id: &str) -> Result<ChainBatch> {
        let resolver = PathResolver::new(self.index);
        self.chains_for_application_with(application_id, |u, a| resolver.resolve(u, a))
    }

    /// Like [`Self::chains_for_application`], resolving each pair through
    /// `resolve`
    pub fn chains_for_application_with<F>(
        &self,
        application_id: &str,
        resolve: F,
    ) -> Result<ChainBatch>
    where
        F: Fn(&str, &str) -> Result<AccessChain> + Sync + Send,
    {
        self.index.require_application(application_id)?;
        let users = self.users_reaching(application_id);
        debug!(
            "Resolving {} chains for application {}",
            users.len(),
            application_id
        );

        Ok(self.run(&users, |user_id| resolve(user_id, application_id)))
    }

    fn run<F>(&self, subjects: &[String], resolve_one: F) -> ChainBatch
    where
        F: Fn(&str) -> Result<AccessChain> + Sync + Send,
    {
        let outcome = |subject_id: &String| match resolve_one(subject_id) {
            Ok(chain) => ChainOutcome::Resolved { chain },
            Err(e) => {
                warn!("Chain resolution failed for {}: {}", subject_id, e);
                ChainOutcome::Failed {
                    subject_id: subject_id.clone(),
                    error: e.to_string(),
                }
            }
        };

        let outcomes: Vec<ChainOutcome> = if self.parallel {
            subjects.par_iter().map(outcome).collect()
        } else {
            subjects.iter().map(outcome).collect()
        };

        ChainBatch { outcomes }
    }

    /// Users whose profile matches the rule's expression
    ///
    /// The rule's status is not consulted.
    pub fn users_matching_rule(&self, rule_id: &str) -> Result<Vec<User>> {
        let rule = self.index.require_rule(rule_id)?;
        let evaluator = RuleEvaluator::new();

        Ok(self
            .index
            .user_ids()
            .into_iter()
            .filter_map(|user_id| self.index.user(user_id))
            .filter(|user| evaluator.matches(&rule.expression, &user.profile))
            .cloned()
            .collect())
    }

    /// Every user mapped to the applications they can reach
    pub fn access_matrix(&self) -> BTreeMap<String, Vec<String>> {
        self.index
            .user_ids()
            .into_iter()
            .map(|user_id| (user_id.to_string(), self.reachable_applications(user_id)))
            .collect()
    }
}
