//! Access engine
//!
//! Ties the resolver, graph builder and aggregator to one immutable
//! relationship index, with optional chain caching.
//!
//! ```text
//! RelationshipIndex → RuleEvaluator → PathResolver → GraphBuilder
//!                                          ↓
//!                                   [ChainCache] → ChainAggregator
//! ```

use crate::aggregate::{ChainAggregator, ChainBatch, ComplexityStats, RuleStatistics};
use crate::cache::{CacheStats, ChainCache};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{GraphBuilder, GraphData};
use crate::paths::{AccessChain, AccessPathNode, PathResolver};
use crate::snapshot::Snapshot;
use accesstrace_core::{RelationshipIndex, User};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Access path engine over a point-in-time relationship snapshot
///
/// All operations are read-only, so one engine can be shared across
/// threads behind an `Arc`.
pub struct AccessEngine<I: RelationshipIndex + ?Sized = Snapshot> {
    index: Arc<I>,
    cache: Option<Arc<ChainCache>>,
    config: EngineConfig,
}

impl<I: RelationshipIndex + ?Sized> AccessEngine<I> {
    /// Create an engine over `index`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the configuration fails validation.
    pub fn new(index: Arc<I>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let cache = if config.enable_cache {
            Some(Arc::new(ChainCache::new(
                config.cache_ttl,
                config.max_cache_size,
            )))
        } else {
            None
        };

        info!(
            "AccessEngine initialized with cache={}, parallel_batches={}",
            config.enable_cache, config.parallel_batches
        );

        Ok(Self {
            index,
            cache,
            config,
        })
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn aggregator(&self) -> ChainAggregator<'_, I> {
        ChainAggregator::new(&*self.index).parallel(self.config.parallel_batches)
    }

    /// Resolve the single explanation of how `user_id` reaches
    /// `application_id`
    pub fn resolve_access_path(&self, user_id: &str, application_id: &str) -> Result<AccessChain> {
        if let Some(cache) = &self.cache {
            if let Some(chain) = cache.get(user_id, application_id) {
                debug!("Cache hit for {} -> {}", user_id, application_id);
                return Ok(chain);
            }
        }

        let chain = PathResolver::new(&*self.index).resolve(user_id, application_id)?;

        if let Some(cache) = &self.cache {
            cache.insert(&chain);
        }

        Ok(chain)
    }

    /// Build the explanatory graph around `user_id`
    ///
    /// `max_depth` defaults to the configured depth and is recorded in the
    /// graph metadata.
    pub fn build_access_graph(&self, user_id: &str, max_depth: Option<usize>) -> Result<GraphData> {
        let depth = max_depth.unwrap_or(self.config.default_max_depth);
        GraphBuilder::new(&*self.index).build(user_id, depth)
    }

    /// Chains for every application `user_id` reaches
    pub fn chains_for_user(&self, user_id: &str) -> Result<ChainBatch> {
        self.aggregator()
            .chains_for_user_with(user_id, |u, a| self.resolve_access_path(u, a))
    }

    /// Chains for every user reaching `application_id`
    pub fn chains_for_application(&self, application_id: &str) -> Result<ChainBatch> {
        self.aggregator()
            .chains_for_application_with(application_id, |u, a| self.resolve_access_path(u, a))
    }

    pub fn complexity_stats(&self, user_id: &str) -> Result<ComplexityStats> {
        let batch = self.chains_for_user(user_id)?;
        Ok(ComplexityStats::from_batch(user_id, &batch))
    }

    /// Explain why `user_id` belongs to `group_id`
    pub fn explain_group_membership(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<AccessPathNode>> {
        PathResolver::new(&*self.index).explain_group_membership(user_id, group_id)
    }

    pub fn rule_statistics(&self) -> RuleStatistics {
        RuleStatistics::collect(&*self.index)
    }

    pub fn users_matching_rule(&self, rule_id: &str) -> Result<Vec<User>> {
        self.aggregator().users_matching_rule(rule_id)
    }

    /// Every user mapped to the applications they reach
    pub fn access_matrix(&self) -> BTreeMap<String, Vec<String>> {
        self.aggregator().access_matrix()
    }

    /// Cache counters, or `None` when caching is off
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

impl AccessEngine<Snapshot> {
    /// Engine owning `snapshot`
    pub fn from_snapshot(snapshot: Snapshot, config: EngineConfig) -> Result<Self> {
        Self::new(Arc::new(snapshot), config)
    }
}
