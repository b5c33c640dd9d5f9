//! Chain aggregation
//!
//! Runs the path resolver across every application a user reaches, or every
//! user reaching an application, and summarizes the results. A failure for
//! one pair never aborts the batch; it is kept as a
//! [`ChainOutcome::Failed`] item so callers can tell "nothing reachable"
//! apart from "errors occurred".

mod batch;
mod stats;

pub use batch::{ChainAggregator, ChainBatch, ChainOutcome};
pub use stats::{ComplexityStats, RuleStatistics};
