//! Shared fixtures for integration tests

#![allow(dead_code)]

use accesstrace_chains::{AccessEngine, EngineConfig, Snapshot};

pub const ORG_SNAPSHOT: &str = include_str!("../../fixtures/org_snapshot.json");

pub fn org_snapshot() -> Snapshot {
    Snapshot::from_json_str(ORG_SNAPSHOT).expect("bundled fixture parses")
}

pub fn org_engine() -> AccessEngine {
    AccessEngine::from_snapshot(org_snapshot(), EngineConfig::default()).expect("valid engine")
}

pub fn uncached_engine() -> AccessEngine {
    AccessEngine::from_snapshot(org_snapshot(), EngineConfig::uncached()).expect("valid engine")
}
