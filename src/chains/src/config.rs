//! Engine and server configuration

use crate::error::{ChainError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default cache TTL (60 seconds)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default maximum number of cached chains
pub const DEFAULT_MAX_CACHE_SIZE: usize = 10_000;

/// Default graph depth recorded when the caller does not pass one
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Access engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cache resolved chains per (user, application)
    pub enable_cache: bool,

    /// Time-to-live for cached chains
    pub cache_ttl: Duration,

    /// Maximum cache entries; inserts beyond this are skipped
    pub max_cache_size: usize,

    /// Fan batch resolutions out over the rayon pool
    pub parallel_batches: bool,

    /// Graph depth used by `build_access_graph` callers that pass none
    pub default_max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            parallel_batches: true,
            default_max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Configuration with caching turned off
    pub fn uncached() -> Self {
        Self {
            enable_cache: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.enable_cache && self.max_cache_size == 0 {
            return Err(ChainError::InvalidInput(
                "max_cache_size must be positive when caching is enabled".to_string(),
            ));
        }

        if self.default_max_depth == 0 {
            return Err(ChainError::InvalidInput(
                "default_max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration, loaded from the environment
///
/// - `PORT` - HTTP server port (default: 8080)
/// - `SNAPSHOT_PATH` - JSON snapshot to serve (default: bundled fixture)
/// - `CACHE_SIZE` - chain cache capacity (default: 10000)
/// - `CACHE_TTL` - chain cache TTL in seconds (default: 60)
/// - `PARALLEL_BATCHES` - "false" disables batch fan-out
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub snapshot_path: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            snapshot_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let snapshot_path = lookup("SNAPSHOT_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let max_cache_size = lookup("CACHE_SIZE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.engine.max_cache_size);

        let cache_ttl = lookup("CACHE_TTL")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.engine.cache_ttl);

        let parallel_batches = lookup("PARALLEL_BATCHES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.engine.parallel_batches);

        Self {
            port,
            snapshot_path,
            engine: EngineConfig {
                max_cache_size,
                cache_ttl,
                parallel_batches,
                ..defaults.engine
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enable_cache);
        assert_eq!(config.default_max_depth, 3);
    }

    #[test]
    fn test_invalid_config() {
        let config = EngineConfig {
            max_cache_size: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        // Zero size is fine when the cache is off
        let config = EngineConfig {
            max_cache_size: 0,
            ..EngineConfig::uncached()
        };
        assert!(config.validate().is_ok());

        let config = EngineConfig {
            default_max_depth: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_config_from_lookup() {
        let mut vars = HashMap::new();
        vars.insert("PORT", "9000");
        vars.insert("SNAPSHOT_PATH", "/tmp/org.json");
        vars.insert("CACHE_SIZE", "50");
        vars.insert("CACHE_TTL", "5");
        vars.insert("PARALLEL_BATCHES", "false");

        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 9000);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/org.json")));
        assert_eq!(config.engine.max_cache_size, 50);
        assert_eq!(config.engine.cache_ttl, Duration::from_secs(5));
        assert!(!config.engine.parallel_batches);
    }

    #[test]
    fn test_server_config_falls_back_on_garbage() {
        let config = ServerConfig::from_lookup(|k| match k {
            "PORT" => Some("not-a-port".to_string()),
            "CACHE_TTL" => Some("-3".to_string()),
            _ => None,
        });

        assert_eq!(config.port, 8080);
        assert_eq!(config.engine.cache_ttl, DEFAULT_CACHE_TTL);
        assert!(config.snapshot_path.is_none());
    }
}
