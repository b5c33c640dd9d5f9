//! Resolved chain cache
//!
//! The engine's snapshot never changes after construction, so a chain
//! resolved for (user, application) stays valid until its TTL lapses. The
//! TTL bounds memory held by long-running servers rather than staleness.

use crate::paths::AccessChain;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry {
    chain: AccessChain,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Cache performance counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Expired entries encountered on lookup
    pub expirations: usize,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe (user, application) → [`AccessChain`] cache
#[derive(Debug)]
pub struct ChainCache {
    entries: DashMap<(String, String), CacheEntry>,
    ttl: Duration,
    max_size: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    expirations: AtomicUsize,
}

impl ChainCache {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_size,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            expirations: AtomicUsize::new(0),
        }
    }

    /// Look up a live entry, counting the hit or miss
    pub fn get(&self, user_id: &str, application_id: &str) -> Option<AccessChain> {
        let key = (user_id.to_string(), application_id.to_string());

        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_expired(self.ttl) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.chain.clone());
            }
            drop(entry);
            self.entries.remove(&key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a chain; skipped when the cache is full
    pub fn insert(&self, chain: &AccessChain) {
        if self.entries.len() >= self.max_size {
            self.cleanup_expired();
            if self.entries.len() >= self.max_size {
                return;
            }
        }

        self.entries.insert(
            (chain.user.id.clone(), chain.application.id.clone()),
            CacheEntry {
                chain: chain.clone(),
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::AccessPathNode;
    use accesstrace_core::{Application, User, UserProfile};
    use std::sync::Arc;
    use std::thread;

    fn chain(user: &str, app: &str) -> AccessChain {
        let user = User::new(user, UserProfile::new(format!("{}@company.com", user)));
        let path = vec![AccessPathNode::user(&user)];
        AccessChain::new(user, Application::new(app, app, app), path)
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ChainCache::new(Duration::from_secs(60), 10);

        assert!(cache.get("u1", "a1").is_none());
        cache.insert(&chain("u1", "a1"));
        assert_eq!(cache.get("u1", "a1").unwrap().user.id, "u1");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expiration() {
        let cache = ChainCache::new(Duration::from_millis(20), 10);
        cache.insert(&chain("u1", "a1"));

        thread::sleep(Duration::from_millis(50));

        assert!(cache.get("u1", "a1").is_none());
        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_size_cap() {
        let cache = ChainCache::new(Duration::from_secs(60), 2);
        cache.insert(&chain("u1", "a1"));
        cache.insert(&chain("u1", "a2"));
        cache.insert(&chain("u1", "a3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("u1", "a3").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = ChainCache::new(Duration::from_secs(60), 10);
        cache.insert(&chain("u1", "a1"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ChainCache::new(Duration::from_secs(60), 100));
        let mut handles = vec![];

        for i in 0..10 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                let app = format!("a{}", i);
                cache.insert(&chain("u1", &app));
                cache.get("u1", &app).is_some()
            }));
        }

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cache.stats().hits, 10);
    }
}
