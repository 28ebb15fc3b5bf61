//! Configuration for the TTL cache.

use std::time::Duration;

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for a [`TtlCache`](crate::TtlCache).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entries older than this are treated as stale and refetched.
    pub ttl: Duration,

    /// Name used in log output to tell caches apart.
    pub name: &'static str,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            name: "cache",
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL for cached entries.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the cache name used in logs.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}
