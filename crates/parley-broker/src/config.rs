//! Configuration for the avatar broker.

use std::time::Duration;

/// Default lifetime of the cached avatar catalog.
pub const DEFAULT_AVATAR_TTL: Duration = Duration::from_secs(5 * 60);

/// Default lifetime of a cached session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Configuration for the avatar broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// How long the avatar catalog is served from cache.
    pub avatar_ttl: Duration,

    /// How long a created session is reused for its avatar.
    pub session_ttl: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            avatar_ttl: DEFAULT_AVATAR_TTL,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl BrokerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the avatar catalog TTL.
    pub fn with_avatar_ttl(mut self, ttl: Duration) -> Self {
        self.avatar_ttl = ttl;
        self
    }

    /// Set the session TTL.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}
