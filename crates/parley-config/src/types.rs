//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [server]
//! url = "https://careers.example.com"
//! timeout_secs = 30
//! refresh_path = "auth/token/refresh"
//!
//! [cache]
//! avatar_ttl_secs = 300
//! session_ttl_secs = 1800
//!
//! [auth]
//! token_file = "~/.config/parley/tokens.json"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default backend URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default refresh endpoint, relative to `/api/`.
pub const DEFAULT_REFRESH_PATH: &str = "auth/token/refresh";

/// Avatar catalog entries go stale after five minutes.
pub const DEFAULT_AVATAR_TTL_SECS: u64 = 5 * 60;

/// Cached sessions go stale after thirty minutes.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    /// Backend connection settings.
    pub server: Option<ServerConfig>,

    /// Cache lifetimes.
    pub cache: Option<CacheSection>,

    /// Token persistence.
    pub auth: Option<AuthSection>,
}

impl ParleyConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: ParleyConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.cache.is_some() {
            self.cache = other.cache;
        }
        if other.auth.is_some() {
            self.auth = other.auth;
        }
    }

    /// Server settings, falling back to defaults.
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Cache settings, falling back to defaults.
    pub fn cache(&self) -> CacheSection {
        self.cache.clone().unwrap_or_default()
    }

    /// Auth settings, falling back to defaults.
    pub fn auth(&self) -> AuthSection {
        self.auth.clone().unwrap_or_default()
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        let server = self.server();
        url::Url::parse(&server.url).map_err(|e| ConfigError::Invalid {
            field: "server.url".to_string(),
            reason: e.to_string(),
        })?;
        if server.timeout_secs == 0 {
            return Err(invalid("server.timeout_secs", "must be greater than zero"));
        }

        let cache = self.cache();
        if cache.avatar_ttl_secs == 0 {
            return Err(invalid("cache.avatar_ttl_secs", "must be greater than zero"));
        }
        if cache.session_ttl_secs == 0 {
            return Err(invalid("cache.session_ttl_secs", "must be greater than zero"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL; API calls go to `<url>/api/...`.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Token refresh endpoint, relative to `/api/`.
    pub refresh_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cache lifetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Seconds before the avatar catalog is refetched.
    pub avatar_ttl_secs: u64,
    /// Seconds before a cached session is replaced by a new one.
    pub session_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            avatar_ttl_secs: DEFAULT_AVATAR_TTL_SECS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl CacheSection {
    /// Avatar catalog TTL.
    pub fn avatar_ttl(&self) -> Duration {
        Duration::from_secs(self.avatar_ttl_secs)
    }

    /// Session TTL.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Token persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Token file path. Defaults to `tokens.json` in the config directory.
    pub token_file: Option<PathBuf>,
}
