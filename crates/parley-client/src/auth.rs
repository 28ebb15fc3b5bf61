//! Bearer token storage.
//!
//! The client reads the access token from a [`TokenStore`] before every
//! request and writes refreshed tokens back to it. Two stores are provided:
//! an in-memory store for tests and embedding, and a JSON file store that
//! persists `access_token`, `refresh_token` and `expires_in` between runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// Default token file name within the parley data directory.
pub const TOKEN_FILE: &str = "tokens.json";

/// Tokens held for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    /// Bearer token attached to every request.
    pub access_token: String,
    /// Token exchanged for a new access token after a 401.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds, as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl StoredTokens {
    /// Tokens with only an access token.
    pub fn access(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            refresh_token: None,
            expires_in: None,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }
}

/// Storage for the user's tokens.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Load the stored tokens, if any.
    async fn load(&self) -> Result<Option<StoredTokens>>;

    /// Replace the stored tokens.
    async fn save(&self, tokens: &StoredTokens) -> Result<()>;

    /// Remove any stored tokens.
    async fn clear(&self) -> Result<()>;
}

/// Shared handle to a token store.
pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// MemoryTokenStore
// ============================================================================

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<StoredTokens>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with tokens.
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<StoredTokens>> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// Token store backed by a JSON file, with an in-memory read cache.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<StoredTokens>>,
}

impl FileTokenStore {
    /// Store tokens in `data_dir/tokens.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(TOKEN_FILE))
    }

    /// Store tokens at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: RwLock::new(None),
        }
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<StoredTokens>> {
        {
            let cache = self.cached.read().await;
            if cache.is_some() {
                return Ok(cache.clone());
            }
        }

        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::TokenStore(format!("Failed to read token file: {}", e)))?;
        let tokens: StoredTokens = serde_json::from_str(&content)
            .map_err(|e| Error::TokenStore(format!("Failed to parse token file: {}", e)))?;

        *self.cached.write().await = Some(tokens.clone());
        Ok(Some(tokens))
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::TokenStore(format!("Failed to create token directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::TokenStore(format!("Failed to write token file: {}", e)))?;

        *self.cached.write().await = Some(tokens.clone());
        tracing::debug!(path = %self.path.display(), "Tokens saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| Error::TokenStore(format!("Failed to delete token file: {}", e)))?;
        }
        *self.cached.write().await = None;
        Ok(())
    }
}
