//! CLI command handlers.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use parley_broker::{AvatarBroker, BrokerConfig};
use parley_client::{FileTokenStore, MemoryTokenStore, ParleyClient, SharedTokenStore};
use parley_config::LoadedConfig;

pub mod auth;
pub mod avatars;
pub mod config;
pub mod session;
pub mod token;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Backend URL to connect to.
    pub server_url: String,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Resolved configuration.
    pub config: LoadedConfig,
}

impl Context {
    /// Token store backing this invocation.
    pub fn token_store(&self) -> SharedTokenStore {
        match self.config.token_file() {
            Some(path) => Arc::new(FileTokenStore::with_path(path)),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Build an API client from the resolved settings.
    pub fn client(&self) -> Result<ParleyClient> {
        let server = self.config.config.server();
        ParleyClient::builder()
            .base_url(&self.server_url)
            .timeout(server.timeout())
            .refresh_path(server.refresh_path)
            .token_store(self.token_store())
            .build()
            .with_context(|| format!("Invalid server URL: {}", self.server_url))
    }

    /// Build a broker from the resolved settings.
    pub fn broker(&self) -> Result<AvatarBroker> {
        let cache = self.config.config.cache();
        let config = BrokerConfig::new()
            .with_avatar_ttl(cache.avatar_ttl())
            .with_session_ttl(cache.session_ttl());
        Ok(AvatarBroker::with_config(self.client()?, config))
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
