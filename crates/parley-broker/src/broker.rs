//! The avatar session broker.

use std::sync::Arc;

use parking_lot::Mutex;
use parley_cache::{CacheConfig, TtlCache};
use parley_client::{AvatarDescriptor, AvatarSession, ParleyClient, TokenGrant};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BrokerConfig;
use crate::error::{Error, Result};
use crate::fallback::fallback_avatars;
use crate::provisioner::TokenProvisioner;

/// Cache key of the avatar catalog.
pub const AVATARS_KEY: &str = "avatars";

/// Cache key of the session for an avatar.
pub fn session_key(avatar_id: &str) -> String {
    format!("session_{}", avatar_id)
}

/// Snapshot of the broker's caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// Entries in the avatar catalog cache (0 or 1).
    pub avatar_cache_size: usize,
    /// Cached sessions, one per avatar at most.
    pub session_cache_size: usize,
    /// ID of the most recently created session, if still tracked.
    pub current_session_id: Option<String>,
}

/// Brokers talking-avatar sessions for every caller in a process.
///
/// Clones share the same caches. Construct one per application and hand it
/// to consumers; tests build isolated instances.
///
/// - The avatar catalog is cached under one key for the avatar TTL.
/// - Sessions are cached per avatar id for the session TTL.
/// - Concurrent misses on the same key share a single backend request.
/// - Dropping entries (TTL expiry, [`cleanup`](Self::cleanup)) never closes
///   the remote session.
#[derive(Clone)]
pub struct AvatarBroker {
    inner: Arc<BrokerInner>,
}

struct BrokerInner {
    client: ParleyClient,
    provisioner: TokenProvisioner,
    avatars: TtlCache<Vec<AvatarDescriptor>, Error>,
    sessions: TtlCache<AvatarSession, Error>,
    current: Arc<Mutex<CurrentSession>>,
}

/// Last session created. A newer one replaces it without closing it.
#[derive(Default)]
struct CurrentSession {
    session: Option<AvatarSession>,
    /// Bumped by `cleanup`; creations started before it do not set `session`.
    generation: u64,
}

impl AvatarBroker {
    /// Create a broker with the default TTLs.
    pub fn new(client: ParleyClient) -> Self {
        Self::with_config(client, BrokerConfig::default())
    }

    /// Create a broker with explicit configuration.
    pub fn with_config(client: ParleyClient, config: BrokerConfig) -> Self {
        let avatars = TtlCache::new(
            CacheConfig::new()
                .with_ttl(config.avatar_ttl)
                .with_name("avatars"),
        );
        let sessions = TtlCache::new(
            CacheConfig::new()
                .with_ttl(config.session_ttl)
                .with_name("sessions"),
        );

        Self {
            inner: Arc::new(BrokerInner {
                provisioner: TokenProvisioner::new(client.clone()),
                client,
                avatars,
                sessions,
                current: Arc::new(Mutex::new(CurrentSession::default())),
            }),
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &ParleyClient {
        &self.inner.client
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Token
    // ─────────────────────────────────────────────────────────────────────────

    /// Request a backend-issued avatar token.
    pub async fn initialize(&self) -> Result<TokenGrant> {
        self.inner.provisioner.initialize().await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Avatar catalog
    // ─────────────────────────────────────────────────────────────────────────

    /// List talking avatars, served from cache while fresh.
    pub async fn talking_avatars(&self) -> Result<Vec<AvatarDescriptor>> {
        let client = self.inner.client.clone();

        self.inner
            .avatars
            .get_or_fetch(AVATARS_KEY, move || async move {
                let avatars = client.akool().talking_avatars().await?;
                debug!(count = avatars.len(), "Fetched talking avatars");
                Ok::<_, Error>(avatars)
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch talking avatars"))
    }

    /// List talking avatars, substituting the built-in list on any failure.
    pub async fn talking_avatars_or_fallback(&self) -> Vec<AvatarDescriptor> {
        match self.talking_avatars().await {
            Ok(avatars) => avatars,
            Err(_) => {
                info!("Using fallback avatar list");
                fallback_avatars()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a session for `avatar_id`, creating one if none is cached.
    ///
    /// The avatar id is passed to the backend as-is.
    pub async fn create_session(&self, avatar_id: &str) -> Result<AvatarSession> {
        let client = self.inner.client.clone();
        let current = Arc::clone(&self.inner.current);
        let avatar_id_owned = avatar_id.to_string();

        self.inner
            .sessions
            .get_or_fetch(&session_key(avatar_id), move || {
                let generation = current.lock().generation;
                async move {
                    let session = client.akool().create_session(&avatar_id_owned).await?;
                    info!(
                        avatar_id = %avatar_id_owned,
                        session_id = %session.id,
                        "Avatar session created"
                    );

                    let mut slot = current.lock();
                    if slot.generation != generation {
                        debug!(session_id = %session.id, "Broker cleaned up during creation, not tracking session");
                    } else if let Some(previous) = slot.session.replace(session.clone())
                        && previous.id != session.id
                    {
                        debug!(session_id = %previous.id, "Replaced current session without closing it");
                    }
                    drop(slot);

                    Ok::<_, Error>(session)
                }
            })
            .await
            .inspect_err(|e| warn!(avatar_id, error = %e, "Failed to create avatar session"))
    }

    /// Close a session on the backend and forget it locally.
    ///
    /// Returns `Ok(true)` once the backend accepts the close. On failure the
    /// local entry is kept.
    pub async fn close_session(&self, session_id: &str) -> Result<bool> {
        self.inner
            .client
            .akool()
            .close_session(session_id)
            .await
            .inspect_err(|e| warn!(session_id, error = %e, "Failed to close avatar session"))?;

        let removed = self.inner.sessions.remove_where(|s| s.id == session_id);
        {
            let mut current = self.inner.current.lock();
            if current.session.as_ref().is_some_and(|s| s.id == session_id) {
                current.session = None;
            }
        }

        info!(session_id, evicted = removed.len(), "Avatar session closed");
        Ok(true)
    }

    /// The most recently created session, if not closed or cleaned up.
    pub fn current_session(&self) -> Option<AvatarSession> {
        self.inner.current.lock().session.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Housekeeping
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop all cached avatars and sessions.
    ///
    /// Remote sessions are left to expire on the backend.
    pub fn cleanup(&self) {
        let pending =
            self.inner.sessions.stats().in_flight + self.inner.avatars.stats().in_flight;
        if pending > 0 {
            debug!(pending, "Cleaning up with loads in flight; their results will not be cached");
        }

        self.inner.avatars.clear();
        self.inner.sessions.clear();
        {
            let mut current = self.inner.current.lock();
            current.session = None;
            current.generation += 1;
        }
        info!("Avatar broker caches cleared");
    }

    /// Current cache sizes.
    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            avatar_cache_size: self.inner.avatars.len(),
            session_cache_size: self.inner.sessions.len(),
            current_session_id: self
                .inner
                .current
                .lock()
                .session
                .as_ref()
                .map(|s| s.id.clone()),
        }
    }
}
