//! Keyed TTL cache with lazy expiry and single-flight loading.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;

/// Entry stored in the cache.
#[derive(Debug)]
struct CacheEntry<V> {
    data: V,
    cached_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(data: V) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
        }
    }

    /// An entry is fresh while its age is strictly below the TTL.
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// A load shared by every caller that missed the cache for the same key.
type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// Inner state protected by the mutex.
struct CacheInner<V, E> {
    /// Stored entries, keyed by cache key.
    entries: HashMap<String, CacheEntry<V>>,

    /// Loads currently in progress, tagged with a flight id.
    flights: HashMap<String, (u64, Flight<V, E>)>,

    /// Source of flight ids.
    next_flight: u64,

    /// Bumped by `clear`; loads started under an older generation are not stored.
    generation: u64,
}

impl<V: Clone, E> CacheInner<V, E> {
    /// Return the value for `key` if fresh, evicting it if stale.
    fn fresh_value(&mut self, key: &str, ttl: Duration) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(ttl) => Some(entry.data.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }
}

/// TTL cache keyed by string.
///
/// This cache provides:
/// - Lazy expiry: staleness is checked on access, there is no sweeper task
/// - Single-flight loading via [`TtlCache::get_or_fetch`]: concurrent misses
///   for one key share a single load
/// - Cheap cloning: clones share the same storage
///
/// `E` is the error type produced by loads; it must be `Clone` so that every
/// caller joined to a failing load can receive it.
pub struct TtlCache<V, E> {
    inner: Arc<Mutex<CacheInner<V, E>>>,
    config: CacheConfig,
}

impl<V, E> TtlCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        let inner = CacheInner {
            entries: HashMap::new(),
            flights: HashMap::new(),
            next_flight: 0,
            generation: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            config,
        }
    }

    /// Number of stored entries.
    ///
    /// Stale entries count until they are next accessed.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Get a fresh value. A stale entry is evicted and `None` returned.
    #[cfg(test)]
    fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let value = inner.fresh_value(key, self.config.ttl);
        trace!(cache = self.config.name, key, hit = value.is_some(), "Cache lookup");
        value
    }

    /// Store a value, replacing any previous entry for the key.
    #[cfg(test)]
    fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.inner.lock();
        trace!(cache = self.config.name, key = %key, "Cache insert");
        inner.entries.insert(key, CacheEntry::new(value));
    }

    /// Remove every entry whose value matches the predicate.
    ///
    /// This is a linear scan over all entries.
    pub fn remove_where<P>(&self, mut predicate: P) -> Vec<(String, V)>
    where
        P: FnMut(&V) -> bool,
    {
        let mut inner = self.inner.lock();
        let keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| predicate(&entry.data))
            .map(|(key, _)| key.clone())
            .collect();

        keys.into_iter()
            .filter_map(|key| inner.entries.remove(&key).map(|e| (key, e.data)))
            .collect()
    }

    /// Drop every entry and forget in-flight loads.
    ///
    /// Loads already running still complete for their callers, but their
    /// results are not stored.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.entries.len();
        inner.entries.clear();
        inner.flights.clear();
        inner.generation += 1;
        debug!(cache = self.config.name, dropped, "Cache cleared");
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            in_flight: inner.flights.len(),
            ttl: self.config.ttl,
        }
    }

    /// Return the fresh value for `key`, or load it with `fetch`.
    ///
    /// Concurrent callers that miss on the same key await one shared load;
    /// `fetch` is only invoked by the caller that starts it. A successful
    /// result is stored before the load is retired, so a caller arriving
    /// after completion sees the cached value. Errors are returned to every
    /// waiter and never cached.
    ///
    /// `fetch` is called while the cache lock is held and must not touch
    /// this cache; the future it returns may.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let flight = {
            let mut inner = self.inner.lock();

            if let Some(value) = inner.fresh_value(key, self.config.ttl) {
                trace!(cache = self.config.name, key, "Cache hit");
                return Ok(value);
            }

            if let Some((_, flight)) = inner.flights.get(key) {
                debug!(cache = self.config.name, key, "Joining in-flight load");
                flight.clone()
            } else {
                debug!(cache = self.config.name, key, "Cache miss, loading");
                let id = inner.next_flight;
                inner.next_flight += 1;
                let flight = self.start_flight(key, id, inner.generation, fetch());
                inner.flights.insert(key.to_string(), (id, flight.clone()));
                flight
            }
        };

        flight.await
    }

    fn start_flight<Fut>(&self, key: &str, id: u64, generation: u64, load: Fut) -> Flight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let shared = Arc::clone(&self.inner);
        let key = key.to_string();

        async move {
            let result = load.await;

            let mut inner = shared.lock();
            if inner.flights.get(&key).is_some_and(|(fid, _)| *fid == id) {
                inner.flights.remove(&key);
            }
            if let Ok(value) = &result
                && inner.generation == generation
            {
                inner.entries.insert(key, CacheEntry::new(value.clone()));
            }

            result
        }
        .boxed()
        .shared()
    }
}

impl<V, E> Clone for TtlCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of stored entries.
    pub size: usize,

    /// Number of loads in progress.
    pub in_flight: usize,

    /// Configured time-to-live.
    pub ttl: Duration,
}
