//! TTL cache with single-flight loading.
//!
//! This crate provides the caching layer used by the avatar broker:
//! - Per-entry timestamps checked lazily against a fixed TTL
//! - Single-flight loads so concurrent misses for one key issue one request
//! - Linear-scan removal by value for callers that only know a value's id
//!
//! # Example
//!
//! ```rust,ignore
//! use parley_cache::{CacheConfig, TtlCache};
//!
//! let cache: TtlCache<String, String> =
//!     TtlCache::new(CacheConfig::default().with_ttl(Duration::from_secs(300)));
//!
//! let value = cache
//!     .get_or_fetch("avatars", || async { Ok("loaded".to_string()) })
//!     .await?;
//! ```

mod cache;
mod config;

pub use cache::{CacheStats, TtlCache};
pub use config::{CacheConfig, DEFAULT_TTL};
