//! Talking-avatar session broker.
//!
//! Sits between application code and the avatar REST API:
//!
//! - [`TokenProvisioner`]: requests a backend-issued avatar token
//! - Avatar catalog: cached for five minutes, with a built-in fallback list
//! - Session broker: one cached session per avatar for thirty minutes,
//!   explicit close, and a local-only [`AvatarBroker::cleanup`]
//!
//! # Example
//!
//! ```no_run
//! use parley_broker::AvatarBroker;
//! use parley_client::ParleyClient;
//!
//! # async fn example() -> parley_broker::Result<()> {
//! let client = ParleyClient::builder()
//!     .base_url("http://localhost:8000")
//!     .auth_token("secret")
//!     .build()
//!     .expect("valid client config");
//! let broker = AvatarBroker::new(client);
//!
//! broker.initialize().await?;
//! let avatars = broker.talking_avatars_or_fallback().await;
//! let session = broker.create_session(&avatars[0].id).await?;
//! broker.close_session(&session.id).await?;
//! # Ok(())
//! # }
//! ```

mod broker;
mod config;
mod error;
mod fallback;
mod provisioner;

pub use broker::{AVATARS_KEY, AvatarBroker, CacheInfo, session_key};
pub use config::{BrokerConfig, DEFAULT_AVATAR_TTL, DEFAULT_SESSION_TTL};
pub use error::{Error, Result};
pub use fallback::fallback_avatars;
pub use provisioner::TokenProvisioner;
