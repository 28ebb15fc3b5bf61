//! HTTP client SDK for the talking-avatar REST API.
//!
//! This crate provides a typed client for the backend's `akool/*` endpoints,
//! served under `/api/`.
//!
//! # Example
//!
//! ```no_run
//! use parley_client::{ParleyClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = ParleyClient::builder()
//!     .base_url("http://localhost:8000")
//!     .auth_token("secret")
//!     .build()?;
//!
//! let grant = client.akool().generate_token().await?;
//! println!("Token: {}", grant.token);
//!
//! let session = client.akool().create_session("avatar_1001").await?;
//! client.akool().close_session(&session.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Authentication
//!
//! Tokens are read from a [`TokenStore`] before each request. When the
//! backend answers 401 and a refresh token is stored, the client refreshes
//! once and retries the request.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use api::AkoolApi;
pub use auth::{FileTokenStore, MemoryTokenStore, SharedTokenStore, StoredTokens, TokenStore};
pub use client::{ClientBuilder, DEFAULT_REFRESH_PATH, DEFAULT_TIMEOUT, ParleyClient};
pub use error::{Error, Result};
pub use types::*;
