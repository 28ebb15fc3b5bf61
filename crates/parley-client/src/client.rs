//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use crate::api::AkoolApi;
use crate::auth::{MemoryTokenStore, SharedTokenStore, StoredTokens};
use crate::error::{Error, ErrorResponse, Result};
use crate::types::{RefreshRequest, RefreshResponse};

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default path of the token refresh endpoint, relative to `/api/`.
pub const DEFAULT_REFRESH_PATH: &str = "auth/token/refresh";

/// Avatar API client.
///
/// Every request carries `Authorization: Bearer <access_token>` from the
/// configured [`TokenStore`](crate::TokenStore). A 401 answer triggers one
/// refresh with the stored refresh token and one retry of the request.
///
/// # Example
///
/// ```no_run
/// use parley_client::ParleyClient;
///
/// # async fn example() -> parley_client::Result<()> {
/// let client = ParleyClient::builder()
///     .base_url("http://localhost:8000")
///     .auth_token("secret")
///     .build()?;
///
/// let avatars = client.akool().talking_avatars().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ParleyClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    /// HTTP client.
    http: reqwest::Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request timeout.
    timeout: Duration,
    /// Where bearer tokens come from.
    tokens: SharedTokenStore,
    /// Refresh endpoint path under `/api/`.
    refresh_path: String,
}

impl ParleyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Get the token store.
    pub fn token_store(&self) -> &SharedTokenStore {
        &self.inner.tokens
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the talking-avatar API.
    pub fn akool(&self) -> AkoolApi {
        AkoolApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("api/{}", path))
            .map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self.send(|http| http.get(url.clone())).await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self.send(|http| http.post(url.clone()).json(body)).await?;
        self.handle_response(response).await
    }

    /// Make a POST request without a body.
    pub(crate) async fn post_empty<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self.send(|http| http.post(url.clone())).await?;
        self.handle_response(response).await
    }

    /// Make a POST request whose response body is ignored.
    pub(crate) async fn post_discard<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self.send(|http| http.post(url.clone()).json(body)).await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(())
    }

    /// Send a request, refreshing the access token and retrying once on 401.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let response = self.send_authorized(&build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        if !self.refresh_tokens().await? {
            return Ok(response);
        }

        tracing::debug!("Retrying request with refreshed token");
        self.send_authorized(&build).await
    }

    async fn send_authorized<F>(&self, build: &F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut request = build(&self.inner.http).timeout(self.inner.timeout);
        if let Some(tokens) = self.inner.tokens.load().await? {
            request = request.bearer_auth(&tokens.access_token);
        }
        Ok(request.send().await?)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns `false` when there is nothing to refresh with.
    async fn refresh_tokens(&self) -> Result<bool> {
        let Some(current) = self.inner.tokens.load().await? else {
            return Ok(false);
        };
        let Some(refresh) = current.refresh_token.clone() else {
            return Ok(false);
        };

        tracing::info!("Access token rejected, refreshing");
        let url = self.url(&self.inner.refresh_path)?;
        let response = self
            .inner
            .http
            .post(url)
            .json(&RefreshRequest { refresh })
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(status, "Token refresh rejected, clearing stored tokens");
            self.inner.tokens.clear().await?;
            return Err(Error::Auth(format!("token refresh failed (Error {})", status)));
        }

        let refreshed: RefreshResponse = response.json().await?;
        let tokens = StoredTokens {
            access_token: refreshed.access,
            refresh_token: refreshed.refresh.or(current.refresh_token),
            expires_in: refreshed.expires_in.or(current.expires_in),
        };
        self.inner.tokens.save(&tokens).await?;
        tracing::info!("Token refreshed successfully");

        Ok(true)
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty());

        Error::api(status, message)
    }
}

/// Builder for creating a ParleyClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    token_store: Option<SharedTokenStore>,
    timeout: Duration,
    refresh_path: String,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            token_store: None,
            timeout: DEFAULT_TIMEOUT,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            user_agent: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a fixed access token held in memory.
    ///
    /// Ignored when a token store is also set.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Read and write tokens through the given store.
    pub fn token_store(mut self, store: SharedTokenStore) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the refresh endpoint path (relative to `/api/`).
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ParleyClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("parley-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(Error::Http)?;

        let tokens: SharedTokenStore = match (self.token_store, self.auth_token) {
            (Some(store), _) => store,
            (None, Some(token)) => Arc::new(MemoryTokenStore::with_tokens(StoredTokens::access(
                token,
            ))),
            (None, None) => Arc::new(MemoryTokenStore::new()),
        };

        Ok(ParleyClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                tokens,
                refresh_path: self.refresh_path,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = ClientBuilder::new().base_url("not a url").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        let url = client.url("akool/talking-avatars").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/akool/talking-avatars");

        let url = client.url("/akool/create-session").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/akool/create-session");
    }

    #[test]
    fn test_url_building_keeps_base_path() {
        let client = ClientBuilder::new()
            .base_url("https://example.com/platform")
            .build()
            .unwrap();

        let url = client.url("akool/generate-token").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/platform/api/akool/generate-token"
        );
    }

    #[tokio::test]
    async fn test_auth_token_seeds_memory_store() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .auth_token("secret")
            .build()
            .unwrap();

        let tokens = client.token_store().load().await.unwrap();
        assert_eq!(tokens, Some(StoredTokens::access("secret")));
    }
}
