//! Talking-avatar API.

use crate::client::ParleyClient;
use crate::error::Result;
use crate::types::{
    AvatarDescriptor, AvatarListResponse, AvatarSession, CloseSessionRequest,
    CreateSessionRequest, CreateSessionResponse, TokenGrant,
};

/// Talking-avatar API client.
///
/// Thin wrappers over the four `akool/*` endpoints; no caching happens here.
pub struct AkoolApi {
    client: ParleyClient,
}

impl AkoolApi {
    pub(crate) fn new(client: ParleyClient) -> Self {
        Self { client }
    }

    /// Ask the backend to issue an avatar API token.
    pub async fn generate_token(&self) -> Result<TokenGrant> {
        self.client.post_empty("akool/generate-token").await
    }

    /// Fetch the avatar list in whatever envelope the backend used.
    pub async fn talking_avatars_raw(&self) -> Result<AvatarListResponse> {
        self.client.get("akool/talking-avatars").await
    }

    /// Fetch the avatar list, flattened.
    pub async fn talking_avatars(&self) -> Result<Vec<AvatarDescriptor>> {
        Ok(self.talking_avatars_raw().await?.into_avatars())
    }

    /// Create a talking-avatar session.
    pub async fn create_session(&self, avatar_id: &str) -> Result<AvatarSession> {
        let request = CreateSessionRequest {
            avatar_id: avatar_id.to_string(),
        };
        let response: CreateSessionResponse =
            self.client.post("akool/create-session", &request).await?;
        Ok(response.into_session())
    }

    /// Close a session. The response body is ignored.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        let request = CloseSessionRequest {
            id: session_id.to_string(),
        };
        self.client.post_discard("akool/close-session", &request).await
    }
}
