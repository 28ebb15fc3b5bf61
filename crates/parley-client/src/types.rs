//! Request and response types for the avatar API.
//!
//! These types mirror the backend's API contract.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

/// Token issued by the avatar provisioning endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Short-lived avatar API token.
    pub token: String,
}

/// Request to exchange a refresh token for a new access token.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    /// Stored refresh token.
    pub refresh: String,
}

/// Response from the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    #[serde(alias = "access_token")]
    pub access: String,
    /// Rotated refresh token, when the backend rotates them.
    #[serde(default, alias = "refresh_token")]
    pub refresh: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Avatars
// ─────────────────────────────────────────────────────────────────────────────

/// A selectable remote avatar persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    /// Avatar ID.
    #[serde(alias = "avatar_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Preview image URL.
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl AvatarDescriptor {
    /// Create a descriptor with no preview.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            preview_url: None,
        }
    }
}

/// Paged avatar list: `{ result, count }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarPage {
    /// Avatars on this page.
    pub result: Vec<AvatarDescriptor>,
    /// Total count reported by the backend.
    #[serde(default)]
    pub count: Option<u64>,
}

/// Every envelope the avatar list endpoint is known to return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AvatarListResponse {
    /// `[ ... ]`
    Bare(Vec<AvatarDescriptor>),
    /// `{ "result": [...], "count": n }`
    Paged(AvatarPage),
    /// `{ "data": { "result": [...], "count": n } }`
    NestedPage { data: AvatarPage },
    /// `{ "data": [...] }`
    Data { data: Vec<AvatarDescriptor> },
}

impl AvatarListResponse {
    /// Flatten the envelope into the list of avatars.
    pub fn into_avatars(self) -> Vec<AvatarDescriptor> {
        match self {
            AvatarListResponse::Bare(avatars) => avatars,
            AvatarListResponse::Paged(page) => page.result,
            AvatarListResponse::NestedPage { data } => data.result,
            AvatarListResponse::Data { data } => data,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a talking-avatar session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Avatar to render. Passed through unvalidated.
    pub avatar_id: String,
}

/// Request to close a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseSessionRequest {
    /// Session ID.
    pub id: String,
}

/// An active remote avatar rendering session.
///
/// Fields assigned by the backend beyond `id` and `avatar_id` are kept in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarSession {
    /// Session ID.
    pub id: String,
    /// Avatar the session renders.
    #[serde(default, alias = "avatarId")]
    pub avatar_id: String,
    /// Remaining remote-assigned fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Create-session response: `{ "session": {...} }` or the bare session.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreateSessionResponse {
    /// Wrapped in a `session` field.
    Wrapped { session: AvatarSession },
    /// The session object itself.
    Bare(AvatarSession),
}

impl CreateSessionResponse {
    /// Unwrap the session.
    pub fn into_session(self) -> AvatarSession {
        match self {
            CreateSessionResponse::Wrapped { session } => session,
            CreateSessionResponse::Bare(session) => session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expected() -> Vec<AvatarDescriptor> {
        vec![
            AvatarDescriptor {
                id: "avatar_1001".into(),
                name: "Maya".into(),
                preview_url: Some("https://cdn.example.com/maya.png".into()),
            },
            AvatarDescriptor::new("avatar_1002", "Theo"),
        ]
    }

    fn items() -> serde_json::Value {
        json!([
            { "id": "avatar_1001", "name": "Maya", "preview_url": "https://cdn.example.com/maya.png" },
            { "id": "avatar_1002", "name": "Theo", "preview_url": null }
        ])
    }

    #[test]
    fn test_every_envelope_flattens_to_same_list() {
        let shapes = [
            items(),
            json!({ "result": items(), "count": 2 }),
            json!({ "data": { "result": items(), "count": 2 } }),
            json!({ "data": items() }),
        ];

        for shape in shapes {
            let parsed: AvatarListResponse = serde_json::from_value(shape.clone()).unwrap();
            assert_eq!(parsed.into_avatars(), expected(), "shape: {}", shape);
        }
    }

    #[test]
    fn test_avatar_id_spelling_in_every_envelope() {
        let snake = json!([
            { "avatar_id": "avatar_1001", "name": "Maya", "preview_url": "https://cdn.example.com/maya.png" },
            { "avatar_id": "avatar_1002", "name": "Theo" }
        ]);
        let shapes = [
            snake.clone(),
            json!({ "result": snake.clone(), "count": 2 }),
            json!({ "data": { "result": snake.clone(), "count": 2 } }),
            json!({ "data": snake }),
        ];

        for shape in shapes {
            let parsed: AvatarListResponse = serde_json::from_value(shape.clone()).unwrap();
            assert_eq!(parsed.into_avatars(), expected(), "shape: {}", shape);
        }
    }

    #[test]
    fn test_paged_envelope_without_count() {
        let parsed: AvatarListResponse =
            serde_json::from_value(json!({ "result": items() })).unwrap();
        assert!(matches!(parsed, AvatarListResponse::Paged(_)));
        assert_eq!(parsed.into_avatars().len(), 2);
    }

    #[test]
    fn test_unknown_envelope_is_rejected() {
        let result: Result<AvatarListResponse, _> =
            serde_json::from_value(json!({ "avatars": items() }));
        assert!(result.is_err());
    }

    #[test]
    fn test_session_keeps_remote_fields() {
        let session: AvatarSession = serde_json::from_value(json!({
            "id": "sess_1",
            "avatar_id": "avatar_1001",
            "stream_url": "wss://stream.example.com/sess_1",
            "credentials": { "agora_uid": 42 }
        }))
        .unwrap();

        assert_eq!(session.id, "sess_1");
        assert_eq!(session.avatar_id, "avatar_1001");
        assert_eq!(
            session.extra.get("stream_url"),
            Some(&json!("wss://stream.example.com/sess_1"))
        );
        assert!(session.extra.contains_key("credentials"));
    }

    #[test]
    fn test_session_accepts_camel_case_avatar_id() {
        let session: AvatarSession =
            serde_json::from_value(json!({ "id": "sess_2", "avatarId": "avatar_1002" })).unwrap();
        assert_eq!(session.avatar_id, "avatar_1002");
    }

    #[test]
    fn test_create_session_response_shapes() {
        let wrapped: CreateSessionResponse = serde_json::from_value(json!({
            "session": { "id": "sess_1", "avatar_id": "avatar_1001" }
        }))
        .unwrap();
        let bare: CreateSessionResponse =
            serde_json::from_value(json!({ "id": "sess_1", "avatar_id": "avatar_1001" })).unwrap();

        assert_eq!(wrapped.into_session(), bare.into_session());
    }

    #[test]
    fn test_refresh_response_aliases() {
        let short: RefreshResponse =
            serde_json::from_value(json!({ "access": "a1", "refresh": "r1" })).unwrap();
        let long: RefreshResponse = serde_json::from_value(
            json!({ "access_token": "a2", "refresh_token": "r2", "expires_in": 3600 }),
        )
        .unwrap();

        assert_eq!(short.access, "a1");
        assert_eq!(short.refresh.as_deref(), Some("r1"));
        assert_eq!(long.access, "a2");
        assert_eq!(long.expires_in, Some(3600));
    }
}
