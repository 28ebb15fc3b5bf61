//! HTTP-level tests for the talking-avatar client against a mock backend.

use std::sync::Arc;

use parley_client::{Error, MemoryTokenStore, ParleyClient, StoredTokens, TokenStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> ParleyClient {
    ParleyClient::builder()
        .base_url(server.uri())
        .token_store(store)
        .build()
        .unwrap()
}

fn store_with(access: &str, refresh: Option<&str>) -> Arc<MemoryTokenStore> {
    let mut tokens = StoredTokens::access(access);
    if let Some(refresh) = refresh {
        tokens = tokens.with_refresh(refresh);
    }
    Arc::new(MemoryTokenStore::with_tokens(tokens))
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_token_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/generate-token"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "akool-123" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("user-token", None));
    let grant = client.akool().generate_token().await.unwrap();

    assert_eq!(grant.token, "akool-123");
}

#[tokio::test]
async fn test_talking_avatars_nested_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/akool/talking-avatars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "result": [
                    { "id": "avatar_1001", "name": "Maya", "preview_url": null },
                    { "id": "avatar_1002", "name": "Theo" }
                ],
                "count": 2
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    let avatars = client.akool().talking_avatars().await.unwrap();

    let ids: Vec<&str> = avatars.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["avatar_1001", "avatar_1002"]);
}

#[tokio::test]
async fn test_malformed_envelope_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/akool/talking-avatars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "avatars": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    let err = client.akool().talking_avatars().await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_create_session_sends_avatar_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/create-session"))
        .and(body_json(json!({ "avatar_id": "avatar_1001" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": { "id": "sess_1", "avatar_id": "avatar_1001", "stream_type": "agora" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    let session = client.akool().create_session("avatar_1001").await.unwrap();

    assert_eq!(session.id, "sess_1");
    assert_eq!(session.avatar_id, "avatar_1001");
    assert_eq!(session.extra.get("stream_type"), Some(&json!("agora")));
}

#[tokio::test]
async fn test_close_session_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/close-session"))
        .and(body_json(json!({ "id": "sess_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("closed"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    client.akool().close_session("sess_1").await.unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Error normalization
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_backend_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/create-session"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Avatar is busy" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    let err = client.akool().create_session("avatar_1001").await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), "Avatar is busy");
}

#[tokio::test]
async fn test_status_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/akool/talking-avatars"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("t", None));
    let err = client.akool().talking_avatars().await.unwrap_err();

    assert_eq!(err.message(), "Error 502");
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_unreachable_server_reports_no_response() {
    // Grab a free port, then close it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = ParleyClient::builder()
        .base_url(format!("http://127.0.0.1:{}", port))
        .build()
        .unwrap();
    let err = client.akool().generate_token().await.unwrap_err();

    assert!(err.is_no_response(), "unexpected error: {:?}", err);
    assert_eq!(err.message(), "No response from server");
}

// ─────────────────────────────────────────────────────────────────────────────
// Token refresh
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_401_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/akool/talking-avatars"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh"))
        .and(body_json(json!({ "refresh": "r1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh", "expires_in": 900 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/akool/talking-avatars"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "avatar_1001", "name": "Maya" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("stale", Some("r1"));
    let client = client_for(&server, store.clone());
    let avatars = client.akool().talking_avatars().await.unwrap();

    assert_eq!(avatars.len(), 1);
    let tokens = store.load().await.unwrap().unwrap();
    assert_eq!(tokens.access_token, "fresh");
    // Refresh token kept when the backend does not rotate it
    assert_eq!(tokens.refresh_token.as_deref(), Some("r1"));
    assert_eq!(tokens.expires_in, Some(900));
}

#[tokio::test]
async fn test_401_without_refresh_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/generate-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with("stale", None));
    let err = client.akool().generate_token().await.unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(err.message(), "Error 401");
}

#[tokio::test]
async fn test_rejected_refresh_clears_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/akool/generate-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("stale", Some("revoked"));
    let client = client_for(&server, store.clone());
    let err = client.akool().generate_token().await.unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(store.load().await.unwrap(), None);
}
