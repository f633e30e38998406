#![allow(clippy::unwrap_used)]
// Integration tests for `ScpClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scp_api::{Error, ScpClient, TokenSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ScpClient) {
    let server = MockServer::start().await;
    let client = ScpClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

async fn setup_with_tokens() -> (MockServer, ScpClient) {
    let server = MockServer::start().await;
    let token_url = Url::parse(&format!("{}/token", server.uri())).unwrap();
    let tokens = TokenSource::with_client(
        reqwest::Client::new(),
        token_url,
        "scp",
        SecretString::from("refresh-1".to_string()),
    );
    let client = ScpClient::new(
        &server.uri(),
        Arc::new(tokens),
        &scp_api::TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Ping ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ping_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    client.ping().await.unwrap();
}

#[tokio::test]
async fn test_ping_requires_exact_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client.ping().await;
    assert!(
        matches!(result, Err(Error::Api { status: 204, .. })),
        "expected Api error, got: {result:?}"
    );
}

// ── Maintenance ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_maintenance_window() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/maintenance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": "2026-03-01T02:00:00Z",
            "finishAt": null
        })))
        .mount(&server)
        .await;

    let info = client.maintenance().await.unwrap();
    assert_eq!(info.start_at.unwrap().timestamp(), 1_772_330_400);
    assert!(info.finish_at.is_none());
}

// ── Servers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_servers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "v2202401", "nickname": "web" },
            { "id": 2, "name": "v2202402" }
        ])))
        .mount(&server)
        .await;

    let servers = client.list_servers().await.unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].nickname.as_deref(), Some("web"));
    assert_eq!(servers[1].nickname, None);
}

#[tokio::test]
async fn test_get_server_requests_live_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/servers/42"))
        .and(query_param("loadServerLiveInfo", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "v2202401",
            "architecture": "AMD64",
            "site": { "city": "Nuremberg" },
            "serverLiveInfo": { "state": "RUNNING", "cpuCount": 4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client.get_server(42).await.unwrap();
    assert_eq!(detail.architecture.as_deref(), Some("AMD64"));
    assert_eq!(detail.site.unwrap().city.as_deref(), Some("Nuremberg"));
    assert_eq!(detail.server_live_info.unwrap().cpu_count, Some(4));
}

#[tokio::test]
async fn test_api_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/servers"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "code": "maintenance",
            "message": "down for maintenance"
        })))
        .mount(&server)
        .await;

    let err = client.list_servers().await.unwrap_err();
    assert!(err.is_missing_payload());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance: down for maintenance");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_tasks().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "<html>oops</html>"),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = ScpClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let result = client.list_servers().await;
    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

// ── Tasks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_tasks() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "uuid": "a-1", "name": "Start server", "state": "RUNNING" },
            { "uuid": "a-2", "state": "FINISHED" }
        ])))
        .mount(&server)
        .await;

    let tasks = client.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].state.as_deref(), Some("RUNNING"));
    assert_eq!(tasks[1].name, None);
}

// ── Bearer auth ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let (server, client) = setup_with_tokens().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/servers"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    // Second call reuses the cached token.
    assert!(client.list_servers().await.unwrap().is_empty());
    assert!(client.list_servers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_invalidates_cached_token() {
    let (server, client) = setup_with_tokens().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 300
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let first = client.list_tasks().await;
    assert!(matches!(first, Err(Error::Unauthorized)), "got: {first:?}");

    // The rejected token was dropped, so this triggers a second exchange.
    let second = client.list_tasks().await;
    assert!(matches!(second, Err(Error::Unauthorized)), "got: {second:?}");
}
