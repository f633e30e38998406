#![allow(clippy::unwrap_used)]
// Integration tests for the OAuth2 refresh-token source.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scp_api::{Error, TokenSource};

async fn setup(refresh_token: &str) -> (MockServer, TokenSource) {
    let server = MockServer::start().await;
    let token_url = Url::parse(&format!("{}/realms/scp/token", server.uri())).unwrap();
    let tokens = TokenSource::with_client(
        reqwest::Client::new(),
        token_url,
        "scp",
        SecretString::from(refresh_token.to_string()),
    );
    (server, tokens)
}

#[tokio::test]
async fn test_exchange_sends_refresh_grant() {
    let (server, tokens) = setup("refresh-abc").await;

    Mock::given(method("POST"))
        .and(path("/realms/scp/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=scp"))
        .and(body_string_contains("refresh_token=refresh-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "Bearer",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = tokens.access_token().await.unwrap();
    assert_eq!(token.expose_secret(), "access-1");

    // Cached until close to expiry.
    let again = tokens.access_token().await.unwrap();
    assert_eq!(again.expose_secret(), "access-1");
}

#[tokio::test]
async fn test_short_lived_token_is_refreshed() {
    let (server, tokens) = setup("refresh-abc").await;

    // Expiry inside the refresh margin, so every call exchanges again.
    Mock::given(method("POST"))
        .and(path("/realms/scp/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-short",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&server)
        .await;

    tokens.access_token().await.unwrap();
    tokens.access_token().await.unwrap();
}

#[tokio::test]
async fn test_rotated_refresh_token_is_adopted() {
    let (server, tokens) = setup("refresh-old").await;

    Mock::given(method("POST"))
        .and(path("/realms/scp/token"))
        .and(body_string_contains("refresh_token=refresh-old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-new",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/realms/scp/token"))
        .and(body_string_contains("refresh_token=refresh-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(tokens.access_token().await.unwrap().expose_secret(), "access-1");
    tokens.invalidate().await;
    assert_eq!(tokens.access_token().await.unwrap().expose_secret(), "access-2");
}

#[tokio::test]
async fn test_revoked_refresh_token_is_authentication_error() {
    let (server, tokens) = setup("revoked").await;

    Mock::given(method("POST"))
        .and(path("/realms/scp/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token is not active"
        })))
        .mount(&server)
        .await;

    let err = tokens.access_token().await.unwrap_err();
    assert!(err.is_auth_failure());
    match err {
        Error::Authentication { message } => {
            assert_eq!(message, "invalid_grant: Token is not active");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}
