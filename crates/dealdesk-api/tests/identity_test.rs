#![allow(clippy::unwrap_used)]
// Integration tests for `IdentityClient` using wiremock.

use secrecy::ExposeSecret;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealdesk_api::identity::IdentityClient;
use dealdesk_api::transport::TransportConfig;
use dealdesk_api::{Error, TokenSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, IdentityClient) {
    let server = MockServer::start().await;
    let identity_url = Url::parse(&server.uri()).unwrap();
    let client = IdentityClient::new(&identity_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn token_body(id_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "idToken": id_token,
        "refreshToken": refresh_token,
        "expiresIn": "3600"
    })
}

// ── Sign-in tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(body_json(json!({
            "grant_type": "password",
            "email": "admin@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("id-1", "refresh-1")))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "hunter2".to_string().into();
    let refresh = client.sign_in("admin@example.com", &password).await.unwrap();

    assert_eq!(refresh.expose_secret(), "refresh-1");
    assert!(client.has_session().await);
}

#[tokio::test]
async fn test_sign_in_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "INVALID_PASSWORD" }
        })))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "wrong".to_string().into();
    let result = client.sign_in("admin@example.com", &password).await;

    match result {
        Err(Error::Auth(ref message)) => {
            assert!(message.contains("INVALID_PASSWORD"), "got: {message}");
        }
        other => panic!("expected Auth error, got: {other:?}"),
    }
}

// ── Token caching tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_reuses_fresh_token() {
    let (server, client) = setup().await;

    // One exchange for the sign-in; the cached token covers the rest.
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("id-1", "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "hunter2".to_string().into();
    client.sign_in("admin@example.com", &password).await.unwrap();

    let first = client.bearer_token().await.unwrap();
    let second = client.bearer_token().await.unwrap();

    assert_eq!(first.expose_secret(), "id-1");
    assert_eq!(second.expose_secret(), "id-1");
}

#[tokio::test]
async fn test_seeded_refresh_token_is_exchanged_on_first_use() {
    let (server, client) = setup().await;
    let client = client.with_refresh_token("seed-refresh".to_string().into());

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(body_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "seed-refresh"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("id-2", "refresh-2")))
        .mount(&server)
        .await;

    let token = client.bearer_token().await.unwrap();

    assert_eq!(token.expose_secret(), "id-2");
}

#[tokio::test]
async fn test_bearer_token_without_session() {
    let (_server, client) = setup().await;

    let result = client.bearer_token().await;

    match result {
        Err(Error::Auth(ref message)) => {
            assert!(message.contains("not signed in"), "got: {message}");
        }
        other => panic!("expected Auth error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_sign_out_drops_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("id-1", "refresh-1")))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "hunter2".to_string().into();
    client.sign_in("admin@example.com", &password).await.unwrap();
    assert!(client.has_session().await);

    client.sign_out().await;
    assert!(!client.has_session().await);
}

// ── Token source tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_static_source_never_touches_the_network() {
    let source = TokenSource::Static("fixed-token".to_string().into());

    let token = source.bearer_token().await.unwrap();

    assert_eq!(token.expose_secret(), "fixed-token");
}
