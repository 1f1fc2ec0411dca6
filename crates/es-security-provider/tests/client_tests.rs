//! Integration tests for the Security API client: auth, request shapes and
//! error surfacing.

mod helpers;

use es_provider_core::error::ProviderError;
use es_security_provider::client::SecurityClient;
use es_security_provider::config::ProviderConfig;
use es_security_provider::models::{ApiKeyRequest, Role, User};
use helpers::mock_es_server::{MockEsServer, TEST_PASSWORD, TEST_USER};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user(username: &str) -> User {
    User {
        username: username.to_string(),
        password: Some("s3cret-pw".to_string()),
        enabled: true,
        roles: vec!["viewer".to_string()],
        ..Default::default()
    }
}

// =============================================================================
// Connectivity
// =============================================================================

#[tokio::test]
async fn test_ping_sends_basic_auth() {
    let mock = MockEsServer::empty().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(basic_auth(TEST_USER, TEST_PASSWORD))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(mock.server())
        .await;

    mock.client().ping().await.unwrap();
}

#[tokio::test]
async fn test_ping_without_credentials_has_no_auth_header() {
    let mock = MockEsServer::empty().await;
    mock.mock_ping_success().await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(mock.uri())).unwrap();
    client.ping().await.unwrap();

    let requests = mock.server().received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_ping_failure_is_api_error() {
    let mock = MockEsServer::empty().await;
    mock.mock_ping_failure(401).await;

    let err = mock.client().ping().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1.
    let client = SecurityClient::new(&ProviderConfig::new().with_url("http://127.0.0.1:1")).unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }));
    assert_eq!(err.error_code(), "TRANSPORT_ERROR");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_put_user_sends_body_and_drains_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/_security/user/jdoe"))
        .and(body_json(json!({
            "username": "jdoe",
            "password": "s3cret-pw",
            "enabled": true,
            "roles": ["viewer"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "created": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    client.put_user(&test_user("jdoe")).await.unwrap();
}

#[tokio::test]
async fn test_put_user_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/_security/user/jdoe"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"type":"validation_exception","reason":"passwords must be at least [6] characters long"}}"#,
        ))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let err = client.put_user(&test_user("jdoe")).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Failed to create user: [400]"), "{message}");
    assert!(message.contains("validation_exception"));
}

#[tokio::test]
async fn test_usernames_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/_security/user/john%20doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "found": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    client.delete_user("john doe").await.unwrap();
}

#[tokio::test]
async fn test_get_user_not_found_is_none() {
    let mock = MockEsServer::new().await;
    assert!(mock.client().get_user("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_user_missing_key_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_security/user/jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    assert!(client.get_user("jdoe").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_user_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_security/user/jdoe"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let err = client.get_user("jdoe").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to read user: [503] unavailable");
}

#[tokio::test]
async fn test_delete_missing_user_is_api_error() {
    let mock = MockEsServer::new().await;
    let err = mock.client().delete_user("ghost").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().starts_with("Failed to delete user"));
}

#[tokio::test]
async fn test_malformed_response_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_security/role/ops"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let err = client.get_role("ops").await.unwrap_err();
    assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
}

// =============================================================================
// Roles
// =============================================================================

#[tokio::test]
async fn test_role_put_get_delete() {
    let mock = MockEsServer::new().await;
    let client = mock.client();
    let role = Role {
        cluster: vec!["monitor".to_string()],
        ..Default::default()
    };

    client.put_role("ops", &role).await.unwrap();
    let fetched = client.get_role("ops").await.unwrap().unwrap();
    assert_eq!(fetched.cluster, vec!["monitor"]);

    client.delete_role("ops").await.unwrap();
    assert!(client.get_role("ops").await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_role_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/_security/role/ops"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let err = client.put_role("ops", &Role::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to create role: [403] forbidden");
}

#[tokio::test]
async fn test_error_without_body_still_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/_security/role/ops"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let err = client.delete_role("ops").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to delete role: [500] ");
}

// =============================================================================
// API keys
// =============================================================================

#[tokio::test]
async fn test_get_api_key_sends_id_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_security/api_key"))
        .and(query_param("id", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api_keys": [{ "id": "key-1", "name": "ci", "invalidated": false }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let response = client.get_api_key("key-1").await.unwrap();
    assert_eq!(response.api_keys.len(), 1);
    assert_eq!(response.api_keys[0].name, "ci");
}

#[tokio::test]
async fn test_get_api_key_404_is_empty() {
    let mock = MockEsServer::new().await;
    let response = mock.client().get_api_key("nope").await.unwrap();
    assert!(response.api_keys.is_empty());
}

#[tokio::test]
async fn test_invalidate_api_key_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/_security/api_key"))
        .and(body_json(json!({ "ids": ["key-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invalidated_api_keys": ["key-1"],
            "previously_invalidated_api_keys": [],
            "error_count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    client.invalidate_api_key("key-1").await.unwrap();
}

#[tokio::test]
async fn test_create_api_key_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_security/api_key"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad expiration"))
        .mount(&server)
        .await;

    let client = SecurityClient::new(&ProviderConfig::new().with_url(server.uri())).unwrap();
    let request = ApiKeyRequest {
        name: "ci".to_string(),
        expiration: Some("forever".to_string()),
        ..Default::default()
    };
    let err = client.create_api_key(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to create API key: [400] bad expiration");
}

#[test]
fn test_client_debug_redacts_password() {
    let client = SecurityClient::new(
        &ProviderConfig::new()
            .with_url("http://es.internal:9200")
            .with_basic_auth("elastic", "hunter2"),
    )
    .unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("es.internal"));
    assert!(!debug.contains("hunter2"));
}
