//! Provider bootstrap: settings resolution and the connectivity check.

mod helpers;

use std::collections::HashMap;
use std::env::VarError;

use es_provider_core::error::ProviderError;
use es_security_provider::config::ProviderConfig;
use es_security_provider::provider::SecurityProvider;
use helpers::mock_es_server::{MockEsServer, TEST_PASSWORD, TEST_USER};
use helpers::test_data::tree;
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, ResponseTemplate};

fn make_reader(vars: HashMap<&'static str, String>) -> impl Fn(&str) -> Result<String, VarError> {
    move |key| vars.get(key).cloned().ok_or(VarError::NotPresent)
}

#[tokio::test]
async fn test_configure_from_environment() {
    let mock = MockEsServer::empty().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(basic_auth(TEST_USER, TEST_PASSWORD))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(mock.server())
        .await;

    let reader = make_reader(HashMap::from([
        ("ELASTICSEARCH_URL", mock.uri()),
        ("ELASTICSEARCH_USER", TEST_USER.to_string()),
        ("ELASTICSEARCH_PASSWORD", TEST_PASSWORD.to_string()),
    ]));

    let provider = SecurityProvider::configure_with(&tree(json!({})), reader)
        .await
        .unwrap();
    assert_eq!(provider.client().base_url().as_str(), format!("{}/", mock.uri()));
}

#[tokio::test]
async fn test_explicit_settings_override_environment() {
    let mock = MockEsServer::empty().await;
    mock.mock_ping_success().await;

    let reader = make_reader(HashMap::from([(
        "ELASTICSEARCH_URL",
        "http://127.0.0.1:1".to_string(),
    )]));
    let block = tree(json!({
        "url": mock.uri(),
        "username": TEST_USER,
        "password": TEST_PASSWORD
    }));

    SecurityProvider::configure_with(&block, reader).await.unwrap();
    assert_eq!(mock.request_count().await, 1);
}

#[tokio::test]
async fn test_failed_ping_aborts_configuration() {
    let mock = MockEsServer::empty().await;
    mock.mock_ping_failure(401).await;

    let err = SecurityProvider::connect(&mock.config()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().starts_with("Failed to ping Elasticsearch"));
}

#[tokio::test]
async fn test_unreachable_cluster_aborts_configuration() {
    let config = ProviderConfig::new().with_url("http://127.0.0.1:1");
    let err = SecurityProvider::connect(&config).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }));
}

#[tokio::test]
async fn test_invalid_url_is_configuration_error() {
    let block = tree(json!({ "url": "ftp://es.example.com" }));
    let err = SecurityProvider::configure_with(&block, make_reader(HashMap::new()))
        .await
        .unwrap_err();

    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("ftp"));
}

#[tokio::test]
async fn test_unknown_provider_attribute_is_rejected() {
    let block = tree(json!({ "endpoint": "http://localhost:9200" }));
    let err = SecurityProvider::configure_with(&block, make_reader(HashMap::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation { .. }));
}
