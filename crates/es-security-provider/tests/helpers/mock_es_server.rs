//! Mock Elasticsearch server using wiremock for integration testing.
//!
//! Simulates the `/_security` user, role and API-key endpoints with
//! in-memory state, so create/read/delete cycles behave like a real cluster:
//! deleted users and roles answer 404, invalidated API keys keep being
//! reported with `invalidated: true`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use es_security_provider::client::SecurityClient;
use es_security_provider::config::{Credentials, ProviderConfig};

pub const TEST_USER: &str = "elastic";
pub const TEST_PASSWORD: &str = "changeme";

type Store = Arc<Mutex<HashMap<String, Value>>>;

/// A mock Elasticsearch cluster that tracks security objects.
pub struct MockEsServer {
    server: MockServer,
    /// Users keyed by username; passwords are never stored.
    users: Store,
    /// Role bodies keyed by role name.
    roles: Store,
    /// API key info keyed by id.
    api_keys: Store,
    /// Counter for generating API key ids.
    id_counter: Arc<Mutex<u64>>,
}

impl MockEsServer {
    /// Start a mock cluster with the security API mounted.
    pub async fn new() -> Self {
        let mock = Self::empty().await;
        mock.mount_security_api().await;
        mock
    }

    /// Start a mock cluster with no endpoints mounted.
    pub async fn empty() -> Self {
        Self {
            server: MockServer::start().await,
            users: Arc::default(),
            roles: Arc::default(),
            api_keys: Arc::default(),
            id_counter: Arc::new(Mutex::new(0)),
        }
    }

    /// Get the base URI of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Create a SecurityClient configured to talk to this mock server.
    pub fn client(&self) -> SecurityClient {
        let credentials = Credentials {
            username: TEST_USER.to_string(),
            password: Some(TEST_PASSWORD.to_string()),
        };
        SecurityClient::with_http_client(
            Url::parse(&self.uri()).unwrap(),
            Some(credentials),
            reqwest::Client::new(),
        )
    }

    /// Provider configuration pointing at this mock server.
    pub fn config(&self) -> ProviderConfig {
        ProviderConfig::new()
            .with_url(self.uri())
            .with_basic_auth(TEST_USER, TEST_PASSWORD)
    }

    // =========================================================================
    // State inspection
    // =========================================================================

    pub fn user(&self, username: &str) -> Option<Value> {
        self.users.lock().unwrap().get(username).cloned()
    }

    pub fn role(&self, name: &str) -> Option<Value> {
        self.roles.lock().unwrap().get(name).cloned()
    }

    pub fn api_key(&self, id: &str) -> Option<Value> {
        self.api_keys.lock().unwrap().get(id).cloned()
    }

    /// Simulate deletion outside of configuration.
    pub fn remove_user(&self, username: &str) {
        self.users.lock().unwrap().remove(username);
    }

    pub fn remove_role(&self, name: &str) {
        self.roles.lock().unwrap().remove(name);
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    // =========================================================================
    // Connectivity mocks
    // =========================================================================

    /// Mount a mock for a successful HEAD / probe.
    pub async fn mock_ping_success(&self) {
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for a failing HEAD / probe.
    pub async fn mock_ping_failure(&self, status: u16) {
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Security API
    // =========================================================================

    /// Mount stateful user, role and API-key endpoints.
    pub async fn mount_security_api(&self) {
        self.mount_named_object("user", self.users.clone(), true).await;
        self.mount_named_object("role", self.roles.clone(), false).await;
        self.mount_api_keys().await;
    }

    async fn mount_named_object(&self, kind: &str, store: Store, is_user: bool) {
        let object_path = format!(r"^/_security/{kind}/[^/]+$");

        let put_store = store.clone();
        Mock::given(method("PUT"))
            .and(path_regex(object_path.as_str()))
            .respond_with(move |req: &Request| {
                let name = last_segment(req);
                let mut body: Value = serde_json::from_slice(&req.body).unwrap_or(json!({}));
                if is_user {
                    if let Some(obj) = body.as_object_mut() {
                        obj.remove("password");
                        obj.insert("username".to_string(), json!(name));
                    }
                }
                let created = put_store.lock().unwrap().insert(name, body).is_none();
                let response = if is_user {
                    json!({ "created": created })
                } else {
                    json!({ "role": { "created": created } })
                };
                ResponseTemplate::new(200).set_body_json(response)
            })
            .mount(&self.server)
            .await;

        let get_store = store.clone();
        Mock::given(method("GET"))
            .and(path_regex(object_path.as_str()))
            .respond_with(move |req: &Request| {
                let name = last_segment(req);
                match get_store.lock().unwrap().get(&name) {
                    Some(object) => {
                        let mut object = object.clone();
                        if is_user {
                            fill_user_defaults(&mut object);
                        } else {
                            fill_role_defaults(&mut object);
                        }
                        ResponseTemplate::new(200).set_body_json(json!({ name: object }))
                    }
                    None => ResponseTemplate::new(404).set_body_json(json!({})),
                }
            })
            .mount(&self.server)
            .await;

        let delete_store = store;
        Mock::given(method("DELETE"))
            .and(path_regex(object_path.as_str()))
            .respond_with(move |req: &Request| {
                let name = last_segment(req);
                let found = delete_store.lock().unwrap().remove(&name).is_some();
                let status = if found { 200 } else { 404 };
                ResponseTemplate::new(status).set_body_json(json!({ "found": found }))
            })
            .mount(&self.server)
            .await;
    }

    async fn mount_api_keys(&self) {
        let keys = self.api_keys.clone();
        let counter = self.id_counter.clone();
        Mock::given(method("POST"))
            .and(path("/_security/api_key"))
            .respond_with(move |req: &Request| {
                let body: Value = serde_json::from_slice(&req.body).unwrap_or(json!({}));
                let name = body["name"].as_str().unwrap_or_default().to_string();
                let n = {
                    let mut counter = counter.lock().unwrap();
                    *counter += 1;
                    *counter
                };
                let id = format!("key-{n}");
                let secret = format!("secret-{n}");

                keys.lock().unwrap().insert(
                    id.clone(),
                    json!({
                        "id": id,
                        "name": name,
                        "creation": 1_700_000_000_000_i64,
                        "expiration": null,
                        "invalidated": false,
                        "username": TEST_USER,
                        "realm": "reserved"
                    }),
                );

                ResponseTemplate::new(200).set_body_json(json!({
                    "id": id,
                    "name": name,
                    "api_key": secret,
                    "encoded": format!("{id}:{secret}")
                }))
            })
            .mount(&self.server)
            .await;

        let keys = self.api_keys.clone();
        Mock::given(method("GET"))
            .and(path("/_security/api_key"))
            .respond_with(move |req: &Request| {
                let id = req
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "id")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                match keys.lock().unwrap().get(&id) {
                    Some(info) => ResponseTemplate::new(200)
                        .set_body_json(json!({ "api_keys": [info.clone()] })),
                    None => ResponseTemplate::new(404).set_body_json(json!({
                        "error": {
                            "type": "resource_not_found_exception",
                            "reason": format!("api key [{id}] not found")
                        },
                        "status": 404
                    })),
                }
            })
            .mount(&self.server)
            .await;

        let keys = self.api_keys.clone();
        Mock::given(method("DELETE"))
            .and(path("/_security/api_key"))
            .respond_with(move |req: &Request| {
                let body: Value = serde_json::from_slice(&req.body).unwrap_or(json!({}));
                let ids: Vec<String> = body["ids"]
                    .as_array()
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|v| v.as_str().map(ToString::to_string))
                            .collect()
                    })
                    .unwrap_or_default();

                let mut invalidated = Vec::new();
                let mut previously = Vec::new();
                let mut store = keys.lock().unwrap();
                for id in ids {
                    if let Some(info) = store.get_mut(&id) {
                        if info["invalidated"].as_bool() == Some(true) {
                            previously.push(id);
                        } else {
                            info["invalidated"] = json!(true);
                            invalidated.push(id);
                        }
                    }
                }

                ResponseTemplate::new(200).set_body_json(json!({
                    "invalidated_api_keys": invalidated,
                    "previously_invalidated_api_keys": previously,
                    "error_count": 0
                }))
            })
            .mount(&self.server)
            .await;
    }
}

fn last_segment(req: &Request) -> String {
    req.url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

/// Fields a real cluster always reports for a user.
fn fill_user_defaults(user: &mut Value) {
    if let Some(obj) = user.as_object_mut() {
        obj.entry("roles").or_insert(json!([]));
        obj.entry("full_name").or_insert(Value::Null);
        obj.entry("email").or_insert(Value::Null);
        obj.entry("metadata").or_insert(json!({}));
        obj.entry("enabled").or_insert(json!(true));
    }
}

/// Fields a real cluster always reports for a role.
fn fill_role_defaults(role: &mut Value) {
    if let Some(obj) = role.as_object_mut() {
        obj.entry("indices").or_insert(json!([]));
        obj.entry("applications").or_insert(json!([]));
        obj.entry("run_as").or_insert(json!([]));
        obj.entry("metadata").or_insert(json!({}));
        obj.insert("transient_metadata".to_string(), json!({ "enabled": true }));
        if let Some(indices) = obj.get_mut("indices").and_then(Value::as_array_mut) {
            for index in indices {
                if let Some(index) = index.as_object_mut() {
                    index
                        .entry("allow_restricted_indices")
                        .or_insert(json!(false));
                }
            }
        }
    }
}
