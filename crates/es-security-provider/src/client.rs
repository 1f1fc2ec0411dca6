//! Elasticsearch Security API client (reqwest-based).
//!
//! Provides a `SecurityClient` covering the connectivity probe and the user,
//! role and API-key endpoints under `/_security`. Every call is a single
//! request; non-2xx answers surface as [`ProviderError::Api`] carrying the
//! status code and raw body.

use es_provider_core::error::{ProviderError, ProviderResult};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

use crate::config::{Credentials, ProviderConfig};
use crate::models::{
    ApiKeyCreated, ApiKeyGetResponse, ApiKeyRequest, InvalidateApiKeyRequest, Role, User,
};

/// Elasticsearch Security API client.
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted.
#[derive(Clone)]
pub struct SecurityClient {
    /// Base URL of the cluster (e.g. "<https://es.example.com:9243>").
    base_url: Url,
    credentials: Option<Credentials>,
    http_client: Client,
}

impl SecurityClient {
    /// Create a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("es-security-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.endpoint()?,
            credentials: config.credentials(),
            http_client,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: Url, credentials: Option<Credentials>, http_client: Client) -> Self {
        Self {
            base_url,
            credentials,
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Connectivity ──────────────────────────────────────────────────

    /// Probe the cluster root (HEAD /).
    pub async fn ping(&self) -> ProviderResult<()> {
        let url = self.endpoint(&[])?;
        let response = self.send(self.request(Method::HEAD, url)).await?;
        self.handle_empty_response("Failed to ping Elasticsearch", response)
            .await
    }

    // ── User Operations ───────────────────────────────────────────────

    /// Create or update a user (PUT /_security/user/:username).
    pub async fn put_user(&self, user: &User) -> ProviderResult<()> {
        let url = self.endpoint(&["_security", "user", &user.username])?;
        let response = self.send(self.request(Method::PUT, url).json(user)).await?;
        self.handle_empty_response("Failed to create user", response)
            .await
    }

    /// Get a user (GET /_security/user/:username); `None` when it does not exist.
    pub async fn get_user(&self, username: &str) -> ProviderResult<Option<User>> {
        let url = self.endpoint(&["_security", "user", username])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let mut users: BTreeMap<String, User> =
            self.handle_response("Failed to read user", response).await?;
        Ok(users.remove(username))
    }

    /// Delete a user (DELETE /_security/user/:username).
    pub async fn delete_user(&self, username: &str) -> ProviderResult<()> {
        let url = self.endpoint(&["_security", "user", username])?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        self.handle_empty_response("Failed to delete user", response)
            .await
    }

    // ── Role Operations ───────────────────────────────────────────────

    /// Create or update a role (PUT /_security/role/:name).
    pub async fn put_role(&self, name: &str, role: &Role) -> ProviderResult<()> {
        let url = self.endpoint(&["_security", "role", name])?;
        let response = self.send(self.request(Method::PUT, url).json(role)).await?;
        self.handle_empty_response("Failed to create role", response)
            .await
    }

    /// Get a role (GET /_security/role/:name); `None` when it does not exist.
    pub async fn get_role(&self, name: &str) -> ProviderResult<Option<Role>> {
        let url = self.endpoint(&["_security", "role", name])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let mut roles: BTreeMap<String, Role> =
            self.handle_response("Failed to read role", response).await?;
        Ok(roles.remove(name))
    }

    /// Delete a role (DELETE /_security/role/:name).
    pub async fn delete_role(&self, name: &str) -> ProviderResult<()> {
        let url = self.endpoint(&["_security", "role", name])?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        self.handle_empty_response("Failed to delete role", response)
            .await
    }

    // ── API Key Operations ────────────────────────────────────────────

    /// Create an API key (POST /_security/api_key).
    pub async fn create_api_key(&self, request: &ApiKeyRequest) -> ProviderResult<ApiKeyCreated> {
        let url = self.endpoint(&["_security", "api_key"])?;
        let response = self
            .send(self.request(Method::POST, url).json(request))
            .await?;
        self.handle_response("Failed to create API key", response)
            .await
    }

    /// Look up API keys by id (GET /_security/api_key?id=:id).
    ///
    /// A 404 yields an empty result; the caller decides what zero matches mean.
    pub async fn get_api_key(&self, id: &str) -> ProviderResult<ApiKeyGetResponse> {
        let url = self.endpoint(&["_security", "api_key"])?;
        let response = self
            .send(self.request(Method::GET, url).query(&[("id", id)]))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ApiKeyGetResponse::default());
        }
        self.handle_response("Failed to read API key", response)
            .await
    }

    /// Invalidate an API key (DELETE /_security/api_key).
    pub async fn invalidate_api_key(&self, id: &str) -> ProviderResult<()> {
        let url = self.endpoint(&["_security", "api_key"])?;
        let body = InvalidateApiKeyRequest::single(id);
        let response = self
            .send(self.request(Method::DELETE, url).json(&body))
            .await?;
        self.handle_empty_response("Failed to invalidate API key", response)
            .await
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ProviderError::configuration(format!(
                    "url '{}' cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("ES {} {}", method, url);
        let builder = self.http_client.request(method, url);
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, creds.password.as_ref()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ProviderResult<Response> {
        builder.send().await.map_err(transport_error)
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        operation: &str,
        response: Response,
    ) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            serde_json::from_str(&body).map_err(|e| {
                ProviderError::serialization_with_source(
                    format!("{operation}: failed to parse response"),
                    e,
                )
            })
        } else {
            self.handle_error_response(operation, response).await
        }
    }

    /// Check the status and drain the body of a response whose content is unused.
    async fn handle_empty_response(&self, operation: &str, response: Response) -> ProviderResult<()> {
        if response.status().is_success() {
            response.bytes().await.map_err(transport_error)?;
            Ok(())
        } else {
            self.handle_error_response(operation, response).await
        }
    }

    async fn handle_error_response<T>(&self, operation: &str, response: Response) -> ProviderResult<T> {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "{operation}: failed to read error body");
                "<no body>".to_string()
            }
        };

        debug!(status = status.as_u16(), "{operation}");
        Err(ProviderError::api(operation, status.as_u16(), body))
    }
}

impl std::fmt::Debug for SecurityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::transport_with_source(e.to_string(), e)
}
