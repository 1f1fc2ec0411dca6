//! Wire records for the Elasticsearch Security API.
//!
//! Field names follow the API's snake_case JSON. Optional scalars and empty
//! collections are omitted from request bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Open-ended string metadata attached to users and roles.
pub type Metadata = BTreeMap<String, String>;

/// A native realm user (`PUT /_security/user/{username}`).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    /// Only ever sent; the API never returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("enabled", &self.enabled)
            .field("full_name", &self.full_name)
            .field("roles", &self.roles)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Restriction on the document fields visible through an index permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSecurity {
    #[serde(default)]
    pub grant: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

/// One entry of a role's `indices` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPermission {
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default)]
    pub privileges: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_security: Option<FieldSecurity>,

    /// Document-level security query, as a JSON string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_restricted_indices: bool,
}

/// One entry of a role's `applications` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPrivilege {
    pub application: String,

    #[serde(default)]
    pub privileges: Vec<String>,

    #[serde(default)]
    pub resources: Vec<String>,
}

/// A role definition (`PUT /_security/role/{name}`); the name is the path key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub cluster: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<IndexPermission>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<ApplicationPrivilege>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_as: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

/// Body of `POST /_security/api_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRequest {
    pub name: String,

    /// Duration string, e.g. `1d`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub role_descriptors: BTreeMap<String, Role>,
}

/// Response of `POST /_security/api_key`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyCreated {
    pub id: String,
    pub name: String,

    /// Epoch milliseconds; absent for keys that never expire.
    #[serde(default)]
    pub expiration: Option<i64>,

    pub api_key: String,
}

impl std::fmt::Debug for ApiKeyCreated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCreated")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("expiration", &self.expiration)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// One entry of `GET /_security/api_key`. The secret is never returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub creation: Option<i64>,

    #[serde(default)]
    pub expiration: Option<i64>,

    #[serde(default)]
    pub invalidated: bool,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub realm: Option<String>,
}

/// Response of `GET /_security/api_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyGetResponse {
    #[serde(default)]
    pub api_keys: Vec<ApiKeyInfo>,
}

/// Body of `DELETE /_security/api_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidateApiKeyRequest {
    pub ids: Vec<String>,
}

impl InvalidateApiKeyRequest {
    #[must_use]
    pub fn single(id: impl Into<String>) -> Self {
        Self {
            ids: vec![id.into()],
        }
    }
}
