//! Connection configuration for the Elasticsearch Security API.
//!
//! Each field comes from the provider block when set there, and otherwise
//! from its environment variable (`ELASTICSEARCH_URL`, `ELASTICSEARCH_USER`,
//! `ELASTICSEARCH_PASSWORD`). When nothing is set at all, the default client
//! configuration applies: `http://localhost:9200` without authentication.

use es_provider_core::diagnostics::has_errors;
use es_provider_core::error::{ProviderError, ProviderResult};
use es_provider_core::mapping::FieldReader;
use es_provider_core::value::{ConfigMap, ConfigValue};
use url::Url;

use crate::{keys, schemas};

/// Endpoint used when no connection setting is configured.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Provider connection settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProviderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Load settings from environment variables.
    pub fn from_env() -> ProviderResult<Self> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load settings from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state. Empty variables count as unset.
    pub fn from_reader<F>(reader: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let mut map = ConfigMap::new();
        schemas::provider().apply_env_defaults(&mut map, |var| {
            reader(var).ok().filter(|value| !value.is_empty())
        });
        Self::from_map(&map)
    }

    fn from_map(map: &ConfigMap) -> ProviderResult<Self> {
        let reader = FieldReader::new(map);
        Ok(Self {
            url: reader.optional_string(keys::URL)?,
            username: reader.optional_string(keys::USERNAME)?,
            password: reader.optional_string(keys::PASSWORD)?,
        })
    }

    /// Read the explicit settings of a provider block.
    pub fn from_tree(tree: &ConfigValue) -> ProviderResult<Self> {
        let empty = ConfigMap::new();
        let map = match tree {
            ConfigValue::Null => &empty,
            ConfigValue::Map(map) => map,
            other => {
                return Err(ProviderError::configuration(format!(
                    "provider block must be a map, found {}",
                    other.kind()
                )))
            }
        };

        let diagnostics = schemas::provider().validate(map);
        if has_errors(&diagnostics) {
            return Err(ProviderError::Validation { diagnostics });
        }

        Self::from_map(map)
    }

    /// Read a provider block, falling back per field to `reader`.
    pub fn resolve<F>(tree: &ConfigValue, reader: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        Ok(Self::from_tree(tree)?.merge(Self::from_reader(reader)?))
    }

    /// Fill unset fields from `fallback`; values already set win.
    #[must_use]
    pub fn merge(self, fallback: Self) -> Self {
        Self {
            url: self.url.or(fallback.url),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
        }
    }

    /// Whether no connection setting is configured.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.url.is_none() && self.username.is_none() && self.password.is_none()
    }

    /// The validated endpoint URL.
    pub fn endpoint(&self) -> ProviderResult<Url> {
        let raw = self.url.as_deref().unwrap_or(DEFAULT_URL);
        let url = Url::parse(raw)
            .map_err(|e| ProviderError::configuration(format!("invalid url '{raw}': {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ProviderError::configuration(format!(
                    "url scheme '{scheme}' not supported; only HTTP(S) permitted"
                )))
            }
        }
        if url.host_str().is_none() {
            return Err(ProviderError::configuration(format!(
                "url '{raw}' must have a host"
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ProviderError::configuration(format!(
                "url '{raw}' cannot be used as a base URL"
            )));
        }
        Ok(url)
    }

    /// Basic-auth credentials, when a username or password is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        if self.username.is_none() && self.password.is_none() {
            return None;
        }
        Some(Credentials {
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone(),
        })
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
