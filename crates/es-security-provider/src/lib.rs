//! # Elasticsearch Security Provider
//!
//! Declarative management of Elasticsearch users, roles and API keys.
//!
//! Provider bootstrap resolves connection settings (provider block first,
//! then `ELASTICSEARCH_URL` / `ELASTICSEARCH_USER` / `ELASTICSEARCH_PASSWORD`),
//! builds one [`SecurityClient`] and pings the cluster. Resource handlers
//! receive that client on every call, map configuration through
//! [`AttributeMapper`] and write the cluster's answer back into state.
//!
//! ```ignore
//! use es_security_provider::prelude::*;
//!
//! let provider = SecurityProvider::configure(&provider_block).await?;
//! let state = provider
//!     .apply("elasticsearch_role", None, Some(role_block))
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod keys;
pub mod mapper;
pub mod models;
pub mod provider;
pub mod resources;
pub mod schemas;

pub use client::SecurityClient;
pub use config::{Credentials, ProviderConfig, DEFAULT_URL};
pub use mapper::AttributeMapper;
pub use provider::SecurityProvider;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::SecurityClient;
    pub use crate::config::ProviderConfig;
    pub use crate::provider::SecurityProvider;
    pub use crate::resources::{
        ApiKeyResource, RoleResource, UserResource, API_KEY_TYPE, ROLE_TYPE, USER_TYPE,
    };
    pub use es_provider_core::prelude::*;
}
