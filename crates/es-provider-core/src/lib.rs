//! # Provider Framework
//!
//! Core abstractions for declarative, reconcilable remote resources.
//!
//! A configuration parser hands the provider dynamically-typed trees
//! ([`ConfigValue`]). Resource handlers declare a [`Schema`], read typed
//! values through [`FieldReader`], talk to the remote system through a
//! client owned by provider bootstrap and write results back into
//! [`ResourceData`].
//!
//! ## Architecture
//!
//! - [`Resource`] - Capability trait every handler implements
//! - [`ResourceRegistry`] - Handlers keyed by resource type name
//! - [`lifecycle::plan`] / [`lifecycle::apply`] - Create, update, replace and delete transitions
//!
//! ## Example
//!
//! ```ignore
//! use es_provider_core::prelude::*;
//!
//! let registry = ResourceRegistry::new().with(UserResource);
//! let handler = registry.get("elasticsearch_user")?;
//!
//! let state = lifecycle::apply(&*handler, &client, None, Some(config)).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`value`] - Configuration tree values
//! - [`mapping`] - Path-aware typed access and mapping errors
//! - [`schema`] - Attribute schemas, validation and redaction
//! - [`data`] - Per-resource state handle
//! - [`resource`] - Handler trait and registry
//! - [`lifecycle`] - Planning and applying transitions
//! - [`diagnostics`] - Problems reported to the orchestrator
//! - [`error`] - Error types
//! - [`logging`] - Tracing subscriber setup

pub mod data;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod mapping;
pub mod resource;
pub mod schema;
pub mod value;

pub use async_trait::async_trait;

pub use data::ResourceData;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{ProviderError, ProviderResult};
pub use lifecycle::PlannedAction;
pub use mapping::{FieldReader, MappingError, MappingResult};
pub use resource::{BoxedResource, Resource, ResourceRegistry};
pub use schema::{Attribute, AttributeKind, Schema};
pub use value::{ConfigMap, ConfigValue};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::data::ResourceData;
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::error::{ProviderError, ProviderResult};
    pub use crate::lifecycle::{self, PlannedAction};
    pub use crate::mapping::{FieldReader, MappingError, MappingResult};
    pub use crate::resource::{BoxedResource, Resource, ResourceRegistry};
    pub use crate::schema::{Attribute, AttributeKind, Schema};
    pub use crate::value::{ConfigMap, ConfigValue};
    pub use async_trait::async_trait;
}
