//! Provider error types
//!
//! Every failure is terminal for the operation it occurs in; nothing here is
//! classified for retry. The variants follow the four error classes a
//! provider reports: configuration, transport, remote API and logical lookup
//! errors.

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::mapping::MappingError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    // Configuration errors (raised before any remote call)
    /// A configuration value had the wrong shape.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Schema validation rejected the configuration.
    #[error("invalid configuration: {}", join_diagnostics(.diagnostics))]
    Validation { diagnostics: Vec<Diagnostic> },

    /// Provider (connection) configuration is invalid.
    #[error("invalid provider configuration: {message}")]
    Configuration { message: String },

    // Transport errors
    /// Connection, DNS or TLS failure talking to the remote system.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    // Remote API errors
    /// The remote system answered with a non-2xx status.
    #[error("{operation}: [{status}] {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    // Logical errors
    /// An expected single-result lookup found nothing.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// An expected single-result lookup found more than one match.
    #[error("{resource} lookup is ambiguous: expected exactly one match, found {count}")]
    Ambiguous { resource: String, count: usize },

    /// The resource type has no in-place update transition.
    #[error("resource type '{resource_type}' does not support in-place update")]
    UpdateNotSupported { resource_type: String },

    /// The operation needs a tracking key but the resource has none.
    #[error("resource of type '{resource_type}' has no tracking id")]
    MissingId { resource_type: String },

    /// No handler is registered for the requested resource type.
    #[error("unknown resource type '{resource_type}'")]
    UnknownResourceType { resource_type: String },
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProviderError {
    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::Mapping(_) => "MAPPING_ERROR",
            ProviderError::Validation { .. } => "VALIDATION_FAILED",
            ProviderError::Configuration { .. } => "INVALID_CONFIG",
            ProviderError::Transport { .. } => "TRANSPORT_ERROR",
            ProviderError::Api { .. } => "API_ERROR",
            ProviderError::Serialization { .. } => "SERIALIZATION_ERROR",
            ProviderError::NotFound { .. } => "NOT_FOUND",
            ProviderError::Ambiguous { .. } => "AMBIGUOUS",
            ProviderError::UpdateNotSupported { .. } => "UPDATE_NOT_SUPPORTED",
            ProviderError::MissingId { .. } => "MISSING_ID",
            ProviderError::UnknownResourceType { .. } => "UNKNOWN_RESOURCE_TYPE",
        }
    }

    /// Whether the error was raised before any remote call was attempted.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ProviderError::Mapping(_)
                | ProviderError::Validation { .. }
                | ProviderError::Configuration { .. }
        )
    }

    /// HTTP status of a remote API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert into diagnostics for the orchestrating framework.
    #[must_use]
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            ProviderError::Validation { diagnostics } => diagnostics.clone(),
            ProviderError::Mapping(e) => {
                vec![Diagnostic::error(e.to_string()).with_attribute(e.field())]
            }
            other => vec![Diagnostic::error(other.to_string())],
        }
    }

    // Convenience constructors

    pub fn configuration(message: impl Into<String>) -> Self {
        ProviderError::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ProviderError::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn api(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        ProviderError::Api {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Serialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        ProviderError::NotFound {
            resource: resource.into(),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::serialization_with_source(e.to_string(), e)
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
