//! Per-resource state handed between the framework and resource handlers.

use std::fmt;

use crate::diagnostics::has_errors;
use crate::error::{ProviderError, ProviderResult};
use crate::mapping::FieldReader;
use crate::schema::Schema;
use crate::value::{ConfigMap, ConfigValue};

/// Attribute values plus the tracking id of one managed resource.
///
/// An empty id means the resource is absent; a read that finds the remote
/// object gone clears it so the framework plans a re-create.
#[derive(Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    attributes: ConfigMap,
}

impl ResourceData {
    #[must_use]
    pub fn new(attributes: ConfigMap) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Build resource data from a configuration block, applying schema
    /// defaults and rejecting invalid input before any remote call.
    pub fn from_config(schema: &Schema, config: ConfigValue) -> ProviderResult<Self> {
        let mut attributes = match config {
            ConfigValue::Map(map) => map,
            ConfigValue::Null => ConfigMap::new(),
            other => {
                return Err(ProviderError::configuration(format!(
                    "resource configuration must be a map, found {}",
                    other.kind()
                )))
            }
        };

        schema.apply_defaults(&mut attributes);
        let diagnostics = schema.validate(&attributes);
        if has_errors(&diagnostics) {
            return Err(ProviderError::Validation { diagnostics });
        }

        Ok(Self::new(attributes))
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The tracking id, or [`ProviderError::MissingId`] when absent.
    pub fn require_id(&self, resource_type: &str) -> ProviderResult<&str> {
        self.id().ok_or_else(|| ProviderError::MissingId {
            resource_type: resource_type.to_string(),
        })
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
    }

    /// Mark the resource as absent.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// The value for `key` if it is set to a non-zero value.
    #[must_use]
    pub fn get_ok(&self, key: &str) -> Option<&ConfigValue> {
        self.attributes.get(key).filter(|v| !v.is_zero())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.attributes.remove(key)
    }

    #[must_use]
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(&self.attributes)
    }

    #[must_use]
    pub fn attributes(&self) -> &ConfigMap {
        &self.attributes
    }

    #[must_use]
    pub fn into_attributes(self) -> ConfigMap {
        self.attributes
    }
}

// Attribute values may be sensitive; only keys are printed.
impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceData")
            .field("id", &self.id)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}
