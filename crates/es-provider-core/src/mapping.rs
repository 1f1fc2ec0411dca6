//! Typed, path-aware access to configuration trees.
//!
//! [`FieldReader`] is the only place where runtime shapes of a
//! [`ConfigValue`] are asserted. Every failed coercion becomes a
//! [`MappingError`] carrying the full attribute path, e.g.
//! `indices[0].field_security[0].grant[1]`.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{ConfigMap, ConfigValue};

/// A configuration value did not have the shape the mapper expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The value exists but has the wrong runtime shape.
    #[error("attribute '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A required attribute is absent or null.
    #[error("attribute '{field}' is required but was not set")]
    MissingField { field: String },
}

impl MappingError {
    /// The path of the offending attribute.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            MappingError::TypeMismatch { field, .. } | MappingError::MissingField { field } => {
                field
            }
        }
    }

    fn mismatch(field: String, expected: &'static str, found: &ConfigValue) -> Self {
        MappingError::TypeMismatch {
            field,
            expected,
            found: found.kind().to_string(),
        }
    }
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Read typed fields out of one block of a configuration tree.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    map: &'a ConfigMap,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    /// Reader over a top-level block.
    #[must_use]
    pub fn new(map: &'a ConfigMap) -> Self {
        Self {
            map,
            prefix: String::new(),
        }
    }

    /// Reader over a nested block located at `prefix`.
    #[must_use]
    pub fn nested(map: &'a ConfigMap, prefix: impl Into<String>) -> Self {
        Self {
            map,
            prefix: prefix.into(),
        }
    }

    /// Full attribute path for `key` within this block.
    #[must_use]
    pub fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    /// The raw value for `key`; null is reported as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a ConfigValue> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// A required string attribute.
    pub fn string(&self, key: &str) -> MappingResult<String> {
        match self.get(key) {
            None => Err(MappingError::MissingField {
                field: self.path(key),
            }),
            Some(ConfigValue::String(s)) => Ok(s.clone()),
            Some(other) => Err(MappingError::mismatch(self.path(key), "string", other)),
        }
    }

    /// An optional string attribute; an empty string counts as unset.
    pub fn optional_string(&self, key: &str) -> MappingResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::String(s)) if s.is_empty() => Ok(None),
            Some(ConfigValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(MappingError::mismatch(self.path(key), "string", other)),
        }
    }

    /// An optional boolean attribute.
    pub fn optional_bool(&self, key: &str) -> MappingResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(MappingError::mismatch(self.path(key), "bool", other)),
        }
    }

    /// A boolean attribute with a fallback for when it is unset.
    pub fn bool_or(&self, key: &str, default: bool) -> MappingResult<bool> {
        Ok(self.optional_bool(key)?.unwrap_or(default))
    }

    /// A list of strings. Absent and empty lists both yield an empty vector.
    pub fn string_list(&self, key: &str) -> MappingResult<Vec<String>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let ConfigValue::List(items) = value else {
            return Err(MappingError::mismatch(self.path(key), "list of strings", value));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                ConfigValue::String(s) => Ok(s.clone()),
                other => Err(MappingError::mismatch(
                    format!("{}[{i}]", self.path(key)),
                    "string",
                    other,
                )),
            })
            .collect()
    }

    /// An open-ended string-to-string map. Absent yields an empty map.
    pub fn string_map(&self, key: &str) -> MappingResult<BTreeMap<String, String>> {
        let Some(value) = self.get(key) else {
            return Ok(BTreeMap::new());
        };
        let ConfigValue::Map(map) = value else {
            return Err(MappingError::mismatch(self.path(key), "map of strings", value));
        };

        map.iter()
            .map(|(k, v)| match v {
                ConfigValue::String(s) => Ok((k.clone(), s.clone())),
                other => Err(MappingError::mismatch(
                    format!("{}.{k}", self.path(key)),
                    "string",
                    other,
                )),
            })
            .collect()
    }

    /// A list of nested blocks.
    pub fn blocks(&self, key: &str) -> MappingResult<Vec<FieldReader<'a>>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let ConfigValue::List(items) = value else {
            return Err(MappingError::mismatch(self.path(key), "list of blocks", value));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{i}]", self.path(key));
                match item {
                    ConfigValue::Map(map) => Ok(FieldReader::nested(map, path)),
                    other => Err(MappingError::mismatch(path, "block", other)),
                }
            })
            .collect()
    }

    /// A nested single-object field, stored as a list of at most one block.
    ///
    /// Zero elements means unset. Item-count caps are enforced by schema
    /// validation, so only the first element is considered here.
    pub fn single_block(&self, key: &str) -> MappingResult<Option<FieldReader<'a>>> {
        Ok(self.blocks(key)?.into_iter().next())
    }
}
