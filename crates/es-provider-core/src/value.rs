//! Configuration tree values.
//!
//! A [`ConfigValue`] is one node of the dynamically-typed tree a configuration
//! parser hands to the provider: strings, booleans, ordered lists and
//! string-keyed maps. Typed access goes through [`crate::mapping::FieldReader`];
//! nothing else in the framework inspects variants directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::mapping::MappingError;

/// A string-keyed map of configuration values (one resource block).
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A single node of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Unset.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A string scalar.
    String(String),
    /// An ordered list.
    List(Vec<ConfigValue>),
    /// A string-keyed map (nested block or open-ended map attribute).
    Map(ConfigMap),
}

/// The runtime shape of a [`ConfigValue`], used in mapping errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    String,
    List,
    Map,
}

impl ValueKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ConfigValue {
    /// Build a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ConfigValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ConfigValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Get the runtime shape of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Null => ValueKind::Null,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::List(_) => ValueKind::List,
            ConfigValue::Map(_) => ValueKind::Map,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Whether this is the zero value of its shape (null, `""`, `false`,
    /// empty list or empty map).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            ConfigValue::Null => true,
            ConfigValue::Bool(b) => !b,
            ConfigValue::String(s) => s.is_empty(),
            ConfigValue::List(items) => items.is_empty(),
            ConfigValue::Map(map) => map.is_empty(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a JSON document into a configuration tree.
    ///
    /// Numbers have no configuration-tree representation and are rejected
    /// with the JSON pointer of the offending node.
    pub fn from_json(value: serde_json::Value) -> Result<Self, MappingError> {
        Self::from_json_at(value, "")
    }

    fn from_json_at(value: serde_json::Value, path: &str) -> Result<Self, MappingError> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::String(s) => ConfigValue::String(s),
            Value::Number(n) => {
                return Err(MappingError::TypeMismatch {
                    field: if path.is_empty() { "/".to_string() } else { path.to_string() },
                    expected: "string, bool, list or map",
                    found: format!("number {n}"),
                })
            }
            Value::Array(items) => ConfigValue::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| Self::from_json_at(item, &format!("{path}/{i}")))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => ConfigValue::Map(
                map.into_iter()
                    .map(|(k, v)| {
                        let child = format!("{path}/{k}");
                        Self::from_json_at(v, &child).map(|v| (k, v))
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Convert this tree into a JSON document.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::String(s) => Value::String(s.clone()),
            ConfigValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ConfigValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<&String> for ConfigValue {
    fn from(s: &String) -> Self {
        ConfigValue::String(s.clone())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl<V: Into<ConfigValue>> From<BTreeMap<String, V>> for ConfigValue {
    fn from(map: BTreeMap<String, V>) -> Self {
        ConfigValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
