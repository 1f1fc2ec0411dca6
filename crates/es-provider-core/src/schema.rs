//! Attribute schemas for resource and provider blocks.
//!
//! A [`Schema`] declares, per attribute, its shape and lifecycle flags:
//! required/optional/computed, force-new (changes trigger destroy-then-create),
//! sensitive (never logged), defaults and item-count bounds. Schemas validate
//! configuration trees before any remote call is made.

use std::collections::BTreeMap;

use crate::diagnostics::Diagnostic;
use crate::value::{ConfigMap, ConfigValue};

/// Placeholder written in place of sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Shape of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    String,
    Bool,
    /// Ordered list of non-empty strings.
    StringList,
    /// Open-ended string-to-string map.
    StringMap,
    /// List of nested blocks, each described by its own schema.
    Blocks(Box<Schema>),
}

impl AttributeKind {
    fn expected(&self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Bool => "bool",
            AttributeKind::StringList => "list of strings",
            AttributeKind::StringMap => "map of strings",
            AttributeKind::Blocks(_) => "list of blocks",
        }
    }
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub description: Option<String>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    pub default: Option<ConfigValue>,
    /// Environment variable consulted when the attribute is unset.
    pub env_default: Option<String>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl Attribute {
    fn of(kind: AttributeKind) -> Self {
        Self {
            kind,
            description: None,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            env_default: None,
            min_items: None,
            max_items: None,
        }
    }

    fn required(kind: AttributeKind) -> Self {
        Self {
            required: true,
            ..Self::of(kind)
        }
    }

    fn optional(kind: AttributeKind) -> Self {
        Self {
            optional: true,
            ..Self::of(kind)
        }
    }

    #[must_use]
    pub fn required_string() -> Self {
        Self::required(AttributeKind::String)
    }

    #[must_use]
    pub fn optional_string() -> Self {
        Self::optional(AttributeKind::String)
    }

    /// A string assigned by the remote system; never set in configuration.
    #[must_use]
    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::of(AttributeKind::String)
        }
    }

    #[must_use]
    pub fn optional_bool() -> Self {
        Self::optional(AttributeKind::Bool)
    }

    #[must_use]
    pub fn required_string_list() -> Self {
        Self::required(AttributeKind::StringList)
    }

    #[must_use]
    pub fn optional_string_list() -> Self {
        Self::optional(AttributeKind::StringList)
    }

    #[must_use]
    pub fn optional_string_map() -> Self {
        Self::optional(AttributeKind::StringMap)
    }

    #[must_use]
    pub fn required_blocks(schema: Schema) -> Self {
        Self::required(AttributeKind::Blocks(Box::new(schema)))
    }

    #[must_use]
    pub fn optional_blocks(schema: Schema) -> Self {
        Self::optional(AttributeKind::Blocks(Box::new(schema)))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_env_default(mut self, var: impl Into<String>) -> Self {
        self.env_default = Some(var.into());
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    /// Computed and never settable from configuration.
    #[must_use]
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// The attribute set of a resource, provider or nested block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of attributes whose change forces replacement.
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes()
            .filter(|(_, a)| a.force_new)
            .map(|(name, _)| name)
    }

    /// Fill unset attributes with their static defaults, recursing into blocks.
    pub fn apply_defaults(&self, map: &mut ConfigMap) {
        for (name, attribute) in &self.attributes {
            let unset = map.get(name).map_or(true, ConfigValue::is_null);
            if unset {
                if let Some(default) = &attribute.default {
                    map.insert(name.clone(), default.clone());
                }
                continue;
            }

            if let (AttributeKind::Blocks(nested), Some(ConfigValue::List(items))) =
                (&attribute.kind, map.get_mut(name))
            {
                for item in items.iter_mut() {
                    if let ConfigValue::Map(block) = item {
                        nested.apply_defaults(block);
                    }
                }
            }
        }
    }

    /// Fill unset top-level attributes from their environment variables.
    pub fn apply_env_defaults<F>(&self, map: &mut ConfigMap, reader: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, attribute) in &self.attributes {
            let Some(var) = &attribute.env_default else {
                continue;
            };
            let unset = map.get(name).map_or(true, ConfigValue::is_null);
            if unset {
                if let Some(value) = reader(var) {
                    map.insert(name.clone(), ConfigValue::String(value));
                }
            }
        }
    }

    /// Validate a configuration block, returning every problem found.
    #[must_use]
    pub fn validate(&self, map: &ConfigMap) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        self.validate_at("", map, &mut diagnostics);
        diagnostics
    }

    fn validate_at(&self, prefix: &str, map: &ConfigMap, out: &mut Vec<Diagnostic>) {
        let path = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            }
        };

        for name in map.keys() {
            if !self.attributes.contains_key(name) {
                out.push(Diagnostic::error("unsupported attribute").with_attribute(path(name)));
            }
        }

        for (name, attribute) in &self.attributes {
            let value = map.get(name).filter(|v| !v.is_null());
            let attr_path = path(name);

            let Some(value) = value else {
                if attribute.required && attribute.default.is_none() {
                    out.push(
                        Diagnostic::error("missing required attribute").with_attribute(attr_path),
                    );
                }
                continue;
            };

            if attribute.is_computed_only() {
                out.push(
                    Diagnostic::error("attribute is computed by the remote system and cannot be set")
                        .with_attribute(attr_path),
                );
                continue;
            }

            validate_value(attribute, &attr_path, value, out);
        }
    }

    /// Force-new attributes whose value differs between two states.
    #[must_use]
    pub fn requires_replace(&self, prior: &ConfigMap, planned: &ConfigMap) -> Vec<String> {
        self.force_new_attributes()
            .filter(|name| normalized(prior.get(*name)) != normalized(planned.get(*name)))
            .map(ToString::to_string)
            .collect()
    }

    /// Configurable attributes whose value differs between two states.
    #[must_use]
    pub fn changed_attributes(&self, prior: &ConfigMap, planned: &ConfigMap) -> Vec<String> {
        self.attributes()
            .filter(|(_, a)| !a.is_computed_only())
            .filter(|(name, _)| normalized(prior.get(*name)) != normalized(planned.get(*name)))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Copy of `map` with sensitive values replaced, suitable for logging.
    #[must_use]
    pub fn redact(&self, map: &ConfigMap) -> ConfigMap {
        map.iter()
            .map(|(name, value)| {
                let redacted = match self.attributes.get(name) {
                    Some(a) if a.sensitive && !value.is_null() => ConfigValue::from(REDACTED),
                    Some(Attribute {
                        kind: AttributeKind::Blocks(nested),
                        ..
                    }) => match value {
                        ConfigValue::List(items) => ConfigValue::List(
                            items
                                .iter()
                                .map(|item| match item {
                                    ConfigValue::Map(block) => {
                                        ConfigValue::Map(nested.redact(block))
                                    }
                                    other => other.clone(),
                                })
                                .collect(),
                        ),
                        other => other.clone(),
                    },
                    _ => value.clone(),
                };
                (name.clone(), redacted)
            })
            .collect()
    }
}

/// Treat absent, null and empty collections alike when comparing states,
/// at every nesting level.
fn normalized(value: Option<&ConfigValue>) -> Option<ConfigValue> {
    value.and_then(normalize)
}

fn normalize(value: &ConfigValue) -> Option<ConfigValue> {
    match value {
        ConfigValue::Null => None,
        ConfigValue::List(items) if items.is_empty() => None,
        // Elements keep their position, so an emptied element stays as null.
        ConfigValue::List(items) => Some(ConfigValue::List(
            items
                .iter()
                .map(|item| normalize(item).unwrap_or(ConfigValue::Null))
                .collect(),
        )),
        ConfigValue::Map(map) => {
            let kept: ConfigMap = map
                .iter()
                .filter_map(|(key, value)| normalize(value).map(|v| (key.clone(), v)))
                .collect();
            (!kept.is_empty()).then_some(ConfigValue::Map(kept))
        }
        other => Some(other.clone()),
    }
}

fn validate_value(attribute: &Attribute, path: &str, value: &ConfigValue, out: &mut Vec<Diagnostic>) {
    let mismatch = |out: &mut Vec<Diagnostic>| {
        out.push(
            Diagnostic::error(format!(
                "expected {}, found {}",
                attribute.kind.expected(),
                value.kind()
            ))
            .with_attribute(path),
        );
    };

    match (&attribute.kind, value) {
        (AttributeKind::String, ConfigValue::String(_))
        | (AttributeKind::Bool, ConfigValue::Bool(_)) => {}
        (AttributeKind::StringList, ConfigValue::List(items)) => {
            check_item_count(attribute, path, items.len(), out);
            for (i, item) in items.iter().enumerate() {
                match item {
                    ConfigValue::String(s) if !s.is_empty() => {}
                    ConfigValue::String(_) => out.push(
                        Diagnostic::error("list elements must be non-empty strings")
                            .with_attribute(format!("{path}[{i}]")),
                    ),
                    other => out.push(
                        Diagnostic::error(format!("expected string, found {}", other.kind()))
                            .with_attribute(format!("{path}[{i}]")),
                    ),
                }
            }
        }
        (AttributeKind::StringMap, ConfigValue::Map(map)) => {
            for (key, item) in map {
                if item.as_str().is_none() {
                    out.push(
                        Diagnostic::error(format!("expected string, found {}", item.kind()))
                            .with_attribute(format!("{path}.{key}")),
                    );
                }
            }
        }
        (AttributeKind::Blocks(nested), ConfigValue::List(items)) => {
            check_item_count(attribute, path, items.len(), out);
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                match item {
                    ConfigValue::Map(block) => nested.validate_at(&item_path, block, out),
                    other => out.push(
                        Diagnostic::error(format!("expected block, found {}", other.kind()))
                            .with_attribute(item_path),
                    ),
                }
            }
        }
        _ => mismatch(out),
    }
}

fn check_item_count(attribute: &Attribute, path: &str, len: usize, out: &mut Vec<Diagnostic>) {
    if let Some(min) = attribute.min_items {
        if len < min {
            out.push(
                Diagnostic::error(format!("requires at least {min} item(s), found {len}"))
                    .with_attribute(path),
            );
        }
    }
    if let Some(max) = attribute.max_items {
        if len > max {
            out.push(
                Diagnostic::error(format!("allows at most {max} item(s), found {len}"))
                    .with_attribute(path),
            );
        }
    }
}
