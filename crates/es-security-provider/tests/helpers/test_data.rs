//! Configuration trees for integration tests.

#![allow(dead_code)]

use es_provider_core::value::ConfigValue;
use serde_json::{json, Value};

/// Convert a JSON literal into a configuration tree.
pub fn tree(value: Value) -> ConfigValue {
    ConfigValue::from_json(value).expect("test configuration must not contain numbers")
}

/// A user block with roles and metadata.
pub fn user_config(username: &str) -> ConfigValue {
    tree(json!({
        "username": username,
        "password": "s3cret-pw",
        "email": format!("{username}@example.com"),
        "full_name": "Test User",
        "roles": ["viewer", "editor"],
        "metadata": { "team": "search" }
    }))
}

/// A role block with index, field security and application entries.
pub fn role_config(name: &str) -> ConfigValue {
    tree(json!({
        "name": name,
        "cluster": ["monitor"],
        "indices": [{
            "names": ["logs-*"],
            "privileges": ["read"],
            "field_security": [{ "grant": ["message", "@timestamp"] }]
        }],
        "applications": [{
            "name": "kibana-.kibana",
            "privileges": ["read"],
            "resources": ["*"]
        }],
        "run_as": ["svc_reporting"],
        "metadata": { "owner": "observability" }
    }))
}

/// An API-key block limited by one role descriptor.
pub fn api_key_config(name: &str) -> ConfigValue {
    tree(json!({
        "name": name,
        "expiration": "1d",
        "role_descriptors": [{
            "name": "ci",
            "cluster": ["monitor"],
            "indices": [{ "names": ["builds-*"], "privileges": ["write"] }]
        }]
    }))
}
