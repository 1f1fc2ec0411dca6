//! Attribute names used in configuration trees.

pub const URL: &str = "url";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const EMAIL: &str = "email";
pub const ENABLED: &str = "enabled";
pub const FULL_NAME: &str = "full_name";
pub const ROLES: &str = "roles";
pub const METADATA: &str = "metadata";

pub const NAME: &str = "name";
pub const CLUSTER: &str = "cluster";
pub const INDICES: &str = "indices";
pub const APPLICATIONS: &str = "applications";
pub const RUN_AS: &str = "run_as";

pub const NAMES: &str = "names";
pub const PRIVILEGES: &str = "privileges";
pub const RESOURCES: &str = "resources";
pub const QUERY: &str = "query";
pub const FIELD_SECURITY: &str = "field_security";
pub const GRANT: &str = "grant";
pub const EXCEPT: &str = "except";
pub const ALLOW_RESTRICTED_INDICES: &str = "allow_restricted_indices";

pub const EXPIRATION: &str = "expiration";
pub const API_KEY: &str = "api_key";
pub const ROLE_DESCRIPTORS: &str = "role_descriptors";

/// Environment fallbacks for the provider block.
pub const ENV_URL: &str = "ELASTICSEARCH_URL";
pub const ENV_USERNAME: &str = "ELASTICSEARCH_USER";
pub const ENV_PASSWORD: &str = "ELASTICSEARCH_PASSWORD";
