//! Attribute schemas of the provider block and each resource type.

use es_provider_core::schema::{Attribute, Schema};

use crate::keys;

fn metadata() -> Attribute {
    Attribute::optional_string_map()
        .with_description("Arbitrary metadata. Keys that begin with _ are reserved for system usage.")
}

/// The provider block. Every field falls back to an environment variable.
#[must_use]
pub fn provider() -> Schema {
    Schema::new()
        .with_attribute(
            keys::URL,
            Attribute::optional_string()
                .with_env_default(keys::ENV_URL)
                .with_description("Elasticsearch endpoint, e.g. http://localhost:9200."),
        )
        .with_attribute(
            keys::USERNAME,
            Attribute::optional_string()
                .with_env_default(keys::ENV_USERNAME)
                .with_description("Username for basic authentication."),
        )
        .with_attribute(
            keys::PASSWORD,
            Attribute::optional_string()
                .sensitive()
                .with_env_default(keys::ENV_PASSWORD)
                .with_description("Password for basic authentication."),
        )
}

#[must_use]
pub fn user() -> Schema {
    Schema::new()
        .with_attribute(
            keys::USERNAME,
            Attribute::required_string()
                .force_new()
                .with_description("An identifier for the user."),
        )
        .with_attribute(
            keys::PASSWORD,
            Attribute::required_string()
                .sensitive()
                .with_description("The user's password. Must be at least 6 characters long."),
        )
        .with_attribute(
            keys::EMAIL,
            Attribute::optional_string()
                .sensitive()
                .with_description("The email of the user."),
        )
        .with_attribute(
            keys::ENABLED,
            Attribute::optional_bool()
                .with_default(true)
                .with_description("Specifies whether the user is enabled."),
        )
        .with_attribute(
            keys::FULL_NAME,
            Attribute::optional_string().with_description("The full name of the user."),
        )
        .with_attribute(
            keys::ROLES,
            Attribute::optional_string_list()
                .with_description("Roles the user has. They determine the user's access permissions."),
        )
        .with_attribute(keys::METADATA, metadata())
}

fn field_security() -> Schema {
    Schema::new()
        .with_attribute(keys::GRANT, Attribute::required_string_list().min_items(1))
        .with_attribute(
            keys::EXCEPT,
            Attribute::optional_string_list()
                .with_description("Fields excluded from the granted set."),
        )
}

fn index() -> Schema {
    Schema::new()
        .with_attribute(
            keys::NAMES,
            Attribute::required_string_list()
                .with_description("Indices or index name patterns this entry applies to."),
        )
        .with_attribute(
            keys::PRIVILEGES,
            Attribute::required_string_list()
                .with_description("Index level privileges granted on the listed indices."),
        )
        .with_attribute(
            keys::QUERY,
            Attribute::optional_string()
                .with_description("Search query restricting the documents the role can read."),
        )
        .with_attribute(
            keys::FIELD_SECURITY,
            Attribute::optional_blocks(field_security())
                .max_items(1)
                .with_description("Document fields the role can read."),
        )
        .with_attribute(
            keys::ALLOW_RESTRICTED_INDICES,
            Attribute::optional_bool().with_default(false),
        )
}

fn application() -> Schema {
    Schema::new()
        .with_attribute(
            keys::NAME,
            Attribute::required_string()
                .with_description("The application this entry applies to."),
        )
        .with_attribute(
            keys::PRIVILEGES,
            Attribute::required_string_list()
                .with_description("Application privileges or actions."),
        )
        .with_attribute(
            keys::RESOURCES,
            Attribute::required_string_list()
                .with_description("Resources the privileges apply to."),
        )
}

/// The role body shared by roles and API-key role descriptors.
fn role_body() -> Schema {
    Schema::new()
        .with_attribute(
            keys::NAME,
            Attribute::required_string().with_description("The name of the role."),
        )
        .with_attribute(
            keys::APPLICATIONS,
            Attribute::optional_blocks(application())
                .with_description("Application privilege entries."),
        )
        .with_attribute(
            keys::CLUSTER,
            Attribute::required_string_list()
                .min_items(1)
                .with_description("Cluster level actions users with this role may execute."),
        )
        .with_attribute(
            keys::INDICES,
            Attribute::optional_blocks(index()).with_description("Index permission entries."),
        )
        .with_attribute(keys::METADATA, metadata())
        .with_attribute(
            keys::RUN_AS,
            Attribute::optional_string_list()
                .with_description("Users the owners of this role can impersonate."),
        )
}

#[must_use]
pub fn role() -> Schema {
    // The name is the tracking key; renaming must not leave the old role behind.
    role_body().with_attribute(
        keys::NAME,
        Attribute::required_string()
            .force_new()
            .with_description("The name of the role."),
    )
}

#[must_use]
pub fn api_key() -> Schema {
    Schema::new()
        .with_attribute(
            keys::NAME,
            Attribute::required_string()
                .force_new()
                .with_description("Name of the API key."),
        )
        .with_attribute(
            keys::EXPIRATION,
            Attribute::optional_string()
                .force_new()
                .with_description("Expiration time, e.g. 1d. By default API keys never expire."),
        )
        .with_attribute(keys::API_KEY, Attribute::computed_string().sensitive())
        .with_attribute(
            keys::ROLE_DESCRIPTORS,
            Attribute::optional_blocks(role_body())
                .force_new()
                .with_description(
                    "Roles limiting the key's permissions. When empty the key gets a snapshot \
                     of the authenticated user's permissions.",
                ),
        )
}
