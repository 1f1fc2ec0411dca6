//! Attribute mapper: converts between configuration trees and Security API records.
//!
//! Every conversion is pure. Reads go through [`FieldReader`], so a value of
//! the wrong shape fails with the full attribute path of the offending node.

use std::collections::BTreeMap;

use es_provider_core::mapping::{FieldReader, MappingResult};
use es_provider_core::value::{ConfigMap, ConfigValue};

use crate::keys;
use crate::models::{ApiKeyRequest, ApplicationPrivilege, FieldSecurity, IndexPermission, Role, User};

/// Handles mapping between configuration trees and Security API records.
pub struct AttributeMapper;

impl AttributeMapper {
    // ── Users ─────────────────────────────────────────────────────────

    /// Map a user block to a [`User`] request body.
    pub fn user_from_config(reader: &FieldReader<'_>) -> MappingResult<User> {
        Ok(User {
            username: reader.string(keys::USERNAME)?,
            password: reader.optional_string(keys::PASSWORD)?,
            email: reader.optional_string(keys::EMAIL)?,
            enabled: reader.bool_or(keys::ENABLED, true)?,
            full_name: reader.optional_string(keys::FULL_NAME)?,
            roles: reader.string_list(keys::ROLES)?,
            metadata: reader.string_map(keys::METADATA)?,
        })
    }

    /// Map a [`User`] back to configuration attributes.
    ///
    /// The password is only written when the record carries one; the API
    /// never returns it, so a read leaves the configured value in place.
    #[must_use]
    pub fn user_to_config(user: &User) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(keys::USERNAME.to_string(), user.username.as_str().into());
        if let Some(password) = &user.password {
            map.insert(keys::PASSWORD.to_string(), password.into());
        }
        map.insert(keys::EMAIL.to_string(), user.email.clone().into());
        map.insert(keys::ENABLED.to_string(), user.enabled.into());
        map.insert(keys::FULL_NAME.to_string(), user.full_name.clone().into());
        map.insert(keys::ROLES.to_string(), user.roles.clone().into());
        map.insert(keys::METADATA.to_string(), user.metadata.clone().into());
        map
    }

    // ── Roles ─────────────────────────────────────────────────────────

    /// Map a role block to its name and [`Role`] request body.
    pub fn role_from_config(reader: &FieldReader<'_>) -> MappingResult<(String, Role)> {
        let name = reader.string(keys::NAME)?;
        let role = Role {
            cluster: reader.string_list(keys::CLUSTER)?,
            indices: reader
                .blocks(keys::INDICES)?
                .iter()
                .map(Self::index_from_config)
                .collect::<MappingResult<_>>()?,
            applications: reader
                .blocks(keys::APPLICATIONS)?
                .iter()
                .map(Self::application_from_config)
                .collect::<MappingResult<_>>()?,
            run_as: reader.string_list(keys::RUN_AS)?,
            metadata: reader.string_map(keys::METADATA)?,
        };
        Ok((name, role))
    }

    /// Map a [`Role`] back to configuration attributes.
    #[must_use]
    pub fn role_to_config(name: &str, role: &Role) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(keys::NAME.to_string(), name.into());
        map.insert(keys::CLUSTER.to_string(), role.cluster.clone().into());
        map.insert(
            keys::INDICES.to_string(),
            ConfigValue::List(
                role.indices
                    .iter()
                    .map(|index| ConfigValue::Map(Self::index_to_config(index)))
                    .collect(),
            ),
        );
        map.insert(
            keys::APPLICATIONS.to_string(),
            ConfigValue::List(
                role.applications
                    .iter()
                    .map(|app| ConfigValue::Map(Self::application_to_config(app)))
                    .collect(),
            ),
        );
        map.insert(keys::RUN_AS.to_string(), role.run_as.clone().into());
        map.insert(keys::METADATA.to_string(), role.metadata.clone().into());
        map
    }

    /// Map one `indices` entry.
    pub fn index_from_config(reader: &FieldReader<'_>) -> MappingResult<IndexPermission> {
        let field_security = reader
            .single_block(keys::FIELD_SECURITY)?
            .map(|fs| Self::field_security_from_config(&fs))
            .transpose()?;

        Ok(IndexPermission {
            names: reader.string_list(keys::NAMES)?,
            privileges: reader.string_list(keys::PRIVILEGES)?,
            field_security,
            query: reader.optional_string(keys::QUERY)?,
            allow_restricted_indices: reader.bool_or(keys::ALLOW_RESTRICTED_INDICES, false)?,
        })
    }

    #[must_use]
    pub fn index_to_config(index: &IndexPermission) -> ConfigMap {
        let field_security = index
            .field_security
            .iter()
            .map(|fs| ConfigValue::Map(Self::field_security_to_config(fs)))
            .collect::<Vec<_>>();

        let mut map = ConfigMap::new();
        map.insert(keys::NAMES.to_string(), index.names.clone().into());
        map.insert(keys::PRIVILEGES.to_string(), index.privileges.clone().into());
        map.insert(keys::FIELD_SECURITY.to_string(), ConfigValue::List(field_security));
        map.insert(keys::QUERY.to_string(), index.query.clone().into());
        map.insert(
            keys::ALLOW_RESTRICTED_INDICES.to_string(),
            index.allow_restricted_indices.into(),
        );
        map
    }

    pub fn field_security_from_config(reader: &FieldReader<'_>) -> MappingResult<FieldSecurity> {
        Ok(FieldSecurity {
            grant: reader.string_list(keys::GRANT)?,
            except: reader.string_list(keys::EXCEPT)?,
        })
    }

    #[must_use]
    pub fn field_security_to_config(fs: &FieldSecurity) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(keys::GRANT.to_string(), fs.grant.clone().into());
        map.insert(keys::EXCEPT.to_string(), fs.except.clone().into());
        map
    }

    /// Map one `applications` entry. The block's `name` is the wire `application`.
    pub fn application_from_config(reader: &FieldReader<'_>) -> MappingResult<ApplicationPrivilege> {
        Ok(ApplicationPrivilege {
            application: reader.string(keys::NAME)?,
            privileges: reader.string_list(keys::PRIVILEGES)?,
            resources: reader.string_list(keys::RESOURCES)?,
        })
    }

    #[must_use]
    pub fn application_to_config(app: &ApplicationPrivilege) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(keys::NAME.to_string(), app.application.as_str().into());
        map.insert(keys::PRIVILEGES.to_string(), app.privileges.clone().into());
        map.insert(keys::RESOURCES.to_string(), app.resources.clone().into());
        map
    }

    // ── API keys ──────────────────────────────────────────────────────

    /// Map an API-key block to the create request body.
    pub fn api_key_from_config(reader: &FieldReader<'_>) -> MappingResult<ApiKeyRequest> {
        Ok(ApiKeyRequest {
            name: reader.string(keys::NAME)?,
            expiration: reader.optional_string(keys::EXPIRATION)?,
            role_descriptors: Self::role_descriptors_from_config(reader)?,
        })
    }

    /// Map the `role_descriptors` block list into the wire object keyed by role name.
    pub fn role_descriptors_from_config(
        reader: &FieldReader<'_>,
    ) -> MappingResult<BTreeMap<String, Role>> {
        reader
            .blocks(keys::ROLE_DESCRIPTORS)?
            .iter()
            .map(Self::role_from_config)
            .collect()
    }
}
