//! `elasticsearch_role` handler.

use async_trait::async_trait;
use es_provider_core::data::ResourceData;
use es_provider_core::error::ProviderResult;
use es_provider_core::resource::Resource;
use es_provider_core::schema::Schema;
use tracing::{info, instrument, warn};

use super::ROLE_TYPE;
use crate::client::SecurityClient;
use crate::mapper::AttributeMapper;
use crate::schemas;

/// Native realm roles, keyed by role name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResource;

impl RoleResource {
    async fn put(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let (name, role) = AttributeMapper::role_from_config(&data.reader())?;
        client.put_role(&name, &role).await?;
        info!(role = %name, "Role created or updated");

        data.set_id(name);
        self.read(client, data).await
    }
}

#[async_trait]
impl Resource<SecurityClient> for RoleResource {
    fn type_name(&self) -> &'static str {
        ROLE_TYPE
    }

    fn schema(&self) -> Schema {
        schemas::role()
    }

    #[instrument(skip(self, client, data))]
    async fn create(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.put(client, data).await
    }

    #[instrument(skip(self, client, data), fields(role = ?data.id()))]
    async fn read(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let name = data.require_id(ROLE_TYPE)?.to_string();

        match client.get_role(&name).await? {
            Some(role) => {
                for (key, value) in AttributeMapper::role_to_config(&name, &role) {
                    data.set(key, value);
                }
            }
            None => {
                warn!(role = %name, "Role no longer exists, marking as absent");
                data.clear_id();
            }
        }
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(role = ?data.id()))]
    async fn update(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.put(client, data).await
    }

    #[instrument(skip(self, client, data), fields(role = ?data.id()))]
    async fn delete(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let name = data.require_id(ROLE_TYPE)?.to_string();
        client.delete_role(&name).await?;
        info!(role = %name, "Role deleted");
        Ok(())
    }
}
