//! `elasticsearch_user` handler.

use async_trait::async_trait;
use es_provider_core::data::ResourceData;
use es_provider_core::error::ProviderResult;
use es_provider_core::resource::Resource;
use es_provider_core::schema::Schema;
use tracing::{info, instrument, warn};

use super::USER_TYPE;
use crate::client::SecurityClient;
use crate::mapper::AttributeMapper;
use crate::schemas;

/// Native realm users, keyed by username.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserResource;

impl UserResource {
    /// PUT is an upsert, so create and update share one path.
    async fn put(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let user = AttributeMapper::user_from_config(&data.reader())?;
        client.put_user(&user).await?;
        info!(username = %user.username, "User created or updated");

        data.set_id(user.username);
        self.read(client, data).await
    }
}

#[async_trait]
impl Resource<SecurityClient> for UserResource {
    fn type_name(&self) -> &'static str {
        USER_TYPE
    }

    fn schema(&self) -> Schema {
        schemas::user()
    }

    #[instrument(skip(self, client, data))]
    async fn create(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.put(client, data).await
    }

    #[instrument(skip(self, client, data), fields(username = ?data.id()))]
    async fn read(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let username = data.require_id(USER_TYPE)?.to_string();

        match client.get_user(&username).await? {
            Some(user) => {
                for (key, value) in AttributeMapper::user_to_config(&user) {
                    data.set(key, value);
                }
            }
            None => {
                warn!(username = %username, "User no longer exists, marking as absent");
                data.clear_id();
            }
        }
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(username = ?data.id()))]
    async fn update(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.put(client, data).await
    }

    #[instrument(skip(self, client, data), fields(username = ?data.id()))]
    async fn delete(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let username = data.require_id(USER_TYPE)?.to_string();
        client.delete_user(&username).await?;
        info!(username = %username, "User deleted");
        Ok(())
    }
}
