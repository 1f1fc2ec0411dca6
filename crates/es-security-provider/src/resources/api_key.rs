//! `elasticsearch_api_key` handler.
//!
//! API keys are create-only: the id and secret are assigned by the cluster,
//! and every configurable attribute forces a new key. Deleting a key
//! invalidates it; the cluster keeps reporting invalidated keys, which are
//! treated as absent.

use async_trait::async_trait;
use es_provider_core::data::ResourceData;
use es_provider_core::error::{ProviderError, ProviderResult};
use es_provider_core::resource::Resource;
use es_provider_core::schema::Schema;
use tracing::{info, instrument, warn};

use super::API_KEY_TYPE;
use crate::client::SecurityClient;
use crate::keys;
use crate::mapper::AttributeMapper;
use crate::schemas;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiKeyResource;

#[async_trait]
impl Resource<SecurityClient> for ApiKeyResource {
    fn type_name(&self) -> &'static str {
        API_KEY_TYPE
    }

    fn schema(&self) -> Schema {
        schemas::api_key()
    }

    #[instrument(skip(self, client, data))]
    async fn create(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let request = AttributeMapper::api_key_from_config(&data.reader())?;
        let created = client.create_api_key(&request).await?;
        info!(id = %created.id, name = %created.name, "API key created");

        data.set_id(created.id.as_str());
        data.set(keys::API_KEY, created.api_key);
        data.set(keys::NAME, created.name);
        Ok(())
    }

    /// The secret is only returned at creation, so it is left untouched here.
    /// `expiration` is configured as a duration while the cluster reports a
    /// timestamp, so it is not overwritten either.
    #[instrument(skip(self, client, data), fields(id = ?data.id()))]
    async fn read(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.require_id(API_KEY_TYPE)?.to_string();
        let mut response = client.get_api_key(&id).await?;

        let key = match response.api_keys.len() {
            0 => return Err(ProviderError::not_found("API key")),
            1 => response.api_keys.remove(0),
            count => {
                return Err(ProviderError::Ambiguous {
                    resource: "API key".to_string(),
                    count,
                })
            }
        };

        if key.invalidated {
            warn!(id = %id, "API key has been invalidated, marking as absent");
            data.clear_id();
            return Ok(());
        }

        data.set_id(key.id);
        data.set(keys::NAME, key.name);
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(id = ?data.id()))]
    async fn delete(&self, client: &SecurityClient, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.require_id(API_KEY_TYPE)?.to_string();
        client.invalidate_api_key(&id).await?;
        info!(id = %id, "API key invalidated");
        Ok(())
    }

    fn supports_update(&self) -> bool {
        false
    }
}
