//! Provider bootstrap: connection configuration, the connectivity check and
//! the resource registry.

use std::collections::BTreeMap;

use es_provider_core::data::ResourceData;
use es_provider_core::error::ProviderResult;
use es_provider_core::lifecycle::{self, PlannedAction};
use es_provider_core::resource::{BoxedResource, ResourceRegistry};
use es_provider_core::schema::Schema;
use es_provider_core::value::ConfigValue;
use tracing::{debug, info, instrument};

use crate::client::SecurityClient;
use crate::config::ProviderConfig;
use crate::resources::{ApiKeyResource, RoleResource, UserResource};
use crate::schemas;

/// A configured provider: one shared client plus the resource handlers.
#[derive(Debug)]
pub struct SecurityProvider {
    client: SecurityClient,
    registry: ResourceRegistry<SecurityClient>,
}

impl SecurityProvider {
    /// Schema of the provider block.
    #[must_use]
    pub fn schema() -> Schema {
        schemas::provider()
    }

    /// Every resource type this provider manages.
    #[must_use]
    pub fn registry() -> ResourceRegistry<SecurityClient> {
        ResourceRegistry::new()
            .with(UserResource)
            .with(RoleResource)
            .with(ApiKeyResource)
    }

    /// Schemas of every resource type, keyed by type name.
    #[must_use]
    pub fn resource_schemas() -> BTreeMap<&'static str, Schema> {
        Self::registry().schemas()
    }

    /// Configure from a provider block, falling back to the process environment.
    pub async fn configure(tree: &ConfigValue) -> ProviderResult<Self> {
        Self::configure_with(tree, |key| std::env::var(key)).await
    }

    /// Configure from a provider block, falling back to a custom variable reader.
    pub async fn configure_with<F>(tree: &ConfigValue, reader: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let config = ProviderConfig::resolve(tree, reader)?;
        if config.is_unset() {
            debug!("No connection settings configured, using the default client");
        }
        Self::connect(&config).await
    }

    /// Build the client and verify connectivity. A failed ping aborts.
    #[instrument(skip_all)]
    pub async fn connect(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = SecurityClient::new(config)?;
        client.ping().await?;
        info!(url = %client.base_url(), "Connected to Elasticsearch");
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client without a connectivity check.
    #[must_use]
    pub fn from_client(client: SecurityClient) -> Self {
        Self {
            client,
            registry: Self::registry(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &SecurityClient {
        &self.client
    }

    /// The handler for `type_name`.
    pub fn resource(&self, type_name: &str) -> ProviderResult<BoxedResource<SecurityClient>> {
        self.registry.get(type_name)
    }

    /// Decide the transition for one resource without executing it.
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&ResourceData>,
        desired: Option<ConfigValue>,
    ) -> ProviderResult<PlannedAction> {
        let resource = self.resource(type_name)?;
        let desired = desired
            .map(|config| ResourceData::from_config(&resource.schema(), config))
            .transpose()?;

        Ok(lifecycle::plan_resource::<SecurityClient, _>(
            &*resource,
            prior,
            desired.as_ref().map(ResourceData::attributes),
        ))
    }

    /// Converge one resource from `prior` state to `desired` configuration.
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<ResourceData>,
        desired: Option<ConfigValue>,
    ) -> ProviderResult<Option<ResourceData>> {
        let resource = self.resource(type_name)?;
        lifecycle::apply(&*resource, &self.client, prior, desired).await
    }

    /// Re-read one resource; `None` means it no longer exists.
    pub async fn refresh(
        &self,
        type_name: &str,
        state: ResourceData,
    ) -> ProviderResult<Option<ResourceData>> {
        let resource = self.resource(type_name)?;
        lifecycle::refresh(&*resource, &self.client, state).await
    }
}
