//! Resource handler trait and registry.
//!
//! A resource handler is a small state machine over {absent, present}. The
//! client type `C` is owned by provider bootstrap and handed to every call;
//! handlers hold no connection state of their own.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::Schema;

/// CRUD operations for one resource type.
#[async_trait]
pub trait Resource<C: Send + Sync>: Send + Sync {
    /// Resource type name as used in configuration, e.g. `elasticsearch_user`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema of the resource block.
    fn schema(&self) -> Schema;

    /// Create the remote object and record its tracking key in `data`.
    async fn create(&self, client: &C, data: &mut ResourceData) -> ProviderResult<()>;

    /// Refresh `data` from the remote object.
    ///
    /// When the object no longer exists the tracking key is cleared.
    async fn read(&self, client: &C, data: &mut ResourceData) -> ProviderResult<()>;

    /// Update the remote object in place.
    async fn update(&self, _client: &C, _data: &mut ResourceData) -> ProviderResult<()> {
        Err(ProviderError::UpdateNotSupported {
            resource_type: self.type_name().to_string(),
        })
    }

    /// Remove the remote object.
    async fn delete(&self, client: &C, data: &mut ResourceData) -> ProviderResult<()>;

    /// Whether [`Resource::update`] is implemented.
    fn supports_update(&self) -> bool {
        true
    }
}

/// A shared, type-erased resource handler.
pub type BoxedResource<C> = Arc<dyn Resource<C>>;

/// Resource handlers keyed by type name.
pub struct ResourceRegistry<C: Send + Sync> {
    resources: BTreeMap<&'static str, BoxedResource<C>>,
}

impl<C: Send + Sync> Default for ResourceRegistry<C> {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }
}

impl<C: Send + Sync> ResourceRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous handler of the same type.
    pub fn register<R>(&mut self, resource: R)
    where
        R: Resource<C> + 'static,
    {
        self.resources.insert(resource.type_name(), Arc::new(resource));
    }

    #[must_use]
    pub fn with<R>(mut self, resource: R) -> Self
    where
        R: Resource<C> + 'static,
    {
        self.register(resource);
        self
    }

    /// Look up the handler for `type_name`.
    pub fn get(&self, type_name: &str) -> ProviderResult<BoxedResource<C>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownResourceType {
                resource_type: type_name.to_string(),
            })
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Schemas of every registered resource type.
    #[must_use]
    pub fn schemas(&self) -> BTreeMap<&'static str, Schema> {
        self.resources
            .iter()
            .map(|(name, resource)| (*name, resource.schema()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<C: Send + Sync> std::fmt::Debug for ResourceRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}
