//! Lifecycle planning and execution.
//!
//! [`plan`] compares prior state with the desired configuration and decides a
//! single transition; [`apply`] runs that transition against a handler.
//! Transitions are executed once: no retries, no rollback.

use tracing::{debug, info, warn};

use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::value::{ConfigMap, ConfigValue};

/// The transition decided for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    /// In-place update of the listed attributes.
    Update { attributes: Vec<String> },
    /// Destroy then create, triggered by the listed force-new attributes.
    Replace { attributes: Vec<String> },
    Delete,
    NoOp,
}

impl PlannedAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedAction::Create => "create",
            PlannedAction::Update { .. } => "update",
            PlannedAction::Replace { .. } => "replace",
            PlannedAction::Delete => "delete",
            PlannedAction::NoOp => "no-op",
        }
    }
}

/// Decide the transition from `prior` state to `desired` configuration.
///
/// A prior state without a tracking key counts as absent. `desired` is
/// expected to have schema defaults applied already.
#[must_use]
pub fn plan(
    schema: &Schema,
    prior: Option<&ResourceData>,
    desired: Option<&ConfigMap>,
) -> PlannedAction {
    let prior = prior.filter(|p| p.is_present());

    match (prior, desired) {
        (None, None) => PlannedAction::NoOp,
        (None, Some(_)) => PlannedAction::Create,
        (Some(_), None) => PlannedAction::Delete,
        (Some(prior), Some(desired)) => {
            let replace = schema.requires_replace(prior.attributes(), desired);
            if !replace.is_empty() {
                return PlannedAction::Replace {
                    attributes: replace,
                };
            }
            let changed = schema.changed_attributes(prior.attributes(), desired);
            if changed.is_empty() {
                PlannedAction::NoOp
            } else {
                PlannedAction::Update {
                    attributes: changed,
                }
            }
        }
    }
}

/// Like [`plan`], but an update of a handler without update support becomes
/// a replacement.
#[must_use]
pub fn plan_resource<C, R>(
    resource: &R,
    prior: Option<&ResourceData>,
    desired: Option<&ConfigMap>,
) -> PlannedAction
where
    C: Send + Sync,
    R: Resource<C> + ?Sized,
{
    match plan(&resource.schema(), prior, desired) {
        PlannedAction::Update { attributes } if !resource.supports_update() => {
            PlannedAction::Replace { attributes }
        }
        action => action,
    }
}

/// Validate `desired`, plan against `prior` and execute the transition.
///
/// Returns the new state, or `None` when the resource no longer exists.
pub async fn apply<C, R>(
    resource: &R,
    client: &C,
    prior: Option<ResourceData>,
    desired: Option<ConfigValue>,
) -> ProviderResult<Option<ResourceData>>
where
    C: Send + Sync,
    R: Resource<C> + ?Sized,
{
    let schema = resource.schema();
    let desired = desired
        .map(|config| ResourceData::from_config(&schema, config))
        .transpose()?;

    let action = plan_resource::<C, R>(
        resource,
        prior.as_ref(),
        desired.as_ref().map(ResourceData::attributes),
    );

    debug!(
        resource_type = resource.type_name(),
        action = action.as_str(),
        "Applying planned action"
    );

    match (action, prior, desired) {
        (PlannedAction::Create, _, Some(mut data)) => {
            resource.create(client, &mut data).await?;
            Ok(Some(data))
        }
        (PlannedAction::Update { .. }, Some(prior), Some(desired)) => {
            let mut data = carry_computed(&schema, &prior, desired);
            if let Some(id) = prior.id() {
                data.set_id(id);
            }
            resource.update(client, &mut data).await?;
            Ok(Some(data))
        }
        (PlannedAction::Replace { attributes }, Some(mut prior), Some(mut data)) => {
            info!(
                resource_type = resource.type_name(),
                attributes = ?attributes,
                "Replacing resource"
            );
            resource.delete(client, &mut prior).await?;
            resource.create(client, &mut data).await?;
            Ok(Some(data))
        }
        (PlannedAction::Delete, Some(mut prior), _) => {
            resource.delete(client, &mut prior).await?;
            Ok(None)
        }
        (_, prior, _) => Ok(prior.filter(ResourceData::is_present)),
    }
}

/// Re-read a resource; `None` means it was deleted outside of configuration.
pub async fn refresh<C, R>(
    resource: &R,
    client: &C,
    mut state: ResourceData,
) -> ProviderResult<Option<ResourceData>>
where
    C: Send + Sync,
    R: Resource<C> + ?Sized,
{
    let id = state.require_id(resource.type_name())?.to_string();
    resource.read(client, &mut state).await?;

    if state.is_present() {
        Ok(Some(state))
    } else {
        warn!(
            resource_type = resource.type_name(),
            id = %id,
            "Resource no longer exists remotely"
        );
        Ok(None)
    }
}

// Computed attributes are never configured, so an update would otherwise
// drop values only the remote system knows (e.g. generated secrets).
fn carry_computed(schema: &Schema, prior: &ResourceData, mut desired: ResourceData) -> ResourceData {
    for (name, attribute) in schema.attributes() {
        if attribute.is_computed_only() {
            if let Some(value) = prior.get(name) {
                desired.set(name, value.clone());
            }
        }
    }
    desired
}
