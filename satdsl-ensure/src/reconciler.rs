//! The generic find, compare and upsert protocol.

use crate::compare::{differing_attrs, similar_entities};
use crate::{EnsureError, EnsureResult, HandlerRegistry};
use async_trait::async_trait;
use satdsl_client::{build_query, QueryParams, RemoteApi};
use satdsl_model::{Attrs, Entity, EntityKind, FieldValue, REDACTED};
use tracing::{debug, info, warn};

/// What a reconciler needs from its surroundings during one `ensure` call.
#[derive(Clone, Copy)]
pub struct EnsureContext<'a> {
    pub api: &'a dyn RemoteApi,
    pub registry: &'a HandlerRegistry,
}

impl<'a> EnsureContext<'a> {
    pub fn new(api: &'a dyn RemoteApi, registry: &'a HandlerRegistry) -> Self {
        Self { api, registry }
    }

    /// Display form of `entity`, as rendered by the handler of its kind.
    pub fn describe(&self, entity: &Entity) -> String {
        match self.registry.resolve(entity.kind) {
            Ok(handler) => handler.describe(entity),
            Err(_) => describe_by_name(entity),
        }
    }

    /// Display form of an attribute value. References render through the
    /// handler of the kind they point at.
    pub fn describe_value(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Reference(r) => self.describe(&Entity::from(r.clone())),
            FieldValue::List(items) => {
                let parts: Vec<_> = items.iter().map(|v| self.describe_value(v)).collect();
                format!("[{}]", parts.join(", "))
            }
            other => other.to_string(),
        }
    }
}

/// Per-kind reconciliation strategy.
///
/// The provided methods implement the standard protocol: the key is
/// `{name}`, there is no search context, and `ensure` runs
/// [`ensure_entity`]. Kinds with different identity or scoping override
/// the hooks; kinds that never write override `ensure` itself.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn ensure(
        &self,
        ctx: &EnsureContext<'_>,
        kind: EntityKind,
        attrs: Attrs,
    ) -> EnsureResult<Entity> {
        ensure_entity(self, ctx, kind, attrs).await
    }

    /// The identity attributes used to search for an existing entity.
    fn key_attrs(&self, template: &Entity) -> EnsureResult<Attrs> {
        require_attrs(template, &["name"])
    }

    /// Extra request parameters scoping the search.
    fn search_context(&self, template: &Entity) -> EnsureResult<QueryParams> {
        let _ = template;
        Ok(QueryParams::new())
    }

    fn describe(&self, entity: &Entity) -> String {
        describe_by_name(entity)
    }
}

/// Runs the standard protocol with `reconciler`'s key and context hooks.
///
/// At most one write happens unless an update races with a remote delete,
/// in which case the 404 is followed by a create.
pub async fn ensure_entity<R: Reconciler + ?Sized>(
    reconciler: &R,
    ctx: &EnsureContext<'_>,
    kind: EntityKind,
    attrs: Attrs,
) -> EnsureResult<Entity> {
    let mut template = Entity::from_attrs(kind, attrs)?;
    debug!("Desired {} state: {:?}", kind, template.redacted().values);

    let key = reconciler.key_attrs(&template)?;
    let context = reconciler.search_context(&template)?;

    if let Some(found) = find_by_key(ctx.api, kind, &key, &context).await? {
        let existing = ctx.api.read(&found).await?;
        debug!("Current {} state: {:?}", kind, existing.redacted().values);

        template.id = existing.id.or(found.id);
        if similar_entities(&existing, &template)? {
            info!("Unchanged entity: {}", ctx.describe(&existing));
            return Ok(existing);
        }
        log_entity_diff(ctx, &existing, &template)?;
    }

    update_or_create(ctx, &template).await
}

/// Searches by `key` within `context`, returning the first match.
pub async fn find_by_key(
    api: &dyn RemoteApi,
    kind: EntityKind,
    key: &Attrs,
    context: &QueryParams,
) -> EnsureResult<Option<Entity>> {
    let query = build_query(key);
    let mut matches = api.search(kind, &query, context).await?;

    if matches.len() > 1 {
        warn!(
            "{} {} entities match '{}', using the first",
            matches.len(),
            kind,
            query
        );
    }
    Ok((!matches.is_empty()).then(|| matches.swap_remove(0)))
}

/// Updates `template` in place when it has an id, else creates it.
pub async fn update_or_create(ctx: &EnsureContext<'_>, template: &Entity) -> EnsureResult<Entity> {
    if template.id.is_some() {
        match ctx.api.update(template).await {
            Ok(updated) => {
                info!("Updated entity: {}", ctx.describe(&updated));
                return Ok(updated);
            }
            Err(err) if err.is_not_found() => {
                warn!(
                    "{} disappeared before it could be updated, creating it",
                    ctx.describe(template)
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    let created = ctx.api.create(template).await?;
    info!("Created entity: {}", ctx.describe(&created));
    Ok(created)
}

/// Logs one line per attribute where `existing` differs from `desired`.
pub fn log_entity_diff(
    ctx: &EnsureContext<'_>,
    existing: &Entity,
    desired: &Entity,
) -> EnsureResult<()> {
    let desc = ctx.describe(existing);
    for attr in differing_attrs(existing, desired)? {
        let render = |entity: &Entity| match entity.get(attr) {
            Some(_) if entity.kind.is_secret(attr) => REDACTED.to_string(),
            Some(value) => ctx.describe_value(value),
            None => String::new(),
        };
        let (old, new) = (render(existing), render(desired));
        info!(
            "{} {} attribute is {}, should be {}",
            desc,
            attr,
            old,
            new
        );
    }
    Ok(())
}

/// Copies `names` out of the template, failing on the first one not set.
pub fn require_attrs(template: &Entity, names: &[&str]) -> EnsureResult<Attrs> {
    names
        .iter()
        .map(|&name| {
            template
                .get(name)
                .map(|value| (name.to_string(), value.clone()))
                .ok_or_else(|| EnsureError::MissingKey {
                    kind: template.kind,
                    field: name.to_string(),
                })
        })
        .collect()
}

/// `Kind "name"`, falling back to [`describe_by_id`].
pub fn describe_by_name(entity: &Entity) -> String {
    match entity.name() {
        Some(name) => format!("{} \"{}\"", entity.kind, name),
        None => describe_by_id(entity),
    }
}

/// `Kind #id`, or `Kind (unsaved)` before the entity exists remotely.
pub fn describe_by_id(entity: &Entity) -> String {
    match entity.id {
        Some(id) => format!("{} #{}", entity.kind, id),
        None => format!("{} (unsaved)", entity.kind),
    }
}
