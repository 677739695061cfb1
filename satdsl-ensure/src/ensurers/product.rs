//! Products, created under an organization or looked up through a subscription.

use super::organization_context;
use crate::{
    ensure_entity, require_attrs, EnsureContext, EnsureError, EnsureResult, Reconciler,
};
use async_trait::async_trait;
use satdsl_client::{ApiError, QueryParams};
use satdsl_model::{Attrs, Entity, EntityId, EntityKind, EntityRef, FieldValue};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

type ProductsByName = Arc<HashMap<String, Entity>>;

/// Products come in two flavours.
///
/// With a `subscription` reference the product is one the subscription
/// provides: it is looked up by name among the subscription's provided
/// products and never written. Without one it is a custom product, scoped
/// by organization and reconciled with the standard protocol.
///
/// The provided-products list of each subscription is fetched once and kept
/// for the life of the reconciler. Entries are never invalidated, so a
/// product added to a subscription after the first lookup is not seen.
#[derive(Debug, Default)]
pub struct ProductEnsurer {
    provided: RwLock<HashMap<EntityId, ProductsByName>>,
}

impl ProductEnsurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscriptions whose products have been fetched.
    pub async fn cached_subscriptions(&self) -> usize {
        self.provided.read().await.len()
    }

    async fn ensure_provided(
        &self,
        ctx: &EnsureContext<'_>,
        template: &Entity,
        subscription: &EntityRef,
    ) -> EnsureResult<Entity> {
        let name = match require_attrs(template, &["name"])?.get("name") {
            Some(FieldValue::Null) | None => String::new(),
            Some(value) => value.to_string(),
        };
        let ignored: Vec<_> = template
            .attr_names()
            .filter(|attr| !matches!(*attr, "name" | "subscription"))
            .collect();
        if !ignored.is_empty() {
            debug!("Ignoring {:?} when looking up a provided product", ignored);
        }

        let products = self.provided_products(ctx, subscription).await?;
        match products.get(&name) {
            Some(product) => {
                info!("Unchanged entity: {}", ctx.describe(product));
                Ok(product.clone())
            }
            None => Err(EnsureError::NotFound(format!(
                "Product in: {} with name: {} not found",
                ctx.describe(&Entity::from(subscription.clone())),
                name
            ))),
        }
    }

    async fn provided_products(
        &self,
        ctx: &EnsureContext<'_>,
        subscription: &EntityRef,
    ) -> EnsureResult<ProductsByName> {
        if let Some(products) = self.provided.read().await.get(&subscription.id) {
            return Ok(Arc::clone(products));
        }

        let path = format!("katello/api/v2/subscriptions/{}", subscription.id);
        let json = ctx.api.get_json(&path, &QueryParams::new()).await?;
        let products = Arc::new(products_by_name(&json)?);
        debug!(
            "Subscription #{} provides {} products",
            subscription.id,
            products.len()
        );

        let mut cache = self.provided.write().await;
        Ok(Arc::clone(cache.entry(subscription.id).or_insert(products)))
    }
}

fn products_by_name(subscription: &Value) -> EnsureResult<HashMap<String, Entity>> {
    let rows = subscription
        .get("provided_products")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ApiError::MalformedResponse("subscription without 'provided_products'".to_string())
        })?;

    rows.iter()
        .map(|row| -> EnsureResult<(String, Entity)> {
            let product = Entity::from_json(EntityKind::Product, row)?;
            let name = product.name().ok_or_else(|| {
                ApiError::MalformedResponse(format!("provided product without name: {row}"))
            })?;
            Ok((name, product))
        })
        .collect()
}

#[async_trait]
impl Reconciler for ProductEnsurer {
    async fn ensure(
        &self,
        ctx: &EnsureContext<'_>,
        kind: EntityKind,
        attrs: Attrs,
    ) -> EnsureResult<Entity> {
        match attrs.get("subscription") {
            Some(FieldValue::Reference(subscription)) => {
                let subscription = subscription.clone();
                let template = Entity::from_attrs(kind, attrs)?;
                self.ensure_provided(ctx, &template, &subscription).await
            }
            Some(_) => Err(EnsureError::MissingContext {
                kind,
                field: "subscription".to_string(),
            }),
            None => ensure_entity(self, ctx, kind, attrs).await,
        }
    }

    fn search_context(&self, template: &Entity) -> EnsureResult<QueryParams> {
        organization_context(template)
    }
}
