//! Read-only subscription lookup.

use super::organization_ref;
use crate::{require_attrs, EnsureContext, EnsureError, EnsureResult, Reconciler};
use async_trait::async_trait;
use satdsl_client::{build_query, QueryParams};
use satdsl_model::{Attrs, Entity, EntityKind};
use tracing::{info, warn};

/// Subscriptions are imported with a manifest and cannot be created here.
///
/// `ensure` only verifies that the organization holds a subscription for
/// `product_name` and returns it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionEnsurer;

#[async_trait]
impl Reconciler for SubscriptionEnsurer {
    async fn ensure(
        &self,
        ctx: &EnsureContext<'_>,
        kind: EntityKind,
        attrs: Attrs,
    ) -> EnsureResult<Entity> {
        let template = Entity::from_attrs(kind, attrs)?;
        let key = self.key_attrs(&template)?;
        let org = organization_ref(&template)?;

        let path = format!("katello/api/v2/organizations/{}/subscriptions", org.id);
        let query = build_query(&key);
        let mut params = QueryParams::new();
        params.insert("search".to_string(), query.clone());

        let mut found = ctx.api.fetch_handles(kind, &path, &params).await?;
        if found.is_empty() {
            return Err(EnsureError::NotFound(format!(
                "Subscription with {} in {} not found",
                query,
                ctx.describe(&Entity::from(org.clone()))
            )));
        }
        if found.len() > 1 {
            warn!("{} subscriptions match '{}', using the first", found.len(), query);
        }

        let subscription = found.swap_remove(0);
        info!("Unchanged entity: {}", ctx.describe(&subscription));
        Ok(subscription)
    }

    fn key_attrs(&self, template: &Entity) -> EnsureResult<Attrs> {
        require_attrs(template, &["product_name"])
    }
}
