//! Kind-to-reconciler lookup, walking each kind's lineage.

use crate::ensurers::{
    EntityEnsurer, OperatingSystemEnsurer, OrgScopedEnsurer, ProductEnsurer, SubscriptionEnsurer,
};
use crate::{EnsureError, EnsureResult, Reconciler};
use satdsl_model::EntityKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps entity kinds to their reconciler.
///
/// Each registered reconciler is a single shared instance for the life of the
/// registry. Lookup falls back along [`EntityKind::lineage`], so registering
/// the universal base [`EntityKind::Entity`] covers every kind that has no
/// entry of its own.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EntityKind, Arc<dyn Reconciler>>,
}

impl HandlerRegistry {
    /// An empty registry. Every lookup fails until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set of reconcilers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EntityKind::Entity, EntityEnsurer);
        registry.register(EntityKind::OperatingSystem, OperatingSystemEnsurer);
        registry.register(EntityKind::LifecycleEnvironment, OrgScopedEnsurer);
        registry.register(EntityKind::ContentView, OrgScopedEnsurer);
        registry.register(EntityKind::ActivationKey, OrgScopedEnsurer);
        registry.register(EntityKind::Subscription, SubscriptionEnsurer);
        registry.register(EntityKind::Product, ProductEnsurer::new());
        registry
    }

    /// Registers `handler` for exactly `kind`, returning the one it replaced.
    pub fn register<R: Reconciler + 'static>(
        &mut self,
        kind: EntityKind,
        handler: R,
    ) -> Option<Arc<dyn Reconciler>> {
        self.register_shared(kind, Arc::new(handler))
    }

    pub fn register_shared(
        &mut self,
        kind: EntityKind,
        handler: Arc<dyn Reconciler>,
    ) -> Option<Arc<dyn Reconciler>> {
        self.handlers.insert(kind, handler)
    }

    /// The reconciler for `kind`, or for its nearest registered ancestor.
    pub fn resolve(&self, kind: EntityKind) -> EnsureResult<Arc<dyn Reconciler>> {
        self.resolve_with_origin(kind).map(|(_, handler)| handler)
    }

    /// Like [`resolve`](Self::resolve), also reporting which kind matched.
    pub fn resolve_with_origin(
        &self,
        kind: EntityKind,
    ) -> EnsureResult<(EntityKind, Arc<dyn Reconciler>)> {
        kind.lineage()
            .into_iter()
            .find_map(|k| self.handlers.get(&k).map(|h| (k, Arc::clone(h))))
            .ok_or(EnsureError::NoHandler(kind))
    }

    /// Whether `kind` itself has an entry (ancestors not considered).
    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}
