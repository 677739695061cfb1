//! The `ensure` entry point.

use crate::{EnsureContext, EnsureResult, HandlerRegistry, Reconciler};
use satdsl_client::RemoteApi;
use satdsl_model::{Attrs, Entity, EntityKind};
use std::sync::Arc;

/// Entry point: a remote API plus the registry of reconcilers to run
/// against it.
#[derive(Clone)]
pub struct Ensurer {
    api: Arc<dyn RemoteApi>,
    registry: HandlerRegistry,
}

impl Ensurer {
    /// An ensurer with the default reconcilers.
    pub fn new<A: RemoteApi + 'static>(api: A) -> Self {
        Self::with_registry(api, HandlerRegistry::with_defaults())
    }

    pub fn with_registry<A: RemoteApi + 'static>(api: A, registry: HandlerRegistry) -> Self {
        Self::from_shared(Arc::new(api), registry)
    }

    pub fn from_shared(api: Arc<dyn RemoteApi>, registry: HandlerRegistry) -> Self {
        Self { api, registry }
    }

    pub fn api(&self) -> &dyn RemoteApi {
        self.api.as_ref()
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Registers `handler` for `kind`, replacing any earlier entry.
    pub fn register<R: Reconciler + 'static>(&mut self, kind: EntityKind, handler: R) {
        self.registry.register(kind, handler);
    }

    /// Makes the remote service hold an entity of `kind` matching `attrs`
    /// and returns it.
    pub async fn ensure(&self, kind: EntityKind, attrs: Attrs) -> EnsureResult<Entity> {
        let handler = self.registry.resolve(kind)?;
        handler.ensure(&self.context(), kind, attrs).await
    }

    pub fn describe(&self, entity: &Entity) -> String {
        self.context().describe(entity)
    }

    fn context(&self) -> EnsureContext<'_> {
        EnsureContext::new(self.api.as_ref(), &self.registry)
    }
}
