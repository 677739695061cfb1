//! Reconciliation engine for satdsl.
//!
//! `ensure(kind, attrs)` makes the remote service hold an entity matching
//! `attrs`, creating or updating it only when needed:
//!
//! 1. The [`HandlerRegistry`] resolves the [`Reconciler`] for the kind,
//!    walking the kind's ancestor chain when there is no exact entry.
//! 2. The reconciler builds a template from the attributes, extracts the
//!    identity key and search context, and searches for an existing entity.
//! 3. A match is hydrated and compared with the template using the
//!    structural comparator in [`compare`]. Similar means nothing to do.
//! 4. Otherwise the template is updated in place, or created. An update that
//!    hits a 404 falls back to create.
//!
//! The returned entity can be passed as an attribute value to later `ensure`
//! calls. There is no ordering logic: callers ensure dependencies first.
//!
//! # Example
//!
//! ```no_run
//! use satdsl_client::{SatelliteClient, ServerConfig};
//! use satdsl_ensure::Ensurer;
//! use satdsl_model::{Attrs, EntityKind};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SatelliteClient::new(ServerConfig::load_default()?)?;
//! let ensurer = Ensurer::new(client);
//!
//! let org = ensurer
//!     .ensure(EntityKind::Organization, Attrs::new().with("name", "Default Organization"))
//!     .await?;
//! ensurer
//!     .ensure(
//!         EntityKind::LifecycleEnvironment,
//!         Attrs::new().with("name", "Dev").with("organization", &org),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod compare;
mod ensurer;
pub mod ensurers;
mod error;
mod reconciler;
mod registry;

pub use compare::{differing_attrs, similar_entities, similar_values};
pub use ensurer::Ensurer;
pub use ensurers::{
    EntityEnsurer, OperatingSystemEnsurer, OrgScopedEnsurer, ProductEnsurer, SubscriptionEnsurer,
};
pub use error::{EnsureError, EnsureResult};
pub use reconciler::{
    describe_by_id, describe_by_name, ensure_entity, find_by_key, log_entity_diff, require_attrs,
    update_or_create, EnsureContext, Reconciler,
};
pub use registry::HandlerRegistry;
