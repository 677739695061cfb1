//! Entity model for satdsl.
//!
//! Defines the types every other satdsl crate speaks in:
//! - [`EntityKind`]: closed set of remote entity types, each declaring its
//!   collection path, field table and explicit ancestor chain
//! - [`FieldDef`] / [`FieldKind`]: the declared fields of a kind
//! - [`FieldValue`]: tagged union of scalar, reference and list values
//! - [`Attrs`]: the caller-supplied attribute map passed to `ensure`
//! - [`Entity`]: an instance of a kind, persisted (has an id) or not
//!
//! The model only knows the *names* and reference targets of fields. It does
//! not validate value types; the remote service does that.

mod entity;
mod error;
mod ids;
mod kind;
mod value;

pub use entity::{Entity, REDACTED};
pub use error::{ModelError, ModelResult};
pub use ids::EntityId;
pub use kind::{EntityKind, FieldDef, FieldKind};
pub use value::{Attrs, EntityRef, FieldValue, Scalar};
