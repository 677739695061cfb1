//! Error types for the entity model.

use crate::EntityKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or decoding entities.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An attribute was set that the kind does not declare.
    #[error("entities of type '{kind}' do not have an '{field}' attribute")]
    UnknownField { kind: EntityKind, field: String },

    /// A remote payload could not be mapped onto the kind.
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: EntityKind, reason: String },

    /// An entity kind name could not be parsed.
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}
