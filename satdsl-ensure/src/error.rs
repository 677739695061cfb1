//! Error types for the reconciliation engine.

use satdsl_client::ApiError;
use satdsl_model::{EntityKind, ModelError};
use thiserror::Error;

/// Result type for ensure operations.
pub type EnsureResult<T> = Result<T, EnsureError>;

/// Errors surfaced by `ensure`. None of them are retried.
#[derive(Debug, Error)]
pub enum EnsureError {
    /// The caller set an attribute the kind does not declare.
    #[error("entities of type '{kind}' do not have an '{field}' attribute")]
    UnknownField { kind: EntityKind, field: String },

    /// A required identity attribute is absent.
    #[error("missing {kind} key attribute: {field}")]
    MissingKey { kind: EntityKind, field: String },

    /// A required scoping attribute is absent or is not a reference.
    #[error("missing {kind} search context attribute: {field}")]
    MissingContext { kind: EntityKind, field: String },

    /// The comparator was handed entities of different kinds.
    #[error("cannot compare {left} with {right}: entities must be of the same type")]
    TypeMismatch { left: EntityKind, right: EntityKind },

    /// A lookup-only reconciler found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Nothing registered for the kind or any of its ancestors.
    #[error("no handler registered for {0} or any of its ancestors")]
    NoHandler(EntityKind),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for EnsureError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownField { kind, field } => EnsureError::UnknownField { kind, field },
            other => EnsureError::Model(other),
        }
    }
}
