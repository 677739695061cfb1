//! Errors surfaced by the command line tool.

use satdsl_ensure::EnsureError;
use satdsl_model::{EntityKind, ModelError};
use std::path::PathBuf;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("step {step}: {source}")]
    Kind {
        step: usize,
        #[source]
        source: ModelError,
    },

    #[error("step {step}: unknown label '@{label}'")]
    UnknownLabel { step: usize, label: String },

    #[error("step {step}: label '{label}' is already registered")]
    DuplicateLabel { step: usize, label: String },

    #[error("step {step}: attribute '{attr}' has an unsupported value ({found})")]
    UnsupportedValue {
        step: usize,
        attr: String,
        found: &'static str,
    },

    #[error("step {step} ({kind}) failed: {source}")]
    Ensure {
        step: usize,
        kind: EntityKind,
        #[source]
        source: EnsureError,
    },
}
