//! YAML manifests: ordered `ensure` steps linked by `@label` references.

use crate::{CliError, CliResult};
use satdsl_ensure::Ensurer;
use satdsl_model::{Attrs, Entity, EntityKind, FieldValue};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One `ensure` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Kind slug (`host_group`) or name (`HostGroup`).
    pub ensure: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
    /// Label later steps use to refer to the resulting entity.
    #[serde(default)]
    pub register: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub steps: Vec<Step>,
}

impl Manifest {
    pub fn from_yaml(raw: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Applied {
    /// The entity each step ended up with, in step order.
    pub entities: Vec<Entity>,
    pub labels: BTreeMap<String, Entity>,
}

/// Runs every step in order, stopping at the first failure.
pub async fn apply(ensurer: &Ensurer, manifest: &Manifest) -> CliResult<Applied> {
    let mut applied = Applied::default();

    for (index, step) in manifest.steps.iter().enumerate() {
        let number = index + 1;
        let kind: EntityKind = step
            .ensure
            .parse()
            .map_err(|source| CliError::Kind { step: number, source })?;
        if let Some(label) = &step.register
            && applied.labels.contains_key(label)
        {
            return Err(CliError::DuplicateLabel {
                step: number,
                label: label.clone(),
            });
        }
        let attrs = resolve_attrs(number, step, &applied.labels)?;
        debug!(
            "Step {}: ensure {} with {:?}",
            number,
            kind,
            attrs.names().collect::<Vec<_>>()
        );

        let entity = ensurer
            .ensure(kind, attrs)
            .await
            .map_err(|source| CliError::Ensure {
                step: number,
                kind,
                source,
            })?;

        if let Some(label) = &step.register {
            applied.labels.insert(label.clone(), entity.clone());
        }
        applied.entities.push(entity);
    }

    info!("Applied {} steps", applied.entities.len());
    Ok(applied)
}

/// Converts a step's YAML attributes, substituting `@label` references.
pub fn resolve_attrs(
    step: usize,
    entry: &Step,
    labels: &BTreeMap<String, Entity>,
) -> CliResult<Attrs> {
    entry
        .attrs
        .iter()
        .map(|(attr, value)| -> CliResult<(String, FieldValue)> {
            Ok((attr.clone(), field_value(step, attr, value, labels)?))
        })
        .collect()
}

fn field_value(
    step: usize,
    attr: &str,
    value: &Value,
    labels: &BTreeMap<String, Entity>,
) -> CliResult<FieldValue> {
    let unsupported = |found| CliError::UnsupportedValue {
        step,
        attr: attr.to_string(),
        found,
    };

    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::from(i),
            None => n.as_f64().map(FieldValue::from).ok_or_else(|| unsupported("number"))?,
        },
        Value::String(s) => match s.strip_prefix('@') {
            Some(escaped) if escaped.starts_with('@') => FieldValue::from(escaped),
            Some(label) => labels
                .get(label)
                .map(FieldValue::from)
                .ok_or_else(|| CliError::UnknownLabel {
                    step,
                    label: label.to_string(),
                })?,
            None => FieldValue::from(s),
        },
        Value::Sequence(items) => FieldValue::List(
            items
                .iter()
                .map(|item| field_value(step, attr, item, labels))
                .collect::<CliResult<_>>()?,
        ),
        Value::Mapping(_) => return Err(unsupported("mapping")),
        Value::Tagged(_) => return Err(unsupported("tagged value")),
    })
}
