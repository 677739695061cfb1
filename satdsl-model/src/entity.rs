//! Entity instances and their wire encoding.

use crate::{Attrs, EntityId, EntityKind, EntityRef, FieldKind, FieldValue, ModelError, ModelResult, Scalar};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Stand-in for credential values in logs.
pub const REDACTED: &str = "<redacted>";

/// An instance of an [`EntityKind`].
///
/// `values` only holds attributes that were actually set, either by the caller
/// or by decoding a remote payload. An entity without an `id` has not been
/// persisted remotely. A *handle* is an entity with an id and no values yet;
/// it has to be read to be hydrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: Option<EntityId>,
    pub values: BTreeMap<String, FieldValue>,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            id: None,
            values: BTreeMap::new(),
        }
    }

    /// Lightweight pointer to a remote entity, attributes not populated.
    pub fn handle(kind: EntityKind, id: EntityId) -> Self {
        Self {
            kind,
            id: Some(id),
            values: BTreeMap::new(),
        }
    }

    /// Builds an unsaved entity from caller attributes.
    ///
    /// Fails on the first attribute the kind does not declare.
    pub fn from_attrs(kind: EntityKind, attrs: Attrs) -> ModelResult<Self> {
        let mut entity = Self::new(kind);
        for (name, value) in attrs {
            entity.set(name, value)?;
        }
        Ok(entity)
    }

    /// Sets one attribute, validating the name against the kind's fields.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> ModelResult<()> {
        let name = name.into();
        if !self.kind.has_field(&name) {
            return Err(ModelError::UnknownField {
                kind: self.kind,
                field: name,
            });
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// The `name` attribute in string form, if set and not null.
    pub fn name(&self) -> Option<String> {
        match self.values.get("name")? {
            FieldValue::Null => None,
            value => Some(value.to_string()),
        }
    }

    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// A copy fit for logs, with credential values masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for (name, value) in copy.values.iter_mut() {
            if self.kind.is_secret(name) && !value.is_null() {
                *value = FieldValue::from(REDACTED);
            }
        }
        copy
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn to_ref(&self) -> Option<EntityRef> {
        self.id.map(|id| EntityRef {
            kind: self.kind,
            id,
            name: self.name(),
        })
    }

    /// Decodes a remote JSON object into an entity of `kind`.
    ///
    /// Keys the kind does not declare are ignored; declared fields missing
    /// from the payload stay unset.
    pub fn from_json(kind: EntityKind, json: &Value) -> ModelResult<Self> {
        let obj = json.as_object().ok_or_else(|| ModelError::MalformedPayload {
            kind,
            reason: format!("expected a JSON object, got {json}"),
        })?;

        let mut entity = Self::new(kind);
        entity.id = obj.get("id").and_then(EntityId::from_json);

        for field in kind.fields() {
            let value = match field.kind {
                FieldKind::Scalar => obj.get(field.name).map(scalar_from_json),
                FieldKind::One(target) => one_from_json(obj, field.name, target),
                FieldKind::Many { target, plural } => many_from_json(obj, field.name, plural, target),
            };
            if let Some(value) = value {
                entity.values.insert(field.name.to_string(), value);
            }
        }

        Ok(entity)
    }

    /// Encodes the set attributes as a create/update request body.
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        for (name, value) in &self.values {
            let key = match self.kind.field(name).map(|f| f.kind) {
                Some(FieldKind::One(_)) => format!("{name}_id"),
                Some(FieldKind::Many { .. }) => format!("{name}_ids"),
                _ => name.clone(),
            };
            body.insert(key, value.to_json());
        }

        match self.kind.payload_root() {
            Some(root) => {
                let mut wrapped = Map::new();
                wrapped.insert(root.to_string(), Value::Object(body));
                Value::Object(wrapped)
            }
            None => Value::Object(body),
        }
    }
}

impl From<EntityRef> for Entity {
    fn from(r: EntityRef) -> Self {
        let mut entity = Self::handle(r.kind, r.id);
        if let Some(name) = r.name {
            entity.values.insert("name".to_string(), FieldValue::from(name));
        }
        entity
    }
}

fn scalar_from_json(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Scalar(Scalar::Int(i)),
            None => FieldValue::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => FieldValue::Scalar(Scalar::Str(s.clone())),
        Value::Array(items) => FieldValue::List(items.iter().map(scalar_from_json).collect()),
        Value::Object(_) => FieldValue::Scalar(Scalar::Str(value.to_string())),
    }
}

fn ref_from_json(value: &Value, target: EntityKind) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Null),
        Value::Object(obj) => {
            let id = obj.get("id").and_then(EntityId::from_json)?;
            let name = obj.get("name").and_then(Value::as_str).map(str::to_string);
            Some(FieldValue::Reference(EntityRef {
                kind: target,
                id,
                name,
            }))
        }
        other => EntityId::from_json(other).map(|id| FieldValue::Reference(EntityRef::new(target, id))),
    }
}

fn one_from_json(obj: &Map<String, Value>, name: &str, target: EntityKind) -> Option<FieldValue> {
    if let Some(raw) = obj.get(&format!("{name}_id")) {
        let mut value = ref_from_json(raw, target)?;
        if let FieldValue::Reference(r) = &mut value {
            r.name = obj
                .get(&format!("{name}_name"))
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        return Some(value);
    }
    obj.get(name).and_then(|raw| ref_from_json(raw, target))
}

fn many_from_json(
    obj: &Map<String, Value>,
    name: &str,
    plural: &str,
    target: EntityKind,
) -> Option<FieldValue> {
    let items = obj
        .get(plural)
        .and_then(Value::as_array)
        .or_else(|| obj.get(&format!("{name}_ids")).and_then(Value::as_array))?;
    Some(FieldValue::List(
        items
            .iter()
            .filter_map(|item| ref_from_json(item, target))
            .collect(),
    ))
}
