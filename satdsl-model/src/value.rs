//! Attribute values and the caller-facing attribute map.

use crate::{Entity, EntityId, EntityKind};
use std::collections::BTreeMap;
use std::fmt;

/// A plain value: string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Integer view of the scalar, used by the comparator's numeric-first rule.
    ///
    /// Booleans count as 0/1, finite floats are truncated toward zero, strings
    /// only when they parse as a base-10 integer. `"7.0"` is not an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Bool(b) => Some(i64::from(*b)),
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Scalar::Float(_) => None,
            Scalar::Str(s) => s.trim().parse().ok(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Int(i) => serde_json::Value::from(*i),
            Scalar::Float(f) => serde_json::Value::from(*f),
            Scalar::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// A pointer to another remote entity. Only the id matters for equality.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
    /// Display name when the remote payload carried one.
    pub name: Option<String>,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self {
            kind,
            id,
            name: None,
        }
    }

    pub fn named(kind: EntityKind, id: EntityId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: Some(name.into()),
        }
    }
}

/// The value of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Scalar(Scalar),
    Reference(EntityRef),
    /// Ordered collection, usually of references.
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&EntityRef> {
        match self {
            FieldValue::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Identity token of a reference value.
    pub fn id(&self) -> Option<EntityId> {
        self.as_reference().map(|r| r.id)
    }

    /// Wire form: references collapse to their id.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Scalar(s) => s.to_json(),
            FieldValue::Reference(r) => serde_json::Value::from(r.id.get()),
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
        }
    }
}

/// String form used in search queries and as the comparator's fallback.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Scalar(s) => write!(f, "{s}"),
            FieldValue::Reference(r) => write!(f, "{}", r.id),
            FieldValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(s: Scalar) -> Self {
        FieldValue::Scalar(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(Scalar::Str(s))
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Scalar(Scalar::Str(s.clone()))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Scalar(Scalar::Float(x))
    }
}

impl From<EntityRef> for FieldValue {
    fn from(r: EntityRef) -> Self {
        FieldValue::Reference(r)
    }
}

/// A persisted entity becomes a reference to it. An entity without an id
/// cannot be referenced and becomes `Null`.
impl From<&Entity> for FieldValue {
    fn from(entity: &Entity) -> Self {
        entity
            .to_ref()
            .map(FieldValue::Reference)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<Entity> for FieldValue {
    fn from(entity: Entity) -> Self {
        FieldValue::from(&entity)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Attributes handed to `ensure`, keyed by field name.
///
/// Ordered by name so that queries and logs come out deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(BTreeMap<String, FieldValue>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Attrs {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
