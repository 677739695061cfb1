//! Structural equality between discovered and desired state.
//!
//! Two entities are *similar* when every attribute set on both of them holds
//! similar values. Attributes set on only one side are not compared, so a
//! template only constrains the attributes the caller mentioned.

use crate::{EnsureError, EnsureResult};
use satdsl_model::{Entity, FieldValue};

/// Whether every attribute common to `a` and `b` holds similar values.
///
/// Fails with [`EnsureError::TypeMismatch`] for entities of different kinds.
pub fn similar_entities(a: &Entity, b: &Entity) -> EnsureResult<bool> {
    Ok(differing_attrs(a, b)?.is_empty())
}

/// Names of the common attributes whose values are not similar.
pub fn differing_attrs<'a>(a: &'a Entity, b: &Entity) -> EnsureResult<Vec<&'a str>> {
    if a.kind != b.kind {
        return Err(EnsureError::TypeMismatch {
            left: a.kind,
            right: b.kind,
        });
    }

    Ok(a.values
        .iter()
        .filter_map(|(name, va)| {
            let vb = b.values.get(name)?;
            (!similar_values(va, vb)).then_some(name.as_str())
        })
        .collect())
}

/// Compares two attribute values.
///
/// - nulls are only similar to nulls
/// - references are similar when their ids match, nothing else is looked at
/// - lists compare element-wise in order; the shorter side is padded with
///   nulls so a length mismatch never compares equal
/// - each scalar is cast to an integer on its own, or kept in string form
///   when it does not cast; two integers or two strings compare by value, an
///   integer never matches a string (`"7"` ~ `7` and `7.5` ~ `7`, but
///   `"7.0"` !~ `7` and `true` !~ `"true"`)
///
/// A reference or list never matches a value of another shape.
pub fn similar_values(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Null, _) | (_, FieldValue::Null) => false,
        (FieldValue::Reference(x), FieldValue::Reference(y)) => x.id == y.id,
        (FieldValue::List(xs), FieldValue::List(ys)) => {
            (0..xs.len().max(ys.len())).all(|i| {
                similar_values(
                    xs.get(i).unwrap_or(&FieldValue::Null),
                    ys.get(i).unwrap_or(&FieldValue::Null),
                )
            })
        }
        (FieldValue::Scalar(x), FieldValue::Scalar(y)) => match (x.as_integer(), y.as_integer()) {
            (Some(i), Some(j)) => i == j,
            (None, None) => x.to_string() == y.to_string(),
            _ => false,
        },
        _ => false,
    }
}
