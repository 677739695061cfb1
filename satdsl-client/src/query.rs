//! Search query strings.

use satdsl_model::{Attrs, FieldValue};

/// Builds a search query from attribute/value pairs.
///
/// Clauses are `name = value` joined with ` and `; see
/// [`format_query_value`] for quoting.
pub fn build_query(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!("{name} = {}", format_query_value(value)))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Renders one value for a search clause. Values containing whitespace are
/// double-quoted, with inner double quotes backslash-escaped.
pub fn format_query_value(value: &FieldValue) -> String {
    let text = value.to_string();
    if text.chars().any(char::is_whitespace) {
        format!("\"{}\"", text.replace('"', "\\\""))
    } else {
        text
    }
}
