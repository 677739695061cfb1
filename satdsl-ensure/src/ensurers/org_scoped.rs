//! Organization-scoped kinds.

use crate::{EnsureError, EnsureResult, Reconciler};
use satdsl_client::QueryParams;
use satdsl_model::{Entity, EntityRef, FieldValue};

/// Kinds whose names are unique only within an organization.
///
/// Searches are scoped with `organization_id`, so the template must carry
/// an `organization` reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgScopedEnsurer;

impl Reconciler for OrgScopedEnsurer {
    fn search_context(&self, template: &Entity) -> EnsureResult<QueryParams> {
        organization_context(template)
    }
}

/// The template's `organization` reference.
pub fn organization_ref(template: &Entity) -> EnsureResult<&EntityRef> {
    match template.get("organization") {
        Some(FieldValue::Reference(org)) => Ok(org),
        _ => Err(EnsureError::MissingContext {
            kind: template.kind,
            field: "organization".to_string(),
        }),
    }
}

/// `{organization_id: <id>}` for the template's organization.
pub fn organization_context(template: &Entity) -> EnsureResult<QueryParams> {
    let org = organization_ref(template)?;
    let mut params = QueryParams::new();
    params.insert("organization_id".to_string(), org.id.to_string());
    Ok(params)
}
