//! Operating systems keyed by name and version.

use crate::{describe_by_id, require_attrs, EnsureResult, Reconciler};
use satdsl_model::{Attrs, Entity};

/// Operating systems are identified by name and version together, e.g.
/// `CentOS` `7` `2`, and display as `OperatingSystem "CentOS 7.2"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatingSystemEnsurer;

impl Reconciler for OperatingSystemEnsurer {
    fn key_attrs(&self, template: &Entity) -> EnsureResult<Attrs> {
        require_attrs(template, &["name", "major", "minor"])
    }

    fn describe(&self, entity: &Entity) -> String {
        let part = |name: &str| entity.get(name).filter(|v| !v.is_null());
        match (part("name"), part("major"), part("minor")) {
            (Some(name), Some(major), Some(minor)) => {
                format!("{} \"{} {}.{}\"", entity.kind, name, major, minor)
            }
            _ => describe_by_id(entity),
        }
    }
}
