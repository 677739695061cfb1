//! Reconcilers for kinds whose identity or scoping departs from the default.

mod generic;
mod operating_system;
mod org_scoped;
mod product;
mod subscription;

pub use generic::EntityEnsurer;
pub use operating_system::OperatingSystemEnsurer;
pub use org_scoped::{organization_context, organization_ref, OrgScopedEnsurer};
pub use product::ProductEnsurer;
pub use subscription::SubscriptionEnsurer;
