//! Default reconciler.

use crate::Reconciler;

/// The standard protocol: find by `name`, compare, then update or create.
///
/// Registered for the universal base kind so every kind without a more
/// specific entry falls back to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityEnsurer;

impl Reconciler for EntityEnsurer {}
