//! Entity kinds and their field tables.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of remote entity types satdsl knows how to manage.
///
/// Every kind declares its parent explicitly; [`EntityKind::lineage`] walks
/// that chain from the kind itself up to the universal base
/// [`EntityKind::Entity`]. Handler lookup relies on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Universal base. Abstract: it has no collection and no fields.
    Entity,
    Organization,
    Location,
    Architecture,
    Media,
    PartitionTable,
    OperatingSystem,
    Domain,
    HostGroup,
    ComputeResource,
    LibvirtComputeResource,
    #[serde(rename = "ovirt_compute_resource")]
    OVirtComputeResource,
    LifecycleEnvironment,
    ContentView,
    ActivationKey,
    Subscription,
    Product,
}

impl EntityKind {
    pub const ALL: [EntityKind; 17] = [
        EntityKind::Entity,
        EntityKind::Organization,
        EntityKind::Location,
        EntityKind::Architecture,
        EntityKind::Media,
        EntityKind::PartitionTable,
        EntityKind::OperatingSystem,
        EntityKind::Domain,
        EntityKind::HostGroup,
        EntityKind::ComputeResource,
        EntityKind::LibvirtComputeResource,
        EntityKind::OVirtComputeResource,
        EntityKind::LifecycleEnvironment,
        EntityKind::ContentView,
        EntityKind::ActivationKey,
        EntityKind::Subscription,
        EntityKind::Product,
    ];

    /// Display name used in log lines and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Entity => "Entity",
            EntityKind::Organization => "Organization",
            EntityKind::Location => "Location",
            EntityKind::Architecture => "Architecture",
            EntityKind::Media => "Media",
            EntityKind::PartitionTable => "PartitionTable",
            EntityKind::OperatingSystem => "OperatingSystem",
            EntityKind::Domain => "Domain",
            EntityKind::HostGroup => "HostGroup",
            EntityKind::ComputeResource => "ComputeResource",
            EntityKind::LibvirtComputeResource => "LibvirtComputeResource",
            EntityKind::OVirtComputeResource => "OVirtComputeResource",
            EntityKind::LifecycleEnvironment => "LifecycleEnvironment",
            EntityKind::ContentView => "ContentView",
            EntityKind::ActivationKey => "ActivationKey",
            EntityKind::Subscription => "Subscription",
            EntityKind::Product => "Product",
        }
    }

    /// Snake-case name, as written in manifests.
    pub const fn slug(self) -> &'static str {
        match self {
            EntityKind::Entity => "entity",
            EntityKind::Organization => "organization",
            EntityKind::Location => "location",
            EntityKind::Architecture => "architecture",
            EntityKind::Media => "media",
            EntityKind::PartitionTable => "partition_table",
            EntityKind::OperatingSystem => "operating_system",
            EntityKind::Domain => "domain",
            EntityKind::HostGroup => "host_group",
            EntityKind::ComputeResource => "compute_resource",
            EntityKind::LibvirtComputeResource => "libvirt_compute_resource",
            EntityKind::OVirtComputeResource => "ovirt_compute_resource",
            EntityKind::LifecycleEnvironment => "lifecycle_environment",
            EntityKind::ContentView => "content_view",
            EntityKind::ActivationKey => "activation_key",
            EntityKind::Subscription => "subscription",
            EntityKind::Product => "product",
        }
    }

    /// The next less specific kind, `None` for the universal base.
    pub const fn parent(self) -> Option<EntityKind> {
        match self {
            EntityKind::Entity => None,
            EntityKind::LibvirtComputeResource | EntityKind::OVirtComputeResource => {
                Some(EntityKind::ComputeResource)
            }
            _ => Some(EntityKind::Entity),
        }
    }

    /// This kind followed by its ancestors, most specific first.
    pub fn lineage(self) -> Vec<EntityKind> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Collection path relative to the server root. `None` for abstract kinds.
    pub const fn path(self) -> Option<&'static str> {
        match self {
            EntityKind::Entity => None,
            EntityKind::Organization => Some("katello/api/v2/organizations"),
            EntityKind::Location => Some("api/v2/locations"),
            EntityKind::Architecture => Some("api/v2/architectures"),
            EntityKind::Media => Some("api/v2/media"),
            EntityKind::PartitionTable => Some("api/v2/ptables"),
            EntityKind::OperatingSystem => Some("api/v2/operatingsystems"),
            EntityKind::Domain => Some("api/v2/domains"),
            EntityKind::HostGroup => Some("api/v2/hostgroups"),
            EntityKind::ComputeResource
            | EntityKind::LibvirtComputeResource
            | EntityKind::OVirtComputeResource => Some("api/v2/compute_resources"),
            EntityKind::LifecycleEnvironment => Some("katello/api/v2/environments"),
            EntityKind::ContentView => Some("katello/api/v2/content_views"),
            EntityKind::ActivationKey => Some("katello/api/v2/activation_keys"),
            EntityKind::Subscription => Some("katello/api/v2/subscriptions"),
            EntityKind::Product => Some("katello/api/v2/products"),
        }
    }

    /// Key the Foreman API expects create/update payloads to be wrapped in.
    /// Katello endpoints take flat payloads.
    pub const fn payload_root(self) -> Option<&'static str> {
        match self {
            EntityKind::Location => Some("location"),
            EntityKind::Architecture => Some("architecture"),
            EntityKind::Media => Some("medium"),
            EntityKind::PartitionTable => Some("ptable"),
            EntityKind::OperatingSystem => Some("operatingsystem"),
            EntityKind::Domain => Some("domain"),
            EntityKind::HostGroup => Some("hostgroup"),
            EntityKind::ComputeResource
            | EntityKind::LibvirtComputeResource
            | EntityKind::OVirtComputeResource => Some("compute_resource"),
            _ => None,
        }
    }

    /// Fields declared on this kind.
    pub const fn fields(self) -> &'static [FieldDef] {
        match self {
            EntityKind::Entity => &[],
            EntityKind::Organization => ORGANIZATION,
            EntityKind::Location => LOCATION,
            EntityKind::Architecture => ARCHITECTURE,
            EntityKind::Media => MEDIA,
            EntityKind::PartitionTable => PARTITION_TABLE,
            EntityKind::OperatingSystem => OPERATING_SYSTEM,
            EntityKind::Domain => DOMAIN,
            EntityKind::HostGroup => HOST_GROUP,
            EntityKind::ComputeResource => COMPUTE_RESOURCE,
            EntityKind::LibvirtComputeResource => LIBVIRT_COMPUTE_RESOURCE,
            EntityKind::OVirtComputeResource => OVIRT_COMPUTE_RESOURCE,
            EntityKind::LifecycleEnvironment => LIFECYCLE_ENVIRONMENT,
            EntityKind::ContentView => CONTENT_VIEW,
            EntityKind::ActivationKey => ACTIVATION_KEY,
            EntityKind::Subscription => SUBSCRIPTION,
            EntityKind::Product => PRODUCT,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn has_field(self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether `name` is a declared credential field.
    pub fn is_secret(self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.secret)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    /// Accepts either the slug (`host_group`) or the display name (`HostGroup`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| k.slug() == s || k.name() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

/// A field declared on an [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Credentials; never written to logs.
    pub secret: bool,
}

/// What a field holds, and how it travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String, number or boolean.
    Scalar,
    /// One reference. Read from `<name>_id` or `<name>.id`, written as `<name>_id`.
    One(EntityKind),
    /// Ordered references. Read from `<name>_ids` or a `plural` array of
    /// objects, written as `<name>_ids`.
    Many {
        target: EntityKind,
        plural: &'static str,
    },
}

impl FieldDef {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
            secret: false,
        }
    }

    /// A scalar holding a credential.
    pub const fn secret(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
            secret: true,
        }
    }

    pub const fn one(name: &'static str, target: EntityKind) -> Self {
        Self {
            name,
            kind: FieldKind::One(target),
            secret: false,
        }
    }

    pub const fn many(name: &'static str, plural: &'static str, target: EntityKind) -> Self {
        Self {
            name,
            kind: FieldKind::Many { target, plural },
            secret: false,
        }
    }

    /// The referenced kind, if this is a reference field.
    pub const fn target(&self) -> Option<EntityKind> {
        match self.kind {
            FieldKind::Scalar => None,
            FieldKind::One(target) | FieldKind::Many { target, .. } => Some(target),
        }
    }
}

// ── Field tables ────────────────────────────────────────────────

const ORGANIZATION: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("label"),
    FieldDef::scalar("description"),
];

const LOCATION: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::one("parent", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const ARCHITECTURE: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::many("operatingsystem", "operatingsystems", EntityKind::OperatingSystem),
];

const MEDIA: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("path"),
    FieldDef::scalar("os_family"),
    FieldDef::many("operatingsystem", "operatingsystems", EntityKind::OperatingSystem),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const PARTITION_TABLE: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("layout"),
    FieldDef::scalar("os_family"),
    FieldDef::many("operatingsystem", "operatingsystems", EntityKind::OperatingSystem),
];

const OPERATING_SYSTEM: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("major"),
    FieldDef::scalar("minor"),
    FieldDef::scalar("description"),
    FieldDef::scalar("family"),
    FieldDef::scalar("release_name"),
    FieldDef::many("architecture", "architectures", EntityKind::Architecture),
    FieldDef::many("medium", "media", EntityKind::Media),
    FieldDef::many("ptable", "ptables", EntityKind::PartitionTable),
];

const DOMAIN: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const HOST_GROUP: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::secret("root_pass"),
    FieldDef::one("parent", EntityKind::HostGroup),
    FieldDef::one("architecture", EntityKind::Architecture),
    FieldDef::one("operatingsystem", EntityKind::OperatingSystem),
    FieldDef::one("medium", EntityKind::Media),
    FieldDef::one("ptable", EntityKind::PartitionTable),
    FieldDef::one("domain", EntityKind::Domain),
    FieldDef::one("compute_resource", EntityKind::ComputeResource),
    FieldDef::one("content_view", EntityKind::ContentView),
    FieldDef::one("lifecycle_environment", EntityKind::LifecycleEnvironment),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const COMPUTE_RESOURCE: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::scalar("provider"),
    FieldDef::scalar("url"),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const LIBVIRT_COMPUTE_RESOURCE: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::scalar("provider"),
    FieldDef::scalar("url"),
    FieldDef::scalar("display_type"),
    FieldDef::scalar("set_console_password"),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const OVIRT_COMPUTE_RESOURCE: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::scalar("provider"),
    FieldDef::scalar("url"),
    FieldDef::scalar("user"),
    FieldDef::secret("password"),
    FieldDef::scalar("datacenter"),
    FieldDef::many("location", "locations", EntityKind::Location),
    FieldDef::many("organization", "organizations", EntityKind::Organization),
];

const LIFECYCLE_ENVIRONMENT: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("label"),
    FieldDef::scalar("description"),
    FieldDef::one("organization", EntityKind::Organization),
    FieldDef::one("prior", EntityKind::LifecycleEnvironment),
];

const CONTENT_VIEW: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("label"),
    FieldDef::scalar("description"),
    FieldDef::scalar("composite"),
    FieldDef::one("organization", EntityKind::Organization),
];

const ACTIVATION_KEY: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("description"),
    FieldDef::scalar("max_hosts"),
    FieldDef::scalar("unlimited_hosts"),
    FieldDef::scalar("auto_attach"),
    FieldDef::one("organization", EntityKind::Organization),
    FieldDef::one("environment", EntityKind::LifecycleEnvironment),
    FieldDef::one("content_view", EntityKind::ContentView),
];

const SUBSCRIPTION: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("product_name"),
    FieldDef::scalar("quantity"),
    FieldDef::one("organization", EntityKind::Organization),
];

const PRODUCT: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("label"),
    FieldDef::scalar("description"),
    FieldDef::one("organization", EntityKind::Organization),
    FieldDef::one("subscription", EntityKind::Subscription),
];
