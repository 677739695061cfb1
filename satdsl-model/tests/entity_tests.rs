use pretty_assertions::assert_eq;
use satdsl_model::{
    Attrs, Entity, EntityId, EntityKind, EntityRef, FieldValue, ModelError, REDACTED, Scalar,
};
use serde_json::json;

fn org(id: u64, name: &str) -> Entity {
    let mut e = Entity::handle(EntityKind::Organization, EntityId::new(id));
    e.set("name", name).unwrap();
    e
}

// ── Templates ────────────────────────────────────────────────────

#[test]
fn from_attrs_sets_declared_fields() {
    let attrs = Attrs::new().with("name", "CentOS").with("major", 7);
    let entity = Entity::from_attrs(EntityKind::OperatingSystem, attrs).unwrap();
    assert_eq!(entity.id, None);
    assert_eq!(entity.get("name"), Some(&FieldValue::from("CentOS")));
    assert_eq!(entity.get("major"), Some(&FieldValue::from(7)));
    assert_eq!(entity.name().as_deref(), Some("CentOS"));
}

#[test]
fn from_attrs_rejects_undeclared_field() {
    let attrs = Attrs::new().with("name", "x").with("bogus_field", 1);
    let err = Entity::from_attrs(EntityKind::Architecture, attrs).unwrap_err();
    match err {
        ModelError::UnknownField { kind, field } => {
            assert_eq!(kind, EntityKind::Architecture);
            assert_eq!(field, "bogus_field");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_field_message_names_kind_and_field() {
    let err = Entity::new(EntityKind::Media).set("colour", "red").unwrap_err();
    assert_eq!(
        err.to_string(),
        "entities of type 'Media' do not have an 'colour' attribute"
    );
}

#[test]
fn entity_converts_to_reference() {
    let main_org = org(3, "Default Organization");
    assert_eq!(
        FieldValue::from(&main_org),
        FieldValue::Reference(EntityRef::named(
            EntityKind::Organization,
            EntityId::new(3),
            "Default Organization"
        ))
    );
}

#[test]
fn unpersisted_entity_converts_to_null() {
    let unsaved = Entity::new(EntityKind::Organization);
    assert_eq!(FieldValue::from(&unsaved), FieldValue::Null);
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn from_json_decodes_scalars_and_references() {
    let json = json!({
        "id": 12,
        "name": "test_hg",
        "architecture_id": 4,
        "architecture_name": "x86_64",
        "medium_id": null,
        "locations": [{"id": 2, "name": "Default Location"}],
        "organizations": [{"id": 3, "name": "Default Organization"}],
        "unrelated": "ignored"
    });
    let hg = Entity::from_json(EntityKind::HostGroup, &json).unwrap();

    assert_eq!(hg.id, Some(EntityId::new(12)));
    assert_eq!(hg.get("name"), Some(&FieldValue::from("test_hg")));
    assert_eq!(
        hg.get("architecture"),
        Some(&FieldValue::Reference(EntityRef::named(
            EntityKind::Architecture,
            EntityId::new(4),
            "x86_64"
        )))
    );
    assert_eq!(hg.get("medium"), Some(&FieldValue::Null));
    assert_eq!(
        hg.get("location"),
        Some(&FieldValue::List(vec![FieldValue::Reference(EntityRef::named(
            EntityKind::Location,
            EntityId::new(2),
            "Default Location"
        ))]))
    );
    assert!(hg.get("ptable").is_none());
    assert!(hg.get("unrelated").is_none());
}

#[test]
fn from_json_accepts_nested_reference_object() {
    let json = json!({
        "id": 5,
        "name": "Dev",
        "organization": {"id": 3, "name": "ACME"},
        "prior": {"id": 1, "name": "Library"}
    });
    let env = Entity::from_json(EntityKind::LifecycleEnvironment, &json).unwrap();
    assert_eq!(env.get("organization").and_then(FieldValue::id), Some(EntityId::new(3)));
    assert_eq!(env.get("prior").and_then(FieldValue::id), Some(EntityId::new(1)));
}

#[test]
fn from_json_accepts_id_arrays_and_string_ids() {
    let json = json!({"id": "9", "name": "CentOS", "medium_ids": [1, "2"]});
    let os = Entity::from_json(EntityKind::OperatingSystem, &json).unwrap();
    assert_eq!(os.id, Some(EntityId::new(9)));
    let ids: Vec<_> = os
        .get("medium")
        .and_then(FieldValue::as_list)
        .unwrap()
        .iter()
        .filter_map(FieldValue::id)
        .collect();
    assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2)]);
}

#[test]
fn from_json_keeps_number_types() {
    let json = json!({"id": 1, "name": "CentOS", "major": "7", "minor": 2});
    let os = Entity::from_json(EntityKind::OperatingSystem, &json).unwrap();
    assert_eq!(os.get("major"), Some(&FieldValue::Scalar(Scalar::Str("7".into()))));
    assert_eq!(os.get("minor"), Some(&FieldValue::Scalar(Scalar::Int(2))));
}

#[test]
fn from_json_rejects_non_object() {
    let err = Entity::from_json(EntityKind::Domain, &json!([1, 2])).unwrap_err();
    assert!(matches!(err, ModelError::MalformedPayload { kind: EntityKind::Domain, .. }));
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn payload_is_wrapped_and_references_become_ids() {
    let main_org = org(3, "Default Organization");
    let arch = Entity::handle(EntityKind::Architecture, EntityId::new(4));
    let attrs = Attrs::new()
        .with("name", "test_hg")
        .with("architecture", &arch)
        .with("organization", vec![&main_org]);
    let mut hg = Entity::from_attrs(EntityKind::HostGroup, attrs).unwrap();
    hg.id = Some(EntityId::new(12));

    assert_eq!(
        hg.to_payload(),
        json!({
            "hostgroup": {
                "name": "test_hg",
                "architecture_id": 4,
                "organization_ids": [3]
            }
        })
    );
}

#[test]
fn katello_payload_is_flat() {
    let main_org = org(3, "ACME");
    let attrs = Attrs::new().with("name", "Dev").with("organization", &main_org);
    let env = Entity::from_attrs(EntityKind::LifecycleEnvironment, attrs).unwrap();
    assert_eq!(env.to_payload(), json!({"name": "Dev", "organization_id": 3}));
}

#[test]
fn reference_converts_back_to_named_handle() {
    let handle = Entity::from(EntityRef::named(EntityKind::Media, EntityId::new(8), "CentOS mirror"));
    assert_eq!(handle.id, Some(EntityId::new(8)));
    assert_eq!(handle.name().as_deref(), Some("CentOS mirror"));
}

#[test]
fn redacted_masks_credentials_only() {
    let attrs = Attrs::new().with("name", "test_hg").with("root_pass", "changeme123");
    let hg = Entity::from_attrs(EntityKind::HostGroup, attrs).unwrap();

    let shown = hg.redacted();
    assert_eq!(shown.get("root_pass"), Some(&FieldValue::from(REDACTED)));
    assert_eq!(shown.get("name"), Some(&FieldValue::from("test_hg")));
    assert_eq!(hg.get("root_pass"), Some(&FieldValue::from("changeme123")));
    assert!(EntityKind::OVirtComputeResource.is_secret("password"));
    assert!(!EntityKind::OVirtComputeResource.is_secret("user"));
}
