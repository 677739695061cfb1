use pretty_assertions::assert_eq;
use satdsl_cli::{apply, resolve_attrs, CliError, Manifest};
use satdsl_client::{SatelliteClient, ServerConfig};
use satdsl_ensure::Ensurer;
use satdsl_model::{Entity, EntityId, EntityKind, FieldValue};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_ensurer(server: &MockServer) -> Ensurer {
    Ensurer::new(
        SatelliteClient::new(ServerConfig {
            url: server.uri(),
            ..Default::default()
        })
        .unwrap(),
    )
}

fn labels(entries: &[(&str, Entity)]) -> BTreeMap<String, Entity> {
    entries
        .iter()
        .map(|(label, entity)| (label.to_string(), entity.clone()))
        .collect()
}

// ── Parsing ─────────────────────────────────────────────────────

#[test]
fn demo_manifest_parses() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/hostgroup.yaml");
    let manifest = Manifest::load(&demo).unwrap();

    let kinds: Vec<EntityKind> = manifest
        .steps
        .iter()
        .map(|step| step.ensure.parse().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Organization,
            EntityKind::Location,
            EntityKind::Architecture,
            EntityKind::Media,
            EntityKind::OperatingSystem,
            EntityKind::PartitionTable,
            EntityKind::HostGroup,
        ]
    );
    assert_eq!(manifest.steps[4].register.as_deref(), Some("centos7_2"));
}

#[test]
fn unknown_step_keys_are_rejected() {
    let err = Manifest::from_yaml("- ensure: domain\n  atrs: {name: x}\n").unwrap_err();
    assert!(matches!(err, CliError::Yaml(_)));
}

#[test]
fn missing_manifest_file_names_the_path() {
    let err = Manifest::load(Path::new("/nonexistent/manifest.yaml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/manifest.yaml"), "{err}");
}

// ── Attribute resolution ────────────────────────────────────────

#[test]
fn labels_resolve_to_references() {
    let manifest = Manifest::from_yaml(
        r#"
- ensure: host_group
  attrs:
    name: test_hg
    architecture: "@arch"
    organization: ["@org"]
"#,
    )
    .unwrap();
    let known = labels(&[
        ("arch", Entity::handle(EntityKind::Architecture, EntityId::new(2))),
        ("org", Entity::handle(EntityKind::Organization, EntityId::new(1))),
    ]);

    let attrs = resolve_attrs(1, &manifest.steps[0], &known).unwrap();

    assert_eq!(attrs.get("architecture").and_then(FieldValue::id), Some(EntityId::new(2)));
    let orgs = attrs.get("organization").and_then(FieldValue::as_list).unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].id(), Some(EntityId::new(1)));
}

#[test]
fn scalars_keep_their_types() {
    let manifest = Manifest::from_yaml(
        "- ensure: operating_system\n  attrs: {name: CentOS, major: 7, minor: 2, description: ~}\n",
    )
    .unwrap();

    let attrs = resolve_attrs(1, &manifest.steps[0], &BTreeMap::new()).unwrap();

    assert_eq!(attrs.get("major"), Some(&FieldValue::from(7i64)));
    assert_eq!(attrs.get("name"), Some(&FieldValue::from("CentOS")));
    assert_eq!(attrs.get("description"), Some(&FieldValue::Null));
}

#[test]
fn double_at_escapes_a_literal() {
    let manifest =
        Manifest::from_yaml("- ensure: domain\n  attrs: {name: x, description: \"@@home\"}\n")
            .unwrap();

    let attrs = resolve_attrs(1, &manifest.steps[0], &BTreeMap::new()).unwrap();

    assert_eq!(attrs.get("description").and_then(FieldValue::as_str), Some("@home"));
}

#[test]
fn unknown_label_is_an_error() {
    let manifest =
        Manifest::from_yaml("- ensure: domain\n  attrs: {name: x, location: [\"@nowhere\"]}\n")
            .unwrap();

    let err = resolve_attrs(3, &manifest.steps[0], &BTreeMap::new()).unwrap_err();

    assert!(matches!(err, CliError::UnknownLabel { step: 3, ref label } if label == "nowhere"));
}

#[test]
fn nested_mappings_are_rejected() {
    let manifest =
        Manifest::from_yaml("- ensure: domain\n  attrs: {name: x, location: {id: 1}}\n").unwrap();

    let err = resolve_attrs(1, &manifest.steps[0], &BTreeMap::new()).unwrap_err();

    assert!(matches!(err, CliError::UnsupportedValue { ref attr, found: "mapping", .. } if attr == "location"));
}

// ── Apply ───────────────────────────────────────────────────────

#[tokio::test]
async fn apply_threads_registered_entities_through_steps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/organizations/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Default Organization"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/environments"))
        .and(query_param("organization_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/katello/api/v2/environments"))
        .and(body_json(json!({"name": "Dev", "organization_id": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 6, "name": "Dev", "organization_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = Manifest::from_yaml(
        r#"
- ensure: organization
  attrs: {name: Default Organization}
  register: org
- ensure: LifecycleEnvironment
  attrs: {name: Dev, organization: "@org"}
  register: dev
"#,
    )
    .unwrap();

    let applied = apply(&mock_ensurer(&server), &manifest).await.unwrap();

    assert_eq!(applied.entities.len(), 2);
    assert_eq!(applied.labels["dev"].id, Some(EntityId::new(6)));
    assert_eq!(applied.labels["org"].name().as_deref(), Some("Default Organization"));
}

#[tokio::test]
async fn apply_stops_at_the_failing_step() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = Manifest::from_yaml(
        "- ensure: domain\n  attrs: {name: a.example.com}\n- ensure: domain\n  attrs: {name: b.example.com}\n",
    )
    .unwrap();

    let err = apply(&mock_ensurer(&server), &manifest).await.unwrap_err();

    assert!(matches!(err, CliError::Ensure { step: 1, kind: EntityKind::Domain, .. }));
}

#[tokio::test]
async fn apply_rejects_unknown_kind_before_any_request() {
    let server = MockServer::start().await;
    let manifest = Manifest::from_yaml("- ensure: spaceship\n  attrs: {name: x}\n").unwrap();

    let err = apply(&mock_ensurer(&server), &manifest).await.unwrap_err();

    assert!(matches!(err, CliError::Kind { step: 1, .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn apply_rejects_reused_labels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/domains/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = Manifest::from_yaml(
        "- ensure: domain\n  attrs: {name: x}\n  register: d\n- ensure: domain\n  attrs: {name: x}\n  register: d\n",
    )
    .unwrap();

    let err = apply(&mock_ensurer(&server), &manifest).await.unwrap_err();

    assert!(matches!(err, CliError::DuplicateLabel { step: 2, ref label } if label == "d"));
}
