mod common;

use common::{handle, mock_ensurer, mock_ensurer_with, org};
use satdsl_client::ApiError;
use satdsl_ensure::{EnsureError, HandlerRegistry, ProductEnsurer};
use satdsl_model::{Attrs, EntityKind};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_subscription(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/katello/api/v2/subscriptions/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "product_name": "Red Hat Enterprise Linux Server",
            "provided_products": [
                {"id": 21, "name": "Red Hat Enterprise Linux Server"},
                {"id": 22, "name": "Red Hat Software Collections"}
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn provided(name: &str) -> Attrs {
    Attrs::new()
        .with("name", name)
        .with("subscription", &handle(EntityKind::Subscription, 11))
}

#[tokio::test]
async fn provided_product_is_looked_up_once_per_subscription() {
    let server = MockServer::start().await;
    mount_subscription(&server, 1).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let products = Arc::new(ProductEnsurer::new());
    let mut registry = HandlerRegistry::with_defaults();
    registry.register_shared(EntityKind::Product, products.clone());
    let ensurer = mock_ensurer_with(&server, registry);

    let server_product = ensurer
        .ensure(EntityKind::Product, provided("Red Hat Enterprise Linux Server"))
        .await
        .unwrap();
    let collections = ensurer
        .ensure(EntityKind::Product, provided("Red Hat Software Collections"))
        .await
        .unwrap();
    let again = ensurer
        .ensure(EntityKind::Product, provided("Red Hat Enterprise Linux Server"))
        .await
        .unwrap();

    assert_eq!(server_product.id, handle(EntityKind::Product, 21).id);
    assert_eq!(collections.id, handle(EntityKind::Product, 22).id);
    assert_eq!(again, server_product);
    assert_eq!(products.cached_subscriptions().await, 1);
}

#[tokio::test]
async fn unknown_provided_product_is_not_found() {
    let server = MockServer::start().await;
    mount_subscription(&server, 1).await;

    let ensurer = mock_ensurer(&server);
    let err = ensurer
        .ensure(EntityKind::Product, provided("Nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnsureError::NotFound(_)));
    assert_eq!(
        err.to_string(),
        "not found: Product in: Subscription #11 with name: Nope not found"
    );
}

#[tokio::test]
async fn subscription_without_product_list_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/subscriptions/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11})))
        .mount(&server)
        .await;

    let ensurer = mock_ensurer(&server);
    let err = ensurer
        .ensure(EntityKind::Product, provided("Red Hat Enterprise Linux Server"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnsureError::Api(ApiError::MalformedResponse(_))));
}

#[tokio::test]
async fn provided_lookup_requires_name() {
    let server = MockServer::start().await;
    let ensurer = mock_ensurer(&server);

    let err = ensurer
        .ensure(
            EntityKind::Product,
            Attrs::new().with("subscription", &handle(EntityKind::Subscription, 11)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EnsureError::MissingKey { ref field, .. } if field == "name"));
}

#[tokio::test]
async fn custom_product_is_created_in_organization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/products"))
        .and(query_param("search", "name = Internal"))
        .and(query_param("organization_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/katello/api/v2/products"))
        .and(body_json(json!({"name": "Internal", "organization_id": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30, "name": "Internal", "organization": {"id": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/katello/api/v2/subscriptions/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ensurer = mock_ensurer(&server);
    let product = ensurer
        .ensure(
            EntityKind::Product,
            Attrs::new().with("name", "Internal").with("organization", &org(3)),
        )
        .await
        .unwrap();

    assert_eq!(product.id, handle(EntityKind::Product, 30).id);
}

#[tokio::test]
async fn custom_product_requires_organization() {
    let server = MockServer::start().await;
    let ensurer = mock_ensurer(&server);

    let err = ensurer
        .ensure(EntityKind::Product, Attrs::new().with("name", "Internal"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnsureError::MissingContext { ref field, .. } if field == "organization"));
}
