#![allow(dead_code)]

use satdsl_client::{SatelliteClient, ServerConfig};
use satdsl_ensure::{Ensurer, HandlerRegistry};
use satdsl_model::{Entity, EntityId, EntityKind};
use wiremock::MockServer;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn mock_client(server: &MockServer) -> SatelliteClient {
    SatelliteClient::new(ServerConfig {
        url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

pub fn mock_ensurer(server: &MockServer) -> Ensurer {
    init_tracing();
    Ensurer::new(mock_client(server))
}

pub fn mock_ensurer_with(server: &MockServer, registry: HandlerRegistry) -> Ensurer {
    init_tracing();
    Ensurer::with_registry(mock_client(server), registry)
}

pub fn handle(kind: EntityKind, id: u64) -> Entity {
    Entity::handle(kind, EntityId::new(id))
}

pub fn org(id: u64) -> Entity {
    handle(EntityKind::Organization, id)
}
