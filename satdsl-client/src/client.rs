//! `reqwest` implementation of the remote interface.

use crate::api::collection_path;
use crate::{ApiError, ApiResult, QueryParams, RemoteApi, ServerConfig};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use satdsl_model::Entity;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the provisioning service's REST API.
pub struct SatelliteClient {
    config: ServerConfig,
    client: Client,
}

impl SatelliteClient {
    /// Creates a client from configuration.
    pub fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Absolute URLs pass through; relative paths are joined to the base URL.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.url.trim_end_matches('/'),
                path.trim_matches('/')
            )
        }
    }

    fn entity_url(&self, entity: &Entity) -> ApiResult<String> {
        let id = entity.id.ok_or(ApiError::MissingId(entity.kind))?;
        Ok(self.url(&format!("{}/{}", collection_path(entity.kind)?, id)))
    }

    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> ApiResult<Value> {
        debug!("{} {}", method, url);

        let response = request
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RemoteApi for SatelliteClient {
    async fn get_json(&self, path: &str, params: &QueryParams) -> ApiResult<Value> {
        let url = self.url(path);
        let request = self.client.get(&url).query(params);
        self.send("GET", &url, request).await
    }

    async fn read(&self, handle: &Entity) -> ApiResult<Entity> {
        let url = self.entity_url(handle)?;
        let json = self.send("GET", &url, self.client.get(&url)).await?;
        Ok(Entity::from_json(handle.kind, &json)?)
    }

    async fn create(&self, entity: &Entity) -> ApiResult<Entity> {
        let url = self.url(collection_path(entity.kind)?);
        let request = self.client.post(&url).json(&entity.to_payload());
        let json = self.send("POST", &url, request).await?;
        Ok(Entity::from_json(entity.kind, &json)?)
    }

    async fn update(&self, entity: &Entity) -> ApiResult<Entity> {
        let url = self.entity_url(entity)?;
        let request = self.client.put(&url).json(&entity.to_payload());
        let json = self.send("PUT", &url, request).await?;
        Ok(Entity::from_json(entity.kind, &json)?)
    }

    fn per_page(&self) -> u32 {
        self.config.per_page
    }
}
