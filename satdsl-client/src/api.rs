//! The remote interface consumed by the reconcilers.

use crate::{ApiError, ApiResult, QueryParams};
use async_trait::async_trait;
use satdsl_model::{Entity, EntityId, EntityKind};
use serde_json::Value;
use tracing::debug;

/// Default page size for paginated collection requests.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Narrow view of the remote service.
///
/// Implementors supply the four transport primitives; collection searches
/// are built on top of `get_json` and follow the `results` envelope across
/// pages.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// GETs `path` (relative to the server root, or absolute) and returns the
    /// decoded body. Any non-2xx status is an error.
    async fn get_json(&self, path: &str, params: &QueryParams) -> ApiResult<Value>;

    /// Hydrates a handle by id.
    async fn read(&self, handle: &Entity) -> ApiResult<Entity>;

    /// Creates the entity remotely and returns the persisted state.
    async fn create(&self, entity: &Entity) -> ApiResult<Entity>;

    /// Updates the entity (by its id) and returns the persisted state.
    /// A missing remote entity must surface as a 404 (`is_not_found`).
    async fn update(&self, entity: &Entity) -> ApiResult<Entity>;

    fn per_page(&self) -> u32 {
        DEFAULT_PER_PAGE
    }

    /// Fetches every page of a `results` collection as handles of `kind`.
    ///
    /// Further pages are only requested while the reported `subtotal` (or
    /// `total`) says rows are missing, at most `ceil(subtotal / per_page)`
    /// pages. A page that repeats the previous one ends the listing, for
    /// servers that ignore `page`.
    async fn fetch_handles(
        &self,
        kind: EntityKind,
        path: &str,
        params: &QueryParams,
    ) -> ApiResult<Vec<Entity>> {
        let per_page = self.per_page().max(1);
        let mut handles: Vec<Entity> = Vec::new();
        let mut previous: Vec<Option<EntityId>> = Vec::new();
        let mut page = 1u64;

        loop {
            let mut page_params = params.clone();
            page_params.insert("page".to_string(), page.to_string());
            page_params.insert("per_page".to_string(), per_page.to_string());

            let json = self.get_json(path, &page_params).await?;
            let batch = results_page(kind, &json)?;
            let ids: Vec<_> = batch.handles.iter().map(|h| h.id).collect();
            if page > 1 && ids == previous {
                debug!("{} page {} repeats page {}, stopping", path, page, page - 1);
                break;
            }
            let fetched = batch.handles.len();
            handles.extend(batch.handles);

            let more = match batch.subtotal {
                Some(subtotal) => {
                    let last_page = subtotal.div_ceil(u64::from(per_page));
                    (handles.len() as u64) < subtotal && page < last_page
                }
                None => false,
            };
            if fetched == 0 || fetched < per_page as usize || !more {
                break;
            }
            previous = ids;
            page += 1;
        }

        debug!("{} {} rows from {}", handles.len(), kind, path);
        Ok(handles)
    }

    /// Searches the kind's collection. `context` is merged over the search
    /// parameter, so scoping keys win on conflict.
    async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        context: &QueryParams,
    ) -> ApiResult<Vec<Entity>> {
        let mut params = QueryParams::new();
        params.insert("search".to_string(), query.to_string());
        params.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.fetch_handles(kind, collection_path(kind)?, &params).await
    }

    /// Lists every visible entity of the kind.
    async fn index(&self, kind: EntityKind, context: &QueryParams) -> ApiResult<Vec<Entity>> {
        self.fetch_handles(kind, collection_path(kind)?, context).await
    }
}

/// Collection path of a concrete kind.
pub fn collection_path(kind: EntityKind) -> ApiResult<&'static str> {
    kind.path().ok_or(ApiError::AbstractKind(kind))
}

/// One page of a `results` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPage {
    pub handles: Vec<Entity>,
    /// Number of rows matching the query across all pages, when reported.
    pub subtotal: Option<u64>,
}

/// Decodes a `{"results": [{"id": ..}, ..]}` envelope into handles.
pub fn results_page(kind: EntityKind, json: &Value) -> ApiResult<ResultsPage> {
    let rows = json
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::MalformedResponse("missing 'results' list".to_string()))?;

    let handles = rows
        .iter()
        .map(|row| {
            row.get("id")
                .and_then(EntityId::from_json)
                .map(|id| Entity::handle(kind, id))
                .ok_or_else(|| ApiError::MalformedResponse(format!("result row without id: {row}")))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let subtotal = json
        .get("subtotal")
        .or_else(|| json.get("total"))
        .and_then(Value::as_u64);

    Ok(ResultsPage { handles, subtotal })
}
