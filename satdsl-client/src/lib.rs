//! Remote query facade for satdsl.
//!
//! Everything that touches the wire lives here:
//! - [`ServerConfig`]: connection settings, persisted as JSON
//! - [`build_query`]: `name = value and ...` search strings
//! - [`RemoteApi`]: the narrow interface the reconcilers consume
//!   (`get_json`, `read`, `create`, `update`, plus paginated `search`/`index`)
//! - [`SatelliteClient`]: the `reqwest` implementation of [`RemoteApi`]
//!
//! Search results are returned as handles: entities carrying only a kind and
//! an id. Callers `read` a handle to hydrate it.

mod api;
mod client;
mod config;
mod error;
mod query;

pub use api::{collection_path, results_page, RemoteApi, ResultsPage, DEFAULT_PER_PAGE};
pub use client::SatelliteClient;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use query::{build_query, format_query_value};

/// Request parameters, ordered for stable URLs.
pub type QueryParams = std::collections::BTreeMap<String, String>;
