//! Connection settings for the remote service.

use crate::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Server connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the server (e.g. `https://satellite.example.com`).
    pub url: String,
    /// Username for HTTP basic auth.
    pub username: String,
    /// Password for HTTP basic auth.
    pub password: String,
    /// Verify the server's TLS certificate.
    pub verify_tls: bool,
    /// Per-request timeout (in seconds).
    pub timeout_secs: u64,
    /// Page size used when following paginated results.
    pub per_page: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            verify_tls: true,
            timeout_secs: 60,
            per_page: crate::DEFAULT_PER_PAGE,
        }
    }
}

impl ServerConfig {
    /// Default location of the config file (`<config dir>/satdsl/server.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("satdsl").join("server.json"))
    }

    /// Loads a config from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ApiResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from [`ServerConfig::default_path`].
    pub fn load_default() -> ApiResult<Self> {
        let path = Self::default_path()
            .ok_or_else(|| ApiError::Config("no config directory on this platform".to_string()))?;
        Self::load(&path)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> ApiResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> ApiResult<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.per_page == 0 {
            return Err(ApiError::Config("per_page must be positive".to_string()));
        }
        Ok(())
    }
}
