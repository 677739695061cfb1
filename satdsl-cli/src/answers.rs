//! Server settings read from the Foreman installer answers file.

use crate::{CliError, CliResult};
use satdsl_client::ServerConfig;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Where the Foreman installer leaves its answers.
pub const DEFAULT_ANSWERS_FILE: &str = "/etc/foreman-installer/scenarios.d/foreman-answers.yaml";

#[derive(Deserialize)]
struct AnswersFile {
    foreman: ForemanAnswers,
}

/// Admin credentials from the installer answers file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ForemanAnswers {
    pub foreman_url: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl ForemanAnswers {
    /// Parses an answers file; everything outside `foreman` is ignored.
    pub fn from_yaml(raw: &str) -> CliResult<Self> {
        let file: AnswersFile = serde_yaml::from_str(raw)?;
        Ok(file.foreman)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// A config for the freshly installed server. Its certificate is
    /// usually self-signed, so TLS verification is off.
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            url: self.foreman_url.clone(),
            username: self.admin_username.clone(),
            password: self.admin_password.clone(),
            verify_tls: false,
            ..Default::default()
        }
    }
}

impl fmt::Debug for ForemanAnswers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForemanAnswers")
            .field("foreman_url", &self.foreman_url)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}
