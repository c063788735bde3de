//! Server configuration loaded from the environment

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Where posts, comments and accounts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// HTTP server settings
///
/// # Environment Variables
/// - `HOST`: Bind address (default: 0.0.0.0)
/// - `PORT`: Listen port (default: 5000)
/// - `UPLOAD_DIR`: Directory for uploaded images (default: uploads)
/// - `STORAGE`: `postgres` or `memory` (default: postgres)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub storage: StorageBackend,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("upload_dir", "uploads")?
            .set_default("storage", "postgres")?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
