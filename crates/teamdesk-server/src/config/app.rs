//! Application configuration for the TeamDesk onboarding server.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::AppResult;

/// Which persistence backend holds submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL tables
    Postgres,
    /// CSV spreadsheet files in the data directory
    Spreadsheet,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Spreadsheet => "spreadsheet",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `ONBOARD_`:
/// - `ONBOARD_HOST`: Server bind address (default: "0.0.0.0")
/// - `ONBOARD_PORT`: Server port (default: 3001)
/// - `ONBOARD_STORAGE`: `postgres` or `spreadsheet` (default: postgres)
/// - `ONBOARD_DATA_DIR`: Directory for spreadsheet files (default: "data")
/// - `ONBOARD_STATIC_DIR`: Directory served as static content (default: "public")
/// - `ONBOARD_BODY_LIMIT_BYTES`: Maximum request body size (default: 2 MiB)
/// - `ONBOARD_STRICT_VALIDATION`: Apply field format checks (default: false)
/// - `ONBOARD_LOG_FORMAT`: `text` or `json` (default: text)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Persistence backend
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// Spreadsheet backend directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Static file root (form and admin pages)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Request body limit in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// Reject submissions whose fields fail format checks
    #[serde(default)]
    pub strict_validation: bool,

    /// Log output format
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_storage() -> StorageBackend {
    StorageBackend::Postgres
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `ONBOARD_`. Unset variables
    /// take their defaults; a value that fails to parse is an error.
    pub fn from_env() -> AppResult<Self> {
        Ok(envy::prefixed("ONBOARD_").from_env::<AppConfig>()?)
    }

    /// Load configuration from `ONBOARD_`-prefixed pairs.
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed("ONBOARD_").from_iter::<_, AppConfig>(vars)?)
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: default_storage(),
            data_dir: default_data_dir(),
            static_dir: default_static_dir(),
            body_limit_bytes: default_body_limit(),
            strict_validation: false,
            log_format: default_log_format(),
        }
    }
}
