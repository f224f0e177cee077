use std::{env, fs, path::Path};
use serde::Deserialize;
use thiserror::Error;

const SETTINGS_FILENAME: &str = "settings.json";
const SETTINGS_PATH_VARIABLE: &str = "YATA_SETTINGS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_binding")]
    pub tcp_socket_binding: String,
    #[serde(default = "default_port")]
    pub tcp_socket_port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub jwt_issuer: Option<String>,
    #[serde(default)]
    pub jwt_audience: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_in_seconds: u64,
    /// Reject reorder requests carrying a negative order value.
    #[serde(default)]
    pub validate_non_negative_order: bool,
    /// Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("cannot parse settings file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

impl Settings {
    /// Loads `settings.json` from the working directory, or the file named by `YATA_SETTINGS`.
    pub fn load() -> Result<Settings, SettingsError> {
        let path = env::var(SETTINGS_PATH_VARIABLE).unwrap_or_else(|_| SETTINGS_FILENAME.to_string());
        Settings::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Settings::from_json(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Settings, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}

fn default_binding() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1323
}

fn default_database_path() -> String {
    "tasks.redb".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_log_filter() -> String {
    "yata_server=info,tower_http=info".to_string()
}
