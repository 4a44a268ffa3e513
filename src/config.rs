//! Application configuration
//!
//! Read from a camelCase JSON document. Every field has a default, so a
//! partial (or empty) document is valid.

use app_state::ThemeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use storage::KvConfig;
use thiserror::Error;
use tokio::fs;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Development switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevelopmentConfig {
    /// Log at debug level unless `RUST_LOG` says otherwise
    pub enable_debug_logs: bool,
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Display name
    pub app_name: String,
    /// One-line description
    pub app_description: String,
    /// Version string shown in settings
    pub app_version: String,
    /// Key-value store settings
    pub storage: KvConfig,
    /// Theme subsystem settings
    pub theme: ThemeConfig,
    /// Development switches
    pub development: DevelopmentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Your App Name".to_string(),
            app_description: "Your app description".to_string(),
            app_version: "1.0.0".to_string(),
            storage: KvConfig::default(),
            theme: ThemeConfig::default(),
            development: DevelopmentConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            app = %config.app_name,
            "loaded app config"
        );
        Ok(config)
    }

    /// Serialize as pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the key-value store settings
    pub fn with_storage(mut self, storage: KvConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Set the theme settings
    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.theme = theme;
        self
    }
}
