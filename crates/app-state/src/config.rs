//! Theme subsystem configuration

use serde::{Deserialize, Serialize};
use storage::THEME_STORAGE_KEY;

/// Theme controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    /// Key the preference is persisted under
    pub storage_key: String,
    /// Probe the OS for its color scheme at startup
    pub detect_system_scheme: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { storage_key: THEME_STORAGE_KEY.to_string(), detect_system_scheme: true }
    }
}

impl ThemeConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Enable or disable startup detection of the system scheme
    pub fn detect_system_scheme(mut self, enabled: bool) -> Self {
        self.detect_system_scheme = enabled;
        self
    }
}
