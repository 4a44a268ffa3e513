//! Persisted theme state schema
//!
//! This module defines the theme mode preference and the record written under
//! the theme storage key.
//!
//! # Format
//!
//! The record is a JSON object holding only the mode:
//!
//! ```json
//! { "themeMode": "dark" }
//! ```
//!
//! Unknown fields are ignored. Older builds wrapped the record in an envelope
//! (`{"state":{"themeMode":"dark"},"version":0}`); that shape is still accepted
//! on read but never written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Theme mode preference chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always use light mode
    Light,
    /// Always use dark mode
    Dark,
    /// Follow system color scheme
    #[default]
    System,
}

impl ThemeMode {
    /// Every mode, in the order the settings screen lists them
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    /// Serialized name (`light`, `dark`, `system`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// Label shown in the theme picker
    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::System => "System",
        }
    }

    /// Whether this mode defers to the system appearance
    pub fn follows_system(&self) -> bool {
        matches!(self, ThemeMode::System)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

/// Record persisted under the theme storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThemePersistedState {
    /// Theme mode preference (light, dark, or system)
    pub theme_mode: ThemeMode,
}

/// Envelope written by older builds
#[derive(Deserialize)]
struct LegacyEnvelope {
    state: ThemePersistedState,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Flat(ThemePersistedState),
    Envelope(LegacyEnvelope),
}

impl ThemePersistedState {
    /// Create a record for a mode
    pub fn new(theme_mode: ThemeMode) -> Self {
        Self { theme_mode }
    }

    /// Serialize to the stored payload
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored payload, accepting the flat record or the legacy envelope
    pub fn from_payload(payload: &str) -> serde_json::Result<Self> {
        match serde_json::from_str::<StoredRecord>(payload)? {
            StoredRecord::Flat(record) => Ok(record),
            StoredRecord::Envelope(envelope) => Ok(envelope.state),
        }
    }
}
