//! Durable theme preference store
//!
//! Persists the user's [`ThemeMode`] under a fixed key. Reads and writes are
//! fail-soft: the UI never blocks on, or crashes because of, persistence.

use std::sync::Arc;
use thiserror::Error;

use crate::app_state::{ThemeMode, ThemePersistedState};
use crate::kv::{KeyValueStorage, KvError};

/// Storage key the theme record is written under
pub const THEME_STORAGE_KEY: &str = "theme-storage";

/// Preference store error types
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Backend read/write failed
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Stored payload could not be decoded (or encoded)
    #[error("Malformed theme record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for preference operations
pub type Result<T> = std::result::Result<T, PreferenceError>;

/// Theme preference store over any [`KeyValueStorage`] backend
#[derive(Clone)]
pub struct ThemePreferenceStore {
    backend: Arc<dyn KeyValueStorage>,
    key: String,
}

impl ThemePreferenceStore {
    /// Create a store writing under [`THEME_STORAGE_KEY`]
    pub fn new(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(backend, THEME_STORAGE_KEY)
    }

    /// Create a store writing under a custom key
    pub fn with_key(backend: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    /// The storage key in use
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted mode
    ///
    /// Returns [`ThemeMode::System`] when nothing is stored, the payload is
    /// malformed or names an unknown mode, or the backend fails. Never errors.
    pub async fn load(&self) -> ThemeMode {
        match self.try_load().await {
            Ok(Some(mode)) => mode,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted theme record");
                ThemeMode::default()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to load theme preference: {}", e);
                ThemeMode::default()
            }
        }
    }

    /// Load the persisted mode, surfacing errors
    pub async fn try_load(&self) -> Result<Option<ThemeMode>> {
        let Some(payload) = self.backend.get_item(&self.key).await? else {
            return Ok(None);
        };
        let record = ThemePersistedState::from_payload(&payload)?;
        Ok(Some(record.theme_mode))
    }

    /// Persist a mode
    ///
    /// Failures are logged and swallowed; returns whether the write landed.
    pub async fn save(&self, mode: ThemeMode) -> bool {
        match self.try_save(mode).await {
            Ok(()) => {
                tracing::debug!(key = %self.key, mode = %mode, "theme preference saved");
                true
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    mode = %mode,
                    "Failed to save theme preference: {}",
                    e
                );
                false
            }
        }
    }

    /// Persist a mode, surfacing errors
    pub async fn try_save(&self, mode: ThemeMode) -> Result<()> {
        let payload = ThemePersistedState::new(mode).to_payload()?;
        self.backend.set_item(&self.key, &payload).await?;
        Ok(())
    }

    /// Remove the persisted record
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove_item(&self.key).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ThemePreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePreferenceStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
