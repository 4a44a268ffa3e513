//! Storage layer for the app shell
//!
//! This crate provides the key-value storage seam, a durable sled-backed
//! store, an in-memory store, and the theme preference record persisted
//! through them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app_state;
pub mod kv;
pub mod memory;
pub mod preferences;

pub use app_state::{ThemeMode, ThemePersistedState};
pub use kv::{KeyValueStorage, KvConfig, KvError, KvStore};
pub use memory::MemoryStorage;
pub use preferences::{PreferenceError, ThemePreferenceStore, THEME_STORAGE_KEY};
