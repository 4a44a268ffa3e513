//! Theme state management for the app shell
//!
//! This crate composes the persisted theme preference with the system
//! appearance signal, resolves the effective color scheme, and broadcasts
//! snapshots to views.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod broadcast;
pub mod config;
pub mod controller;
pub mod resolver;

pub use broadcast::ChangeBroadcaster;
pub use config::ThemeConfig;
pub use controller::{ThemeController, ThemeHandle};
pub use resolver::{resolve, ThemeSnapshot};
