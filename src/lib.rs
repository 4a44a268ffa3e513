//! App shell
//!
//! Wires the theme subsystem together: configuration, logging, the durable
//! preference store, the system appearance signal, and the theme controller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod logging;

pub use app::App;
pub use config::{AppConfig, ConfigError, DevelopmentConfig};
pub use logging::init_logging;
