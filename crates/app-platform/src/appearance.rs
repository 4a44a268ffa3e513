//! System appearance signal
//!
//! Holds the OS-level light/dark preference as an observable value. The host
//! bridge pushes changes with [`SystemAppearance::update`]; desktop hosts can
//! instead call [`SystemAppearance::refresh`] to re-probe the OS.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::observable::{Observable, Subscription};

/// OS-level color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SystemScheme {
    /// OS prefers light
    Light,
    /// OS prefers dark
    Dark,
    /// OS did not report a preference
    #[default]
    Unknown,
}

impl SystemScheme {
    /// Map the platform's `"light" | "dark" | null` value
    pub fn from_platform(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "dark" => SystemScheme::Dark,
            Some(v) if v == "light" => SystemScheme::Light,
            _ => SystemScheme::Unknown,
        }
    }

    /// Platform value (`None` for unknown)
    pub fn as_platform(&self) -> Option<&'static str> {
        match self {
            SystemScheme::Light => Some("light"),
            SystemScheme::Dark => Some("dark"),
            SystemScheme::Unknown => None,
        }
    }

    /// Whether the OS reports dark
    pub fn is_dark(&self) -> bool {
        matches!(self, SystemScheme::Dark)
    }
}

impl fmt::Display for SystemScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_platform().unwrap_or("unknown"))
    }
}

/// Observable system appearance
pub struct SystemAppearance {
    scheme: Observable<SystemScheme>,
}

impl SystemAppearance {
    /// Create a signal with a known initial value
    pub fn new(initial: SystemScheme) -> Self {
        Self { scheme: Observable::new(initial) }
    }

    /// Create a signal seeded from the OS
    pub fn detect() -> Self {
        Self::new(crate::detect_system_scheme())
    }

    /// Current system scheme
    pub fn current(&self) -> SystemScheme {
        self.scheme.get()
    }

    /// Listen for system scheme transitions
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SystemScheme) + Send + Sync + 'static,
    {
        self.scheme.subscribe(listener)
    }

    /// Push a new system scheme (from the host's appearance callback)
    ///
    /// Returns whether the value changed.
    pub fn update(&self, scheme: SystemScheme) -> bool {
        let changed = self.scheme.set(scheme);
        if changed {
            tracing::debug!(scheme = %scheme, "system appearance changed");
        }
        changed
    }

    /// Re-probe the OS and push the result
    pub fn refresh(&self) -> bool {
        self.update(crate::detect_system_scheme())
    }

    /// Number of active listeners
    pub fn listener_count(&self) -> usize {
        self.scheme.listener_count()
    }
}

impl Default for SystemAppearance {
    fn default() -> Self {
        Self::new(SystemScheme::Unknown)
    }
}

impl fmt::Debug for SystemAppearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemAppearance")
            .field("scheme", &self.current())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
