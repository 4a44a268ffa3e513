//! Theme resolution
//!
//! Combines the user's [`ThemeMode`] with the OS [`SystemScheme`] into the
//! concrete [`ColorScheme`] the UI renders, and packages the result as an
//! immutable [`ThemeSnapshot`].

use app_platform::SystemScheme;
use app_ui::{
    navigation_theme, palette, status_bar_style, ColorScheme, NavigationTheme, Palette,
    StatusBarStyle,
};
use serde::Serialize;
use storage::ThemeMode;

/// Resolve a preference against the system scheme
///
/// Fixed modes ignore the system. `System` follows it, treating an unknown
/// system scheme as light.
pub fn resolve(mode: ThemeMode, system: SystemScheme) -> ColorScheme {
    match mode {
        ThemeMode::Light => ColorScheme::Light,
        ThemeMode::Dark => ColorScheme::Dark,
        ThemeMode::System => match system {
            SystemScheme::Dark => ColorScheme::Dark,
            SystemScheme::Light | SystemScheme::Unknown => ColorScheme::Light,
        },
    }
}

/// Immutable view of the theme at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    /// Monotonic state version; later snapshots carry larger versions
    pub version: u64,
    /// User preference
    pub mode: ThemeMode,
    /// Last observed system scheme
    pub system_scheme: SystemScheme,
    /// Effective scheme
    pub resolved: ColorScheme,
    /// Shorthand for `resolved == Dark`
    pub is_dark: bool,
    /// Palette for `resolved`
    pub palette: &'static Palette,
}

impl ThemeSnapshot {
    /// Build a snapshot, deriving the resolved scheme and palette
    pub fn new(mode: ThemeMode, system_scheme: SystemScheme, version: u64) -> Self {
        let resolved = resolve(mode, system_scheme);
        Self {
            version,
            mode,
            system_scheme,
            resolved,
            is_dark: resolved.is_dark(),
            palette: palette(resolved),
        }
    }

    /// Navigation container theme for this snapshot
    pub fn navigation_theme(&self) -> &'static NavigationTheme {
        navigation_theme(self.resolved)
    }

    /// Status bar style for this snapshot
    pub fn status_bar(&self) -> StatusBarStyle {
        status_bar_style(self.resolved)
    }

    /// Whether a subscriber would render `other` any differently
    ///
    /// Only the preference and the resolved scheme are observable; a system
    /// change under a fixed mode is not.
    pub fn presents_like(&self, other: &ThemeSnapshot) -> bool {
        self.mode == other.mode && self.resolved == other.resolved
    }
}

impl Default for ThemeSnapshot {
    fn default() -> Self {
        Self::new(ThemeMode::default(), SystemScheme::default(), 0)
    }
}
