//! Linux appearance detection
//!
//! Asks GNOME's `color-scheme` setting first, then falls back to the GTK theme
//! name (`Adwaita:dark`, `Yaru-dark`, ...).

use std::process::Command;

use crate::appearance::SystemScheme;

/// Probe the desktop's color scheme preference
pub fn detect_system_scheme() -> SystemScheme {
    let from_gsettings = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| parse_color_scheme(&String::from_utf8_lossy(&output.stdout)))
        .unwrap_or(SystemScheme::Unknown);

    if from_gsettings != SystemScheme::Unknown {
        return from_gsettings;
    }

    match std::env::var("GTK_THEME") {
        Ok(theme) => scheme_from_theme_name(&theme),
        Err(_) => {
            tracing::debug!("no desktop color scheme reported");
            SystemScheme::Unknown
        }
    }
}

/// Parse `gsettings get org.gnome.desktop.interface color-scheme` output
pub fn parse_color_scheme(output: &str) -> SystemScheme {
    match output.trim().trim_matches('\'') {
        "prefer-dark" => SystemScheme::Dark,
        "prefer-light" => SystemScheme::Light,
        _ => SystemScheme::Unknown,
    }
}

/// Infer the scheme from a GTK theme name
pub fn scheme_from_theme_name(theme: &str) -> SystemScheme {
    let normalized = theme.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        SystemScheme::Unknown
    } else if normalized.ends_with(":dark") || normalized.contains("-dark") {
        SystemScheme::Dark
    } else {
        SystemScheme::Light
    }
}
