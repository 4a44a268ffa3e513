//! macOS appearance detection

use std::process::Command;

use crate::appearance::SystemScheme;

/// Probe `AppleInterfaceStyle`
///
/// The key is only present when dark mode is on, so a failed read means light.
pub fn detect_system_scheme() -> SystemScheme {
    match Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
    {
        Ok(output) => parse_interface_style(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            tracing::debug!("Failed to query AppleInterfaceStyle: {}", e);
            SystemScheme::Unknown
        }
    }
}

/// Parse `defaults read -g AppleInterfaceStyle` output
pub fn parse_interface_style(output: &str) -> SystemScheme {
    if output.trim().eq_ignore_ascii_case("dark") {
        SystemScheme::Dark
    } else {
        SystemScheme::Light
    }
}
