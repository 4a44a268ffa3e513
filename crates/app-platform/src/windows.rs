//! Windows appearance detection

use std::process::Command;

use crate::appearance::SystemScheme;

const PERSONALIZE_KEY: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";

/// Probe the `AppsUseLightTheme` registry value
pub fn detect_system_scheme() -> SystemScheme {
    match Command::new("reg")
        .args(["query", PERSONALIZE_KEY, "/v", "AppsUseLightTheme"])
        .output()
    {
        Ok(output) if output.status.success() => {
            parse_apps_use_light_theme(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(_) => SystemScheme::Unknown,
        Err(e) => {
            tracing::debug!("Failed to query AppsUseLightTheme: {}", e);
            SystemScheme::Unknown
        }
    }
}

/// Parse `reg query ... /v AppsUseLightTheme` output
pub fn parse_apps_use_light_theme(output: &str) -> SystemScheme {
    let value = output
        .lines()
        .find(|line| line.contains("AppsUseLightTheme"))
        .and_then(|line| line.split_whitespace().last());

    match value {
        Some("0x0") => SystemScheme::Dark,
        Some("0x1") => SystemScheme::Light,
        _ => SystemScheme::Unknown,
    }
}
