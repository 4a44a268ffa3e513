//! Platform-specific code for the app shell
//!
//! This crate owns the system appearance signal and the observable primitive
//! it is built on, plus per-OS probes for the light/dark preference on
//! Windows, macOS, and Linux.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod appearance;
pub mod observable;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

pub use appearance::{SystemAppearance, SystemScheme};
pub use observable::{ListenerSet, Observable, Subscription};

/// Best-effort probe of the OS light/dark preference
///
/// Any failure (missing tool, headless session, unsupported OS) yields
/// [`SystemScheme::Unknown`].
pub fn detect_system_scheme() -> SystemScheme {
    #[cfg(target_os = "windows")]
    {
        windows::detect_system_scheme()
    }
    #[cfg(target_os = "macos")]
    {
        macos::detect_system_scheme()
    }
    #[cfg(target_os = "linux")]
    {
        linux::detect_system_scheme()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        SystemScheme::Unknown
    }
}
