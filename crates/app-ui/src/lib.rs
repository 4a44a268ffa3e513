//! User interface primitives for the app shell
//!
//! This crate holds what views read to paint themselves: the palette table,
//! the navigation container theme, and the status bar style, each keyed by
//! the resolved [`theme::ColorScheme`].
//!
//! # Example
//!
//! ```rust
//! use app_ui::theme::{palette, status_bar_style, ColorScheme, StatusBarContent};
//!
//! let colors = palette(ColorScheme::Light);
//! assert_eq!(colors.tint, "#0a7ea4");
//!
//! let bar = status_bar_style(ColorScheme::Dark);
//! assert_eq!(bar.content, StatusBarContent::Light);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme;

// Re-export commonly used types
pub use theme::{
    navigation_theme, palette, parse_hex_color, status_bar_style, with_alpha, Color,
    ColorScheme, NavigationColors, NavigationTheme, Palette, PaletteSlot, StatusBarContent,
    StatusBarStyle, DARK, LIGHT,
};
