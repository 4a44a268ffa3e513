//! Palette table and scheme-dependent chrome
//!
//! Two immutable palettes exist, one per resolved [`ColorScheme`]. Every
//! semantic slot is a field of [`Palette`], so a palette missing a slot does
//! not compile.
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{palette, ColorScheme};
//!
//! let colors = palette(ColorScheme::Dark);
//! assert_eq!(colors.background, "#151718");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Color Utilities
// =============================================================================

/// A color as a hex string (`#rgb`, `#rrggbb`, or `#rrggbbaa`)
pub type Color = &'static str;

/// Parse a hex color string to RGB components
///
/// Accepts the 3-digit shorthand; an alpha channel, if present, is ignored.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Apply an alpha channel to a palette color
///
/// Used for hairline borders and selection highlights, e.g. the icon color at
/// alpha `0x20`.
pub fn with_alpha(color: &str, alpha: u8) -> Option<String> {
    let (r, g, b) = parse_hex_color(color)?;
    Some(format!("{}{:02X}", rgb_to_hex(r, g, b), alpha))
}

// =============================================================================
// Color Scheme
// =============================================================================

/// Resolved color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light scheme
    #[default]
    Light,
    /// Dark scheme
    Dark,
}

impl ColorScheme {
    /// Scheme name (`light` or `dark`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Whether this is the dark scheme
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

// =============================================================================
// Palette
// =============================================================================

/// Semantic color slots consumed by views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaletteSlot {
    /// Primary text
    Text,
    /// Screen background
    Background,
    /// Accent for selected/active controls
    Tint,
    /// Icon color
    Icon,
    /// Unselected tab bar icon
    TabIconDefault,
    /// Selected tab bar icon
    TabIconSelected,
}

impl PaletteSlot {
    /// Every slot
    pub const ALL: [PaletteSlot; 6] = [
        PaletteSlot::Text,
        PaletteSlot::Background,
        PaletteSlot::Tint,
        PaletteSlot::Icon,
        PaletteSlot::TabIconDefault,
        PaletteSlot::TabIconSelected,
    ];
}

/// Concrete colors for one scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Primary text
    pub text: Color,
    /// Screen background
    pub background: Color,
    /// Accent for selected/active controls
    pub tint: Color,
    /// Icon color
    pub icon: Color,
    /// Unselected tab bar icon
    pub tab_icon_default: Color,
    /// Selected tab bar icon
    pub tab_icon_selected: Color,
}

impl Palette {
    /// Look up a slot
    pub fn get(&self, slot: PaletteSlot) -> Color {
        match slot {
            PaletteSlot::Text => self.text,
            PaletteSlot::Background => self.background,
            PaletteSlot::Tint => self.tint,
            PaletteSlot::Icon => self.icon,
            PaletteSlot::TabIconDefault => self.tab_icon_default,
            PaletteSlot::TabIconSelected => self.tab_icon_selected,
        }
    }
}

const TINT_LIGHT: Color = "#0a7ea4";
const TINT_DARK: Color = "#fff";

/// Light palette
pub const LIGHT: Palette = Palette {
    text: "#11181C",
    background: "#fff",
    tint: TINT_LIGHT,
    icon: "#687076",
    tab_icon_default: "#687076",
    tab_icon_selected: TINT_LIGHT,
};

/// Dark palette
pub const DARK: Palette = Palette {
    text: "#ECEDEE",
    background: "#151718",
    tint: TINT_DARK,
    icon: "#9BA1A6",
    tab_icon_default: "#9BA1A6",
    tab_icon_selected: TINT_DARK,
};

/// Palette for a resolved scheme
pub fn palette(scheme: ColorScheme) -> &'static Palette {
    match scheme {
        ColorScheme::Light => &LIGHT,
        ColorScheme::Dark => &DARK,
    }
}

// =============================================================================
// Navigation Container Theme
// =============================================================================

/// Colors the navigation container paints headers, cards, and tab bars with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationColors {
    /// Active tint
    pub primary: Color,
    /// Screen background
    pub background: Color,
    /// Header/card surface
    pub card: Color,
    /// Header text
    pub text: Color,
    /// Header/tab bar hairline
    pub border: Color,
    /// Badge color
    pub notification: Color,
}

/// Navigation container theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationTheme {
    /// Whether this is the dark variant
    pub dark: bool,
    /// Container colors
    pub colors: NavigationColors,
}

/// Default (light) navigation theme
pub const NAVIGATION_DEFAULT: NavigationTheme = NavigationTheme {
    dark: false,
    colors: NavigationColors {
        primary: "#007AFF",
        background: "#F2F2F2",
        card: "#FFFFFF",
        text: "#1C1C1E",
        border: "#D8D8D8",
        notification: "#FF3B30",
    },
};

/// Dark navigation theme
pub const NAVIGATION_DARK: NavigationTheme = NavigationTheme {
    dark: true,
    colors: NavigationColors {
        primary: "#0A84FF",
        background: "#010101",
        card: "#121212",
        text: "#E5E5E7",
        border: "#272729",
        notification: "#FF453A",
    },
};

/// Navigation theme for a resolved scheme
pub fn navigation_theme(scheme: ColorScheme) -> &'static NavigationTheme {
    match scheme {
        ColorScheme::Light => &NAVIGATION_DEFAULT,
        ColorScheme::Dark => &NAVIGATION_DARK,
    }
}

// =============================================================================
// Status Bar
// =============================================================================

/// Status bar glyph color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarContent {
    /// Light glyphs (for dark backgrounds)
    Light,
    /// Dark glyphs (for light backgrounds)
    Dark,
}

/// Status bar appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBarStyle {
    /// Glyph color
    pub content: StatusBarContent,
    /// Background color (Android)
    pub background_color: Color,
}

/// Status bar style for a resolved scheme
///
/// Glyphs contrast with the scheme; the background matches the palette.
pub fn status_bar_style(scheme: ColorScheme) -> StatusBarStyle {
    let content = match scheme {
        ColorScheme::Light => StatusBarContent::Dark,
        ColorScheme::Dark => StatusBarContent::Light,
    };
    StatusBarStyle { content, background_color: palette(scheme).background }
}
