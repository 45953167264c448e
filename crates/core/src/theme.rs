//! Theme registry and resolution.
//!
//! Themes are either a set of solid colors or a background picture with
//! text colors chosen to stay legible on top of it. The registry is a
//! static list; lookups never fail hard, an unknown name simply means
//! "render without a theme".

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor(u32);

impl RgbColor {
    /// Create a color from a `0xRRGGBB` value.
    pub const fn from_u32(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Parse a six digit hex string, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_u32)
    }

    /// Uppercase hex digits as used by `a:srgbClr`.
    pub fn hex(self) -> String {
        format!("{:06X}", self.0)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// The two families of themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    /// Solid background plus title/body colors.
    Color,
    /// Full-bleed background picture plus title/body colors.
    Background,
}

impl ThemeType {
    /// Name as used in requests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ThemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" => Ok(Self::Color),
            "background" => Ok(Self::Background),
            _ => Err(Error::InvalidThemeType(s.to_string())),
        }
    }
}

/// A theme made of solid colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    pub name: &'static str,
    pub display_name: &'static str,
    /// Slide background fill.
    pub primary: RgbColor,
    /// Title text.
    pub secondary: RgbColor,
    /// Body text.
    pub text: RgbColor,
}

/// A theme built around a background picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundTheme {
    pub name: &'static str,
    pub display_name: &'static str,
    /// File name relative to the backgrounds directory.
    pub image_filename: &'static str,
    pub title: RgbColor,
    pub text: RgbColor,
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Theme {
    Color(ColorTheme),
    Background(BackgroundTheme),
}

impl Theme {
    /// Registry key.
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Color(t) => t.name,
            Theme::Background(t) => t.name,
        }
    }

    /// Name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Color(t) => t.display_name,
            Theme::Background(t) => t.display_name,
        }
    }

    /// Which family this theme belongs to.
    pub fn theme_type(&self) -> ThemeType {
        match self {
            Theme::Color(_) => ThemeType::Color,
            Theme::Background(_) => ThemeType::Background,
        }
    }

    /// Color for slide titles.
    pub fn title_color(&self) -> RgbColor {
        match self {
            Theme::Color(t) => t.secondary,
            Theme::Background(t) => t.title,
        }
    }

    /// Color for body text.
    pub fn body_color(&self) -> RgbColor {
        match self {
            Theme::Color(t) => t.text,
            Theme::Background(t) => t.text,
        }
    }

    /// Listing entry for display.
    pub fn summary(&self) -> ThemeSummary {
        ThemeSummary {
            name: self.name(),
            display_name: self.display_name(),
            theme_type: self.theme_type(),
        }
    }
}

/// Serializable registry listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSummary {
    pub name: &'static str,
    pub display_name: &'static str,
    pub theme_type: ThemeType,
}

const fn color(
    name: &'static str,
    display_name: &'static str,
    primary: u32,
    secondary: u32,
    text: u32,
) -> Theme {
    Theme::Color(ColorTheme {
        name,
        display_name,
        primary: RgbColor::from_u32(primary),
        secondary: RgbColor::from_u32(secondary),
        text: RgbColor::from_u32(text),
    })
}

const fn background(
    name: &'static str,
    display_name: &'static str,
    image_filename: &'static str,
    title: u32,
    text: u32,
) -> Theme {
    Theme::Background(BackgroundTheme {
        name,
        display_name,
        image_filename,
        title: RgbColor::from_u32(title),
        text: RgbColor::from_u32(text),
    })
}

static REGISTRY: &[Theme] = &[
    color("corporate_blue", "Corporate Blue", 0x2563eb, 0xdbeafe, 0x1e40af),
    color("elegant_purple", "Elegant Purple", 0x7c3aed, 0xede9fe, 0x5b21b6),
    color("modern_teal", "Modern Teal", 0x0d9488, 0xccfbf1, 0x0f766e),
    color("warm_orange", "Warm Orange", 0xea580c, 0xfed7aa, 0xc2410c),
    color("professional_gray", "Professional Gray", 0x4b5563, 0xf3f4f6, 0x374151),
    color("vibrant_green", "Vibrant Green", 0x16a34a, 0xdcfce7, 0x15803d),
    background("blue_gradient", "Blue Gradient", "blue_gradient.jpg", 0x000000, 0xffffff),
    background("geometric_pattern", "Geometric Pattern", "geometric_pattern.jpg", 0x000000, 0x000000),
    background("green_gradient", "Green Gradient", "green_gradient.jpg", 0x000000, 0xffffff),
];

/// All registered themes.
pub fn themes() -> &'static [Theme] {
    REGISTRY
}

/// Look up a theme by exact name within one family.
pub fn resolve(theme_type: ThemeType, theme_name: &str) -> Option<&'static Theme> {
    REGISTRY
        .iter()
        .find(|t| t.theme_type() == theme_type && t.name() == theme_name)
}

/// The theme a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSelection {
    pub theme_type: ThemeType,
    pub theme_name: String,
}

impl ThemeSelection {
    /// Create a selection.
    pub fn new(theme_type: ThemeType, theme_name: impl Into<String>) -> Self {
        Self {
            theme_type,
            theme_name: theme_name.into(),
        }
    }

    /// Resolve against the registry.
    pub fn resolve(&self) -> Option<&'static Theme> {
        resolve(self.theme_type, &self.theme_name)
    }
}
