//! What a render actually did, including every degradation it absorbed.

use deck_core::{LayoutKind, ThemeType};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How theming went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThemeOutcome {
    /// The theme was resolved and painted.
    Applied { name: String },
    /// No theme of that type and name exists; template defaults were kept.
    NotFound {
        theme_type: ThemeType,
        theme_name: String,
    },
    /// Background theme resolved but its image is missing. Text colors were
    /// still applied.
    BackgroundMissing { name: String, path: PathBuf },
}

impl ThemeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ThemeOutcome::Applied { .. })
    }
}

impl fmt::Display for ThemeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeOutcome::Applied { name } => write!(f, "theme '{}' applied", name),
            ThemeOutcome::NotFound {
                theme_type,
                theme_name,
            } => write!(f, "no {} theme named '{}'", theme_type, theme_name),
            ThemeOutcome::BackgroundMissing { name, path } => write!(
                f,
                "theme '{}' applied without background ({} missing)",
                name,
                path.display()
            ),
        }
    }
}

/// What happened to a slide's image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// The slide did not reference an image.
    None,
    /// The image was embedded and placed.
    Placed { filename: String },
    /// The referenced file does not exist in the image store.
    Missing { filename: String },
    /// The file exists but is not an image the deck can embed.
    Unreadable { filename: String, reason: String },
}

/// Per-slide record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideReport {
    pub title: String,
    pub layout: LayoutKind,
    /// Body font size in points, if the slide has body text.
    pub font_size_pt: Option<u32>,
    pub image: ImageOutcome,
}

/// Summary of one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub theme: ThemeOutcome,
    pub slides: Vec<SlideReport>,
}

impl RenderReport {
    /// Whether anything was skipped.
    pub fn is_degraded(&self) -> bool {
        !self.theme.is_applied()
            || self.slides.iter().any(|s| {
                matches!(
                    s.image,
                    ImageOutcome::Missing { .. } | ImageOutcome::Unreadable { .. }
                )
            })
    }

    /// Number of slides that carry a placed image.
    pub fn placed_images(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| matches!(s.image, ImageOutcome::Placed { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(image: ImageOutcome) -> SlideReport {
        SlideReport {
            title: "T".to_string(),
            layout: LayoutKind::TitleOnly,
            font_size_pt: None,
            image,
        }
    }

    #[test]
    fn test_degraded() {
        let applied = ThemeOutcome::Applied {
            name: "corporate_blue".to_string(),
        };
        let clean = RenderReport {
            theme: applied.clone(),
            slides: vec![slide(ImageOutcome::None)],
        };
        assert!(!clean.is_degraded());

        let missing = RenderReport {
            theme: applied,
            slides: vec![slide(ImageOutcome::Missing {
                filename: "x.png".to_string(),
            })],
        };
        assert!(missing.is_degraded());
        assert_eq!(missing.placed_images(), 0);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = ThemeOutcome::NotFound {
            theme_type: ThemeType::Color,
            theme_name: "nope".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["theme_type"], "color");
        assert_eq!(outcome.to_string(), "no color theme named 'nope'");
    }
}
