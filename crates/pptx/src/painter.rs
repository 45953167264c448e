//! Theme painting.
//!
//! A [`ThemePaint`] is resolved once per render from the requested theme and
//! then applied to every slide after its content has been placed.

use deck_core::{ImageStore, RgbColor, Theme, ThemeSelection};

use crate::media::MediaCatalog;
use crate::report::ThemeOutcome;
use crate::shapes::TextRole;
use crate::slide::SlidePart;
use crate::template::MasterStyle;

/// Resolved theming for one deck.
#[derive(Debug, Clone)]
pub struct ThemePaint {
    background: Option<RgbColor>,
    backdrop: Option<(usize, String)>,
    title_color: Option<RgbColor>,
    body_color: Option<RgbColor>,
    outcome: ThemeOutcome,
}

impl ThemePaint {
    /// Resolve `selection` against the registry. Background images are read
    /// from `backgrounds` and embedded into `media`. Nothing here fails: an
    /// unknown theme or a missing background is logged and reported.
    pub fn resolve(
        selection: &ThemeSelection,
        backgrounds: &ImageStore,
        media: &mut MediaCatalog,
    ) -> Self {
        let Some(theme) = selection.resolve() else {
            log::warn!(
                "No {} theme named '{}', rendering with template defaults",
                selection.theme_type,
                selection.theme_name
            );
            return Self::unthemed(ThemeOutcome::NotFound {
                theme_type: selection.theme_type,
                theme_name: selection.theme_name.clone(),
            });
        };

        let mut paint = Self::unthemed(ThemeOutcome::Applied {
            name: theme.name().to_string(),
        });
        paint.title_color = Some(theme.title_color());
        paint.body_color = Some(theme.body_color());

        match theme {
            Theme::Color(color) => {
                paint.background = Some(color.primary);
            }
            Theme::Background(bg) => {
                match embed_background(backgrounds, bg.image_filename, media) {
                    Some(index) => {
                        paint.backdrop = Some((index, bg.image_filename.to_string()));
                    }
                    None => {
                        paint.outcome = ThemeOutcome::BackgroundMissing {
                            name: bg.name.to_string(),
                            path: backgrounds.dir().join(bg.image_filename),
                        };
                    }
                }
            }
        }

        log::debug!("Theme resolved: {}", paint.outcome);
        paint
    }

    fn unthemed(outcome: ThemeOutcome) -> Self {
        Self {
            background: None,
            backdrop: None,
            title_color: None,
            body_color: None,
            outcome,
        }
    }

    pub fn outcome(&self) -> &ThemeOutcome {
        &self.outcome
    }

    /// Defaults for the slide master.
    pub fn master_style(&self) -> MasterStyle {
        MasterStyle {
            background: self.background,
            title_color: self.title_color,
            body_color: self.body_color,
        }
    }

    /// Paint one slide. Per-slide colors are always written so a slide reads
    /// correctly even where the master is ignored.
    pub fn apply(&self, slide: &mut SlidePart, media: &MediaCatalog) {
        if let Some(color) = self.background {
            slide.set_background(color);
        }
        if let Some((index, name)) = &self.backdrop {
            slide.set_backdrop(media, *index, name);
        }
        for shape in slide.text_shapes_mut() {
            let color = match shape.role {
                TextRole::Title => self.title_color,
                TextRole::Body | TextRole::MasterBody | TextRole::TextBox => self.body_color,
            };
            if let Some(color) = color {
                shape.set_color(color);
            }
        }
    }
}

fn embed_background(
    backgrounds: &ImageStore,
    filename: &str,
    media: &mut MediaCatalog,
) -> Option<usize> {
    let key = format!("background:{}", filename);
    if let Some(index) = media.lookup(&key) {
        return Some(index);
    }

    let bytes = match backgrounds.load(filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!(
                "Background image {} unavailable, continuing without it: {}",
                backgrounds.dir().join(filename).display(),
                e
            );
            return None;
        }
    };

    match media.add(&key, bytes) {
        Ok(index) => Some(index),
        Err(e) => {
            log::warn!("Background image {} unusable: {}", filename, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BODY_FULL, TITLE};
    use crate::shapes::{Paragraph, Shape};
    use crate::test_support::png;
    use deck_core::{LayoutKind, ThemeType};

    fn themed_slide() -> SlidePart {
        let mut slide = SlidePart::new(LayoutKind::Bulleted);
        slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new("Intro")]);
        slide.add_text(
            TextRole::Body,
            BODY_FULL,
            vec![Paragraph::new("A"), Paragraph::new("B")],
        );
        slide
    }

    fn colors(slide: &SlidePart) -> Vec<Option<RgbColor>> {
        slide
            .shapes()
            .iter()
            .flat_map(|s| match s {
                Shape::Text(t) => t.paragraphs.iter().map(|p| p.color).collect(),
                Shape::Picture(_) => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_color_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut media = MediaCatalog::new();
        let paint = ThemePaint::resolve(
            &ThemeSelection::new(ThemeType::Color, "corporate_blue"),
            &ImageStore::new(dir.path()),
            &mut media,
        );
        assert!(paint.outcome().is_applied());

        let mut slide = themed_slide();
        paint.apply(&mut slide, &media);
        assert_eq!(slide.background(), Some(RgbColor::from_u32(0x2563eb)));
        assert!(slide.backdrop().is_none());
        assert_eq!(
            colors(&slide),
            vec![
                Some(RgbColor::from_u32(0xdbeafe)),
                Some(RgbColor::from_u32(0x1e40af)),
                Some(RgbColor::from_u32(0x1e40af)),
            ]
        );
        assert_eq!(paint.master_style().background, Some(RgbColor::from_u32(0x2563eb)));
        assert!(media.is_empty());
    }

    #[test]
    fn test_unknown_theme_leaves_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut media = MediaCatalog::new();
        let paint = ThemePaint::resolve(
            &ThemeSelection::new(ThemeType::Color, "not_a_real_theme"),
            &ImageStore::new(dir.path()),
            &mut media,
        );
        assert!(matches!(paint.outcome(), ThemeOutcome::NotFound { .. }));
        assert_eq!(paint.master_style(), MasterStyle::default());

        let mut slide = themed_slide();
        paint.apply(&mut slide, &media);
        assert!(slide.background().is_none());
        assert!(colors(&slide).iter().all(Option::is_none));
    }

    #[test]
    fn test_background_theme_sets_backdrop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blue_gradient.jpg"), png(32, 18)).unwrap();
        let mut media = MediaCatalog::new();
        let paint = ThemePaint::resolve(
            &ThemeSelection::new(ThemeType::Background, "blue_gradient"),
            &ImageStore::new(dir.path()),
            &mut media,
        );
        assert!(paint.outcome().is_applied());
        assert_eq!(media.len(), 1);

        let mut slide = themed_slide();
        paint.apply(&mut slide, &media);
        let backdrop = slide.backdrop().unwrap();
        assert!(backdrop.rect.is_full_slide());
        assert!(slide.background().is_none());
        assert_eq!(colors(&slide)[0], Some(RgbColor::from_u32(0x000000)));
        assert_eq!(colors(&slide)[1], Some(RgbColor::from_u32(0xffffff)));
    }

    #[test]
    fn test_missing_background_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut media = MediaCatalog::new();
        let paint = ThemePaint::resolve(
            &ThemeSelection::new(ThemeType::Background, "green_gradient"),
            &ImageStore::new(dir.path()),
            &mut media,
        );
        match paint.outcome() {
            ThemeOutcome::BackgroundMissing { name, path } => {
                assert_eq!(name, "green_gradient");
                assert!(path.ends_with("green_gradient.jpg"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let mut slide = themed_slide();
        paint.apply(&mut slide, &media);
        assert!(slide.backdrop().is_none());
        assert!(slide.background().is_none());
        assert_eq!(colors(&slide)[1], Some(RgbColor::from_u32(0xffffff)));
    }
}
