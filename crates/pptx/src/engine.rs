//! The layout engine: slide records plus a theme selection in, a `.pptx`
//! out.

use deck_core::{
    Error, FontSizer, ImageStore, LayoutKind, PresentationRequest, RenderConfig, Result, Slide,
};

use crate::geometry::{body_region, image_region, TITLE};
use crate::media::MediaCatalog;
use crate::package::Package;
use crate::painter::ThemePaint;
use crate::report::{ImageOutcome, RenderReport, SlideReport};
use crate::shapes::{Paragraph, TextRole};
use crate::slide::SlidePart;

/// A rendered presentation ready for delivery.
#[derive(Debug, Clone)]
pub struct RenderedDeck {
    pub bytes: Vec<u8>,
    /// Suggested download name.
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub report: RenderReport,
}

impl RenderedDeck {
    pub const FILENAME: &'static str = "presentation.pptx";
    pub const MIME_TYPE: &'static str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";
}

/// Renders slide records into a themed presentation.
///
/// The engine holds configuration only. Every call builds its own document,
/// so one engine can serve concurrent renders.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: RenderConfig,
}

impl LayoutEngine {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a request.
    ///
    /// Unknown themes and missing images degrade the result and show up in
    /// the report; only packaging failures are errors.
    pub fn render(&self, request: &PresentationRequest) -> Result<RenderedDeck> {
        log::info!(
            "Rendering {} slides with {} theme '{}'",
            request.slides.len(),
            request.theme.theme_type,
            request.theme.theme_name
        );

        let images = self.config.image_store();
        let mut media = MediaCatalog::new();
        let paint = ThemePaint::resolve(
            &request.theme,
            &self.config.background_store(),
            &mut media,
        );

        let mut slides = Vec::with_capacity(request.slides.len());
        let mut reports = Vec::with_capacity(request.slides.len());
        for (index, record) in request.slides.iter().enumerate() {
            let (mut slide, report) = self.build_slide(index, record, &images, &mut media);
            paint.apply(&mut slide, &media);
            slides.push(slide);
            reports.push(report);
        }

        let bytes = Package {
            slides: &slides,
            media: &media,
            master: paint.master_style(),
        }
        .to_bytes()?;

        Ok(RenderedDeck {
            bytes,
            filename: RenderedDeck::FILENAME,
            mime_type: RenderedDeck::MIME_TYPE,
            report: RenderReport {
                theme: paint.outcome().clone(),
                slides: reports,
            },
        })
    }

    fn build_slide(
        &self,
        index: usize,
        record: &Slide,
        images: &ImageStore,
        media: &mut MediaCatalog,
    ) -> (SlidePart, SlideReport) {
        let kind = LayoutKind::classify(record);
        let sizer: &FontSizer = self.config.font_sizer();
        let mut slide = SlidePart::new(kind);

        slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new(record.title.as_str())]);

        let mut image_outcome = ImageOutcome::None;
        let mut placed = None;
        if let Some(filename) = record.image() {
            image_outcome = match embed_image(filename, images, media) {
                Ok(media_index) => {
                    placed = Some((media_index, filename));
                    ImageOutcome::Placed {
                        filename: filename.to_string(),
                    }
                }
                Err(Error::ImageNotFound(_)) => {
                    log::warn!("Slide {}: image {} not found, skipping", index + 1, filename);
                    ImageOutcome::Missing {
                        filename: filename.to_string(),
                    }
                }
                Err(e) => {
                    log::warn!("Slide {}: image {} unusable: {}", index + 1, filename, e);
                    ImageOutcome::Unreadable {
                        filename: filename.to_string(),
                        reason: e.to_string(),
                    }
                }
            };
        }
        let body = body_region(placed.is_some());

        let font_size_pt = match kind {
            LayoutKind::Bulleted => {
                let size = sizer.size_for(kind.body_chars(record));
                let paragraphs = record
                    .bullets()
                    .iter()
                    .map(|b| Paragraph::new(b.as_str()).with_size(size))
                    .collect();
                slide.add_text(TextRole::Body, body, paragraphs);
                Some(size)
            }
            LayoutKind::FreeText => {
                let size = sizer.size_for(kind.body_chars(record));
                let text = record.text_block().unwrap_or_default();
                slide.add_text(TextRole::TextBox, body, vec![Paragraph::new(text).with_size(size)]);
                Some(size)
            }
            LayoutKind::TitleOnly => None,
        };

        if let Some((media_index, filename)) = placed {
            if let Some(part) = media.get(media_index) {
                let rect = image_region(part.width_px, part.height_px);
                slide.add_picture(media, media_index, rect, filename);
            }
        }

        log::debug!(
            "Slide {}: {:?}, font {:?}, image {:?}",
            index + 1,
            kind,
            font_size_pt,
            image_outcome
        );

        let report = SlideReport {
            title: record.title.clone(),
            layout: kind,
            font_size_pt,
            image: image_outcome,
        };
        (slide, report)
    }
}

/// Load a slide image into the media catalog, reusing an earlier copy.
fn embed_image(filename: &str, images: &ImageStore, media: &mut MediaCatalog) -> Result<usize> {
    let key = format!("image:{}", filename);
    if let Some(found) = media.lookup(&key) {
        return Ok(found);
    }
    let bytes = images.load(filename)?;
    media.add(&key, bytes)
}
