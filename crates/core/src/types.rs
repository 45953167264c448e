//! Domain types for planned slide content.

use crate::theme::ThemeSelection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One planned slide, prior to rendering.
///
/// A slide carries at most one kind of primary content. When both `bullets`
/// and `text_block` are set the bullets win; when neither is set the slide
/// is rendered with its title only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slide {
    /// Slide title, always rendered verbatim.
    pub title: String,

    /// Bullet points in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,

    /// A paragraph used instead of bullet points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_block: Option<String>,

    /// File name of a previously extracted image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,

    /// Requested detail level. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,
}

impl Slide {
    /// Create a title-only slide.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the bullet points.
    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = Some(bullets.into_iter().map(Into::into).collect());
        self
    }

    /// Set the free-text paragraph.
    pub fn with_text_block(mut self, text: impl Into<String>) -> Self {
        self.text_block = Some(text.into());
        self
    }

    /// Attach an extracted image.
    pub fn with_image(mut self, filename: impl Into<String>) -> Self {
        self.image_filename = Some(filename.into());
        self
    }

    /// Bullet points, empty when none were given.
    pub fn bullets(&self) -> &[String] {
        self.bullets.as_deref().unwrap_or(&[])
    }

    /// The free-text paragraph, if it has any content.
    pub fn text_block(&self) -> Option<&str> {
        self.text_block.as_deref().filter(|t| !t.is_empty())
    }

    /// The attached image file name, if any.
    pub fn image(&self) -> Option<&str> {
        self.image_filename.as_deref().filter(|f| !f.is_empty())
    }
}

/// How much detail the summarization service was asked for (0-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DetailLevel(u8);

impl DetailLevel {
    /// Highest accepted level.
    pub const MAX: u8 = 4;

    /// Create a detail level, rejecting anything above 4.
    pub fn new(level: u8) -> Result<Self> {
        if level > Self::MAX {
            return Err(Error::InvalidDetailLevel(level));
        }
        Ok(Self(level))
    }

    /// Numeric value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "very concise",
            1 => "concise",
            2 => "normal",
            3 => "detailed",
            _ => "very detailed",
        }
    }
}

impl Default for DetailLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for DetailLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<DetailLevel> for u8 {
    fn from(level: DetailLevel) -> Self {
        level.0
    }
}

/// A request to render a deck: the slides plus the theme to paint them with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationRequest {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,

    /// Theme selection.
    #[serde(flatten)]
    pub theme: ThemeSelection,
}

impl PresentationRequest {
    /// Create a request.
    pub fn new(slides: Vec<Slide>, theme: ThemeSelection) -> Self {
        Self { slides, theme }
    }
}

/// The format of an uploaded source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Portable Document Format.
    Pdf,
}

impl SourceFormat {
    /// MIME type accepted for uploads.
    pub const PDF_MIME: &'static str = "application/pdf";

    /// Detect format from a declared content type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(Self::PDF_MIME) {
            Some(Self::Pdf)
        } else {
            None
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        // PDF files start with "%PDF-"
        if bytes.starts_with(b"%PDF-") {
            return Some(Self::Pdf);
        }
        None
    }

    /// Validate an upload. A declared content type is authoritative; without
    /// one the leading bytes decide.
    pub fn detect(content_type: Option<&str>, bytes: &[u8]) -> Result<Self> {
        match content_type {
            Some(ct) => Self::from_content_type(ct)
                .ok_or_else(|| Error::UnsupportedFormat(format!("{ct} (please upload a PDF)"))),
            None => Self::from_magic(bytes)
                .ok_or_else(|| Error::UnsupportedFormat("missing PDF header".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_builders() {
        let slide = Slide::new("Intro")
            .with_bullets(["A", "B"])
            .with_image("image_1_1.png");
        assert_eq!(slide.bullets(), ["A".to_string(), "B".to_string()]);
        assert_eq!(slide.image(), Some("image_1_1.png"));
        assert_eq!(slide.text_block(), None);
    }

    #[test]
    fn test_blank_optional_fields_read_as_absent() {
        let slide = Slide {
            title: "T".into(),
            text_block: Some(String::new()),
            image_filename: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(slide.text_block(), None);
        assert_eq!(slide.image(), None);
        assert!(slide.bullets().is_empty());
    }

    #[test]
    fn test_slide_deserializes_minimal_record() {
        let slide: Slide = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(slide, Slide::new("Only a title"));
    }

    #[test]
    fn test_slide_rejects_unknown_fields() {
        let result: std::result::Result<Slide, _> =
            serde_json::from_str(r#"{"title":"T","subtitle":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_detail_level_range() {
        assert_eq!(DetailLevel::new(0).unwrap().value(), 0);
        assert_eq!(DetailLevel::new(4).unwrap().label(), "very detailed");
        assert!(matches!(
            DetailLevel::new(5),
            Err(Error::InvalidDetailLevel(5))
        ));
        assert_eq!(DetailLevel::default().label(), "normal");
    }

    #[test]
    fn test_detail_level_serde() {
        let slide: Slide = serde_json::from_str(r#"{"title":"T","detail_level":3}"#).unwrap();
        assert_eq!(slide.detail_level, Some(DetailLevel::new(3).unwrap()));

        let bad: std::result::Result<Slide, _> =
            serde_json::from_str(r#"{"title":"T","detail_level":8}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_request_flattens_theme() {
        let req: PresentationRequest = serde_json::from_str(
            r#"{"slides":[{"title":"Intro"}],"theme_type":"color","theme_name":"corporate_blue"}"#,
        )
        .unwrap();
        assert_eq!(req.slides.len(), 1);
        assert_eq!(req.theme.theme_name, "corporate_blue");
    }

    #[test]
    fn test_source_format_detection() {
        assert_eq!(
            SourceFormat::detect(Some("application/pdf"), b"").unwrap(),
            SourceFormat::Pdf
        );
        assert_eq!(
            SourceFormat::detect(Some("Application/PDF; charset=binary"), b"").unwrap(),
            SourceFormat::Pdf
        );
        assert_eq!(
            SourceFormat::detect(None, b"%PDF-1.7\n").unwrap(),
            SourceFormat::Pdf
        );
        assert!(matches!(
            SourceFormat::detect(Some("image/png"), b"%PDF-1.7"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(SourceFormat::detect(None, b"PK\x03\x04").is_err());
    }
}
