//! Error types for slide-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a report into a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The uploaded source document is not a PDF.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Requested detail level is outside 0..=4.
    #[error("Detail level {0} is out of range (expected 0-4)")]
    InvalidDetailLevel(u8),

    /// Theme type is neither `color` nor `background`.
    #[error("Unknown theme type: {0}")]
    InvalidThemeType(String),

    /// A slide record failed validation.
    #[error("Invalid slide {index}: {reason}")]
    InvalidSlide { index: usize, reason: String },

    /// The summarization service returned something we cannot use.
    #[error("Failed to parse model response: {0}")]
    ModelResponse(String),

    /// A stored image was requested but does not exist.
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Image bytes could not be decoded.
    #[error("Image error: {0}")]
    ImageError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by us
    /// or an upstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_)
                | Error::InvalidDetailLevel(_)
                | Error::InvalidThemeType(_)
                | Error::InvalidSlide { .. }
                | Error::ImageNotFound(_)
        )
    }
}
