//! Image parts embedded in the package.

use deck_core::{Error, Result};
use image::ImageFormat;
use std::collections::HashMap;
use std::io::Cursor;

/// An image stored once in `ppt/media/` and shared by every slide using it.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// Package path, e.g. `ppt/media/image1.png`.
    pub part_name: String,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: Vec<u8>,
}

impl MediaPart {
    /// Target of a relationship from a slide part.
    pub fn slide_target(&self) -> String {
        format!("../{}", self.part_name.trim_start_matches("ppt/"))
    }
}

/// Collects image parts for one presentation, deduplicated by source key.
#[derive(Debug, Default)]
pub struct MediaCatalog {
    parts: Vec<MediaPart>,
    by_key: HashMap<String, usize>,
}

impl MediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a previously added image.
    pub fn lookup(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Add an image under `key`, probing its format and pixel size. Adding
    /// the same key twice returns the first index.
    pub fn add(&mut self, key: &str, bytes: Vec<u8>) -> Result<usize> {
        if let Some(index) = self.lookup(key) {
            return Ok(index);
        }

        let format = image::guess_format(&bytes)
            .map_err(|e| Error::ImageError(format!("{}: {}", key, e)))?;
        let (extension, content_type) = part_type(format)
            .ok_or_else(|| Error::ImageError(format!("{}: unsupported format {:?}", key, format)))?;
        let (width_px, height_px) = image::ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| Error::ImageError(format!("{}: {}", key, e)))?;

        let index = self.parts.len();
        self.parts.push(MediaPart {
            part_name: format!("ppt/media/image{}.{}", index + 1, extension),
            content_type,
            extension,
            width_px,
            height_px,
            bytes,
        });
        self.by_key.insert(key.to_string(), index);
        log::debug!("Embedded {} as image{} ({}x{})", key, index + 1, width_px, height_px);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&MediaPart> {
        self.parts.get(index)
    }

    pub fn parts(&self) -> &[MediaPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Part extension and content type for formats PowerPoint can display.
fn part_type(format: ImageFormat) -> Option<(&'static str, &'static str)> {
    match format {
        ImageFormat::Png => Some(("png", "image/png")),
        ImageFormat::Jpeg => Some(("jpeg", "image/jpeg")),
        ImageFormat::Gif => Some(("gif", "image/gif")),
        ImageFormat::Bmp => Some(("bmp", "image/bmp")),
        ImageFormat::Tiff => Some(("tiff", "image/tiff")),
        _ => None,
    }
}
