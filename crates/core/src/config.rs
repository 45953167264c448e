//! Rendering configuration.

use crate::{FontSizer, ImageStore};
use std::path::{Path, PathBuf};

/// Default directory holding images extracted from uploaded PDFs.
pub const DEFAULT_IMAGES_DIR: &str = "extracted_images";

/// Default directory holding theme background pictures.
pub const DEFAULT_BACKGROUNDS_DIR: &str = "backgrounds";

/// Where the layout engine finds its files and how it sizes body text.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    images_dir: PathBuf,
    backgrounds_dir: PathBuf,
    font_sizer: FontSizer,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            backgrounds_dir: PathBuf::from(DEFAULT_BACKGROUNDS_DIR),
            font_sizer: FontSizer::default(),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with the default directories and font range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extracted-images directory.
    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }

    /// Set the backgrounds directory.
    pub fn with_backgrounds_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backgrounds_dir = dir.into();
        self
    }

    /// Set the body font sizer.
    pub fn with_font_sizer(mut self, sizer: FontSizer) -> Self {
        self.font_sizer = sizer;
        self
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn backgrounds_dir(&self) -> &Path {
        &self.backgrounds_dir
    }

    pub fn font_sizer(&self) -> &FontSizer {
        &self.font_sizer
    }

    /// Store over the extracted-images directory.
    pub fn image_store(&self) -> ImageStore {
        ImageStore::new(&self.images_dir)
    }

    /// Store over the backgrounds directory.
    pub fn background_store(&self) -> ImageStore {
        ImageStore::new(&self.backgrounds_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::new();
        assert_eq!(config.images_dir(), Path::new("extracted_images"));
        assert_eq!(config.backgrounds_dir(), Path::new("backgrounds"));
        assert_eq!(config.font_sizer().size_for(0), 28);
    }

    #[test]
    fn test_builders() {
        let config = RenderConfig::new()
            .with_images_dir("/tmp/img")
            .with_backgrounds_dir("/tmp/bg")
            .with_font_sizer(FontSizer::new().with_points(10, 20));
        assert_eq!(config.image_store().dir(), Path::new("/tmp/img"));
        assert_eq!(config.background_store().dir(), Path::new("/tmp/bg"));
        assert_eq!(config.font_sizer().max_pt(), 20);
    }
}
