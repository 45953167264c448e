//! Core domain types, theme registry, slide classification and content
//! normalization for turning a PDF report into a slide deck.

pub mod assets;
pub mod config;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod theme;
pub mod types;

pub use assets::ImageStore;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use layout::{FontSizer, LayoutKind};
pub use normalize::ContentNormalizer;
pub use theme::{RgbColor, Theme, ThemeSelection, ThemeType};
pub use types::{DetailLevel, PresentationRequest, Slide, SourceFormat};
