//! Slide classification and dynamic font sizing.

use crate::Slide;
use serde::{Deserialize, Serialize};

/// The structural template chosen for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Title plus a bulleted content placeholder.
    Bulleted,
    /// Title plus a manually placed text box.
    FreeText,
    /// Title and nothing else.
    TitleOnly,
}

impl LayoutKind {
    /// Classify a slide. Bullets take priority over a text block; an
    /// attached image never changes the outcome.
    pub fn classify(slide: &Slide) -> Self {
        if !slide.bullets().is_empty() {
            Self::Bulleted
        } else if slide.text_block().is_some() {
            Self::FreeText
        } else {
            Self::TitleOnly
        }
    }

    /// Number of characters of body text the slide will show under this
    /// layout. Drives [`FontSizer::size_for`].
    pub fn body_chars(self, slide: &Slide) -> usize {
        match self {
            Self::Bulleted => slide.bullets().iter().map(|b| b.chars().count()).sum(),
            Self::FreeText => slide.text_block().map_or(0, |t| t.chars().count()),
            Self::TitleOnly => 0,
        }
    }
}

/// Picks a body font size from the amount of text on a slide.
///
/// Text up to `min_chars` gets `max_pt`, text beyond `max_chars` gets
/// `min_pt`, and everything in between is interpolated linearly and
/// truncated to whole points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizer {
    min_pt: u32,
    max_pt: u32,
    min_chars: usize,
    max_chars: usize,
}

impl Default for FontSizer {
    fn default() -> Self {
        Self {
            min_pt: 14,
            max_pt: 28,
            min_chars: 100,
            max_chars: 500,
        }
    }
}

impl FontSizer {
    /// Create a sizer with the default 14-28pt range over 100-500 characters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font size range in points. Bounds are swapped if reversed.
    pub fn with_points(mut self, min_pt: u32, max_pt: u32) -> Self {
        self.min_pt = min_pt.min(max_pt);
        self.max_pt = min_pt.max(max_pt);
        self
    }

    /// Set the character thresholds. Bounds are swapped if reversed.
    pub fn with_char_range(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_chars = min_chars.min(max_chars);
        self.max_chars = min_chars.max(max_chars);
        self
    }

    /// Smallest size ever returned.
    pub fn min_pt(&self) -> u32 {
        self.min_pt
    }

    /// Largest size ever returned.
    pub fn max_pt(&self) -> u32 {
        self.max_pt
    }

    /// Font size in points for a body holding `total_chars` characters.
    pub fn size_for(&self, total_chars: usize) -> u32 {
        if total_chars <= self.min_chars {
            return self.max_pt;
        }
        if total_chars >= self.max_chars {
            return self.min_pt;
        }

        let span_chars = (self.max_chars - self.min_chars) as f64;
        let span_pt = (self.max_pt - self.min_pt) as f64;
        let progress = (total_chars - self.min_chars) as f64 / span_chars;
        let size = self.max_pt as f64 - span_pt * progress;

        (size.floor() as u32).clamp(self.min_pt, self.max_pt)
    }
}
