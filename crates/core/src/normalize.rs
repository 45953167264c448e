//! Normalization of summarization-service replies into slide records.
//!
//! The reply is free text that is supposed to contain a JSON array of slide
//! objects, often wrapped in a Markdown code fence. Anything that does not
//! match the slide schema exactly is rejected.

use crate::{DetailLevel, Error, Result, Slide};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex matching a Markdown fence opening or closing the whole reply.
static CODE_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z]*|```\s*$").unwrap());

/// Regex to collapse runs of spaces and tabs into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Remove the code fence wrapping a model reply. Fences inside the JSON are kept.
fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_REGEX.replace_all(text, "").trim().to_string()
}

/// NFC-normalize, collapse horizontal whitespace and trim.
fn clean_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed
        .lines()
        .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Turns a model reply into validated slides.
#[derive(Debug, Clone, Default)]
pub struct ContentNormalizer {
    /// Detail level stamped on slides that do not carry one.
    detail_level: Option<DetailLevel>,
}

impl ContentNormalizer {
    /// Create a normalizer that leaves detail levels untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the requested detail level on every slide without one.
    pub fn with_detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = Some(level);
        self
    }

    /// Parse a raw model reply into normalized slides.
    pub fn parse_reply(&self, reply: &str) -> Result<Vec<Slide>> {
        let json = strip_code_fences(reply);
        let value: Value = serde_json::from_str(&json)
            .map_err(|e| Error::ModelResponse(format!("invalid JSON: {}", e)))?;

        let Value::Array(items) = value else {
            return Err(Error::ModelResponse("response is not a list".to_string()));
        };

        let mut slides = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let slide: Slide = serde_json::from_value(item)
                .map_err(|e| Error::ModelResponse(format!("slide {}: {}", index, e)))?;
            slides.push(self.normalize_slide(index, slide)?);
        }

        log::debug!("Parsed {} slides from model reply", slides.len());
        Ok(slides)
    }

    /// Normalize the text of an already deserialized slide.
    ///
    /// Blank bullets are dropped, an empty bullet list or blank text block
    /// becomes absent, and a blank title is rejected.
    pub fn normalize_slide(&self, index: usize, slide: Slide) -> Result<Slide> {
        let title = clean_text(&slide.title);
        if title.is_empty() {
            return Err(Error::InvalidSlide {
                index,
                reason: "title is empty".to_string(),
            });
        }

        let bullets = slide
            .bullets
            .map(|bullets| {
                bullets
                    .iter()
                    .map(|b| clean_text(b))
                    .filter(|b| !b.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|bullets| !bullets.is_empty());

        let text_block = slide
            .text_block
            .map(|t| clean_text(&t))
            .filter(|t| !t.is_empty());

        let image_filename = slide
            .image_filename
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        if bullets.is_some() && text_block.is_some() {
            log::debug!("Slide {} has both bullets and a text block; bullets win", index);
        }

        Ok(Slide {
            title,
            bullets,
            text_block,
            image_filename,
            detail_level: slide.detail_level.or(self.detail_level),
        })
    }

    /// Normalize a list of slides that arrived through a trusted channel
    /// (e.g. an edited slide list sent back by a client).
    pub fn normalize_slides(&self, slides: Vec<Slide>) -> Result<Vec<Slide>> {
        slides
            .into_iter()
            .enumerate()
            .map(|(index, slide)| self.normalize_slide(index, slide))
            .collect()
    }
}
