//! PPTX (Office Open XML) layout engine.
//!
//! Turns validated slide records and a theme selection into a `.pptx`
//! package: places title, body and image shapes, paints the theme and
//! writes the ZIP container. Also reads generated decks back for checks.

pub mod engine;
pub mod geometry;
pub mod inspect;
pub mod media;
pub mod painter;
pub mod report;
pub mod shapes;
pub mod slide;
pub mod template;

mod package;
mod xml;

pub use engine::{LayoutEngine, RenderedDeck};
pub use inspect::{inspect, DeckInspector, DeckSummary, ParagraphSummary, SlideSummary};
pub use report::{ImageOutcome, RenderReport, SlideReport, ThemeOutcome};

#[cfg(test)]
pub(crate) mod test_support {
    use image::{ImageFormat, RgbImage};
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::{Cursor, Read};

    /// A blank PNG of the given size.
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Read one part out of a rendered package.
    pub fn part(deck: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(deck)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    /// Fail on C0 control characters XML 1.0 forbids and on unbalanced tags.
    pub fn assert_well_formed(xml: &str) {
        if let Some(c) = xml
            .chars()
            .find(|&c| c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
        {
            panic!("illegal character U+{:04X} in {}", u32::from(c), xml);
        }
        let mut reader = Reader::from_str(xml);
        reader.check_end_names(true);
        let mut depth = 0usize;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }
}
