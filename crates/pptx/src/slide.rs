//! A single slide part: background, shape tree and relationships.

use deck_core::{LayoutKind, Result, RgbColor};

use crate::geometry::Rect;
use crate::media::MediaCatalog;
use crate::shapes::{Paragraph, PictureShape, Shape, TextRole, TextShape};
use crate::template::SlideLayout;
use crate::xml::{rel_type, Relationships, XmlBuilder, PML_NAMESPACES};

/// A slide under construction.
///
/// Shapes are drawn in insertion order, back to front. The backdrop picture
/// lives outside that list and is always written first, so it stays behind
/// everything no matter when it is set.
#[derive(Debug, Clone)]
pub struct SlidePart {
    layout: SlideLayout,
    background: Option<RgbColor>,
    backdrop: Option<PictureShape>,
    shapes: Vec<Shape>,
    rels: Relationships,
    next_shape_id: u32,
}

impl SlidePart {
    /// Start a slide on the layout matching `kind`.
    pub fn new(kind: LayoutKind) -> Self {
        let layout = SlideLayout::for_kind(kind);
        let mut rels = Relationships::new();
        rels.add(rel_type::SLIDE_LAYOUT, layout.slide_target());
        Self {
            layout,
            background: None,
            backdrop: None,
            shapes: Vec::new(),
            rels,
            next_shape_id: 2,
        }
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    /// Add a text shape on top of existing shapes and return its id.
    pub fn add_text(&mut self, role: TextRole, rect: Rect, paragraphs: Vec<Paragraph>) -> u32 {
        let id = self.allocate_id();
        let shape = TextShape {
            id,
            role,
            rect,
            paragraphs,
            wrap: role == TextRole::TextBox,
            shrink_on_overflow: role != TextRole::Title,
        };
        self.shapes.push(Shape::Text(shape));
        id
    }

    /// Add a picture of an embedded image on top of existing shapes.
    pub fn add_picture(
        &mut self,
        media: &MediaCatalog,
        media_index: usize,
        rect: Rect,
        description: &str,
    ) -> Option<&PictureShape> {
        let picture = self.picture_for(media, media_index, rect, description)?;
        self.shapes.push(Shape::Picture(picture));
        match self.shapes.last() {
            Some(Shape::Picture(picture)) => Some(picture),
            _ => None,
        }
    }

    /// Set the full-bleed picture drawn behind all other shapes.
    pub fn set_backdrop(&mut self, media: &MediaCatalog, media_index: usize, description: &str) {
        self.backdrop = self.picture_for(media, media_index, Rect::full_slide(), description);
    }

    fn picture_for(
        &mut self,
        media: &MediaCatalog,
        media_index: usize,
        rect: Rect,
        description: &str,
    ) -> Option<PictureShape> {
        let part = media.get(media_index)?;
        let rel_id = self.rels.add(rel_type::IMAGE, part.slide_target());
        Some(PictureShape {
            id: self.allocate_id(),
            rect,
            rel_id,
            description: description.to_string(),
        })
    }

    /// Solid background fill for this slide.
    pub fn set_background(&mut self, color: RgbColor) {
        self.background = Some(color);
    }

    pub fn background(&self) -> Option<RgbColor> {
        self.background
    }

    pub fn backdrop(&self) -> Option<&PictureShape> {
        self.backdrop.as_ref()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Mutable access to every text shape.
    pub fn text_shapes_mut(&mut self) -> impl Iterator<Item = &mut TextShape> {
        self.shapes.iter_mut().filter_map(|s| match s {
            Shape::Text(t) => Some(t),
            Shape::Picture(_) => None,
        })
    }

    /// The title text, if a title shape was placed.
    pub fn title(&self) -> Option<&str> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Text(t) if t.role == TextRole::Title => {
                t.paragraphs.first().map(|p| p.text.as_str())
            }
            _ => None,
        })
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start("p:sld", &PML_NAMESPACES)?;
        xml.start("p:cSld", &[])?;

        if let Some(color) = self.background {
            xml.start("p:bg", &[])?;
            xml.start("p:bgPr", &[])?;
            xml.solid_fill(color)?;
            xml.empty("a:effectLst", &[])?;
            xml.end("p:bgPr")?;
            xml.end("p:bg")?;
        }

        xml.start("p:spTree", &[])?;
        xml.group_shape_header()?;
        if let Some(backdrop) = &self.backdrop {
            backdrop.write_xml(&mut xml)?;
        }
        for shape in &self.shapes {
            shape.write_xml(&mut xml)?;
        }
        xml.end("p:spTree")?;
        xml.end("p:cSld")?;

        xml.start("p:clrMapOvr", &[])?;
        xml.empty("a:masterClrMapping", &[])?;
        xml.end("p:clrMapOvr")?;
        xml.end("p:sld")?;
        Ok(xml.finish())
    }

    pub(crate) fn rels_xml(&self) -> Result<Vec<u8>> {
        self.rels.to_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BODY_FULL, TITLE};
    use crate::test_support::png;

    fn xml_string(slide: &SlidePart) -> String {
        String::from_utf8(slide.to_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_title_only_slide() {
        let mut slide = SlidePart::new(LayoutKind::TitleOnly);
        slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new("Hello")]);
        assert_eq!(slide.title(), Some("Hello"));
        assert_eq!(slide.layout(), SlideLayout::TitleOnly);

        let out = xml_string(&slide);
        assert!(out.contains("<p:sld "));
        assert!(out.contains("<a:t>Hello</a:t>"));
        assert!(!out.contains("<p:bg>"));

        let rels = String::from_utf8(slide.rels_xml().unwrap()).unwrap();
        assert!(rels.contains("../slideLayouts/slideLayout2.xml"));
    }

    #[test]
    fn test_background_precedes_shape_tree() {
        let mut slide = SlidePart::new(LayoutKind::Bulleted);
        slide.set_background(RgbColor::from_u32(0x2563eb));
        slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new("T")]);
        let out = xml_string(&slide);
        let bg = out.find("<p:bg>").unwrap();
        let tree = out.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(out.contains(r#"<a:srgbClr val="2563EB"/>"#));
    }

    #[test]
    fn test_backdrop_written_behind_earlier_shapes() {
        let mut media = MediaCatalog::new();
        let index = media.add("bg.png", png(16, 9)).unwrap();

        let mut slide = SlidePart::new(LayoutKind::Bulleted);
        slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new("T")]);
        slide.add_text(TextRole::Body, BODY_FULL, vec![Paragraph::new("B")]);
        // set last, drawn first
        slide.set_backdrop(&media, index, "bg.png");

        let out = xml_string(&slide);
        let pic = out.find("<p:pic>").unwrap();
        let first_sp = out.find("<p:sp>").unwrap();
        assert!(pic < first_sp);
        assert!(out.contains(r#"<a:ext cx="14630400" cy="8229600"/>"#));
    }

    #[test]
    fn test_picture_relationships() {
        let mut media = MediaCatalog::new();
        let index = media.add("chart.png", png(4, 2)).unwrap();

        let mut slide = SlidePart::new(LayoutKind::FreeText);
        let picture = slide
            .add_picture(&media, index, Rect::new(0, 0, 10, 5), "chart.png")
            .unwrap();
        assert_eq!(picture.rel_id, "rId2");

        assert!(slide.add_picture(&media, 99, Rect::new(0, 0, 1, 1), "x").is_none());

        let rels = String::from_utf8(slide.rels_xml().unwrap()).unwrap();
        assert!(rels.contains("../media/image1.png"));
    }

    #[test]
    fn test_shape_ids_are_unique() {
        let mut slide = SlidePart::new(LayoutKind::Bulleted);
        let a = slide.add_text(TextRole::Title, TITLE, vec![]);
        let b = slide.add_text(TextRole::Body, BODY_FULL, vec![]);
        assert_eq!(a, 2);
        assert_eq!(b, 3);
    }
}
