//! Small XML builder over `quick_xml::Writer`.
//!
//! Part generators only ever append to a fresh in-memory document, so the
//! builder maps writer errors straight into the crate error type.

use deck_core::{Error, Result, RgbColor};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

use crate::geometry::Rect;

pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PKG_RELS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const NS_CONTENT_TYPES: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// The three namespaces every PresentationML part root declares.
pub(crate) const PML_NAMESPACES: [(&str, &str); 3] =
    [("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)];

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

/// Characters allowed in XML 1.0 character data.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}')
        || c >= '\u{10000}'
}

/// Replace characters XML cannot carry with Office's `_xHHHH_` form.
pub(crate) fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_xml_char(c) {
            out.push(c);
        } else {
            out.push_str(&format!("_x{:04X}_", u32::from(c)));
        }
    }
    Cow::Owned(out)
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, escape_control_chars(value).as_ref()));
    }
    elem
}

/// An XML document being written.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a standalone UTF-8 document.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::with_capacity(4096));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    /// Open an element.
    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let elem = element(name, attrs);
        self.writer.write_event(Event::Start(elem)).map_err(xml_error)?;
        Ok(self)
    }

    /// Close an element.
    pub(crate) fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)?;
        Ok(self)
    }

    /// Write a self-closing element.
    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let elem = element(name, attrs);
        self.writer.write_event(Event::Empty(elem)).map_err(xml_error)?;
        Ok(self)
    }

    /// Write `<name>text</name>` with the text escaped.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name, &[])?;
        let text = escape_control_chars(text);
        self.writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(xml_error)?;
        self.end(name)
    }

    /// `<a:xfrm>` with offset and extent.
    pub(crate) fn xfrm(&mut self, rect: Rect) -> Result<&mut Self> {
        let (x, y) = (rect.x.to_string(), rect.y.to_string());
        let (cx, cy) = (rect.cx.to_string(), rect.cy.to_string());
        self.start("a:xfrm", &[])?;
        self.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
        self.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        self.end("a:xfrm")
    }

    /// `<a:solidFill><a:srgbClr val=".."/></a:solidFill>`.
    pub(crate) fn solid_fill(&mut self, color: RgbColor) -> Result<&mut Self> {
        let hex = color.hex();
        self.start("a:solidFill", &[])?;
        self.empty("a:srgbClr", &[("val", hex.as_str())])?;
        self.end("a:solidFill")
    }

    /// `<a:prstGeom prst="rect">`.
    pub(crate) fn rect_geometry(&mut self) -> Result<&mut Self> {
        self.start("a:prstGeom", &[("prst", "rect")])?;
        self.empty("a:avLst", &[])?;
        self.end("a:prstGeom")
    }

    /// The mandatory group-shape header that opens every `p:spTree`.
    pub(crate) fn group_shape_header(&mut self) -> Result<&mut Self> {
        self.start("p:nvGrpSpPr", &[])?;
        self.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
        self.empty("p:cNvGrpSpPr", &[])?;
        self.empty("p:nvPr", &[])?;
        self.end("p:nvGrpSpPr")?;
        self.start("p:grpSpPr", &[])?;
        self.start("a:xfrm", &[])?;
        self.empty("a:off", &[("x", "0"), ("y", "0")])?;
        self.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
        self.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
        self.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
        self.end("a:xfrm")?;
        self.end("p:grpSpPr")
    }

    /// Finish the document and return its bytes.
    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// A `_rels/*.rels` part.
#[derive(Debug, Default, Clone)]
pub(crate) struct Relationships {
    entries: Vec<(String, &'static str, String)>,
}

impl Relationships {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id (`rId1`, `rId2`, ...).
    pub(crate) fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
        for (id, rel_type, target) in &self.entries {
            xml.empty(
                "Relationship",
                &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml.finish())
    }
}

/// Relationship type URIs.
pub(crate) mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_str(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_text_is_escaped() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.text_element("a:t", "R&D <2024> \"quoted\"").unwrap();
        let out = as_str(xml.finish());
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(out.contains("<a:t>R&amp;D &lt;2024&gt;"));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.empty("p:cNvPr", &[("id", "2"), ("descr", "a \"b\" & c")]).unwrap();
        let out = as_str(xml.finish());
        assert!(out.contains("descr=\"a &quot;b&quot; &amp; c\""));
    }

    #[test]
    fn test_control_chars_are_encoded() {
        assert_eq!(escape_control_chars("plain\ttext\n"), "plain\ttext\n");
        assert_eq!(escape_control_chars("Page\u{0c}Break"), "Page_x000C_Break");
        assert_eq!(escape_control_chars("\u{0}\u{1f}\u{fffe}"), "_x0000__x001F__xFFFE_");

        let mut xml = XmlBuilder::new().unwrap();
        xml.empty("p:cNvPr", &[("descr", "scan\u{0b}.png")]).unwrap();
        xml.text_element("a:t", "bell\u{07}").unwrap();
        let out = as_str(xml.finish());
        assert!(out.contains(r#"descr="scan_x000B_.png""#));
        assert!(out.contains("<a:t>bell_x0007_</a:t>"));
    }

    #[test]
    fn test_solid_fill_uses_uppercase_hex() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.solid_fill(RgbColor::from_u32(0x2563eb)).unwrap();
        let out = as_str(xml.finish());
        assert!(out.contains("<a:solidFill><a:srgbClr val=\"2563EB\"/></a:solidFill>"));
    }

    #[test]
    fn test_relationship_ids_are_sequential() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"), "rId1");
        assert_eq!(rels.add(rel_type::IMAGE, "../media/image1.png"), "rId2");

        let out = as_str(rels.to_xml().unwrap());
        assert!(out.contains("Id=\"rId2\""));
        assert!(out.contains("Target=\"../media/image1.png\""));
    }
}
