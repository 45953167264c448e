//! Shapes placed on a slide and their DrawingML serialization.

use deck_core::{Result, RgbColor};

use crate::geometry::Rect;
use crate::xml::XmlBuilder;

/// One paragraph of a text body. Every run in it shares one size and color;
/// line breaks in the text split it into runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// Font size in whole points; `None` inherits from the layout.
    pub size_pt: Option<u32>,
    /// Text color; `None` inherits from the layout.
    pub color: Option<RgbColor>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size_pt: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size_pt: u32) -> Self {
        self.size_pt = Some(size_pt);
        self
    }
}

/// What a text shape is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// The layout's title placeholder.
    Title,
    /// The layout's content placeholder (bulleted by the master).
    Body,
    /// The master's body placeholder that layouts inherit `bodyStyle` from.
    MasterBody,
    /// A free-standing text box.
    TextBox,
}

/// A shape holding text.
#[derive(Debug, Clone)]
pub struct TextShape {
    pub id: u32,
    pub role: TextRole,
    pub rect: Rect,
    pub paragraphs: Vec<Paragraph>,
    /// Wrap text at the shape edge.
    pub wrap: bool,
    /// Shrink text on overflow.
    pub shrink_on_overflow: bool,
}

impl TextShape {
    /// Apply a color to every paragraph.
    pub fn set_color(&mut self, color: RgbColor) {
        for p in &mut self.paragraphs {
            p.color = Some(color);
        }
    }

    fn name(&self) -> String {
        match self.role {
            TextRole::Title => format!("Title {}", self.id - 1),
            TextRole::Body => format!("Content Placeholder {}", self.id - 1),
            TextRole::MasterBody => format!("Text Placeholder {}", self.id - 1),
            TextRole::TextBox => format!("TextBox {}", self.id - 1),
        }
    }

    pub(crate) fn write_xml(&self, xml: &mut XmlBuilder) -> Result<()> {
        let id = self.id.to_string();
        let name = self.name();

        xml.start("p:sp", &[])?;
        xml.start("p:nvSpPr", &[])?;
        xml.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        match self.role {
            TextRole::TextBox => {
                xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
                xml.empty("p:nvPr", &[])?;
            }
            TextRole::Title | TextRole::Body | TextRole::MasterBody => {
                xml.start("p:cNvSpPr", &[])?;
                xml.empty("a:spLocks", &[("noGrp", "1")])?;
                xml.end("p:cNvSpPr")?;
                xml.start("p:nvPr", &[])?;
                match self.role {
                    TextRole::Title => xml.empty("p:ph", &[("type", "title")])?,
                    TextRole::MasterBody => xml.empty("p:ph", &[("type", "body"), ("idx", "1")])?,
                    _ => xml.empty("p:ph", &[("idx", "1")])?,
                };
                xml.end("p:nvPr")?;
            }
        }
        xml.end("p:nvSpPr")?;

        xml.start("p:spPr", &[])?;
        xml.xfrm(self.rect)?;
        if self.role == TextRole::TextBox {
            xml.rect_geometry()?;
            xml.empty("a:noFill", &[])?;
        }
        xml.end("p:spPr")?;

        xml.start("p:txBody", &[])?;
        let mut body_attrs = Vec::new();
        if self.wrap {
            body_attrs.push(("wrap", "square"));
            body_attrs.push(("rtlCol", "0"));
        }
        if self.shrink_on_overflow {
            xml.start("a:bodyPr", &body_attrs)?;
            xml.empty("a:normAutofit", &[])?;
            xml.end("a:bodyPr")?;
        } else {
            xml.empty("a:bodyPr", &body_attrs)?;
        }
        xml.empty("a:lstStyle", &[])?;
        for paragraph in &self.paragraphs {
            write_paragraph(xml, paragraph)?;
        }
        if self.paragraphs.is_empty() {
            xml.start("a:p", &[])?;
            xml.empty("a:endParaRPr", &[("lang", "en-US")])?;
            xml.end("a:p")?;
        }
        xml.end("p:txBody")?;
        xml.end("p:sp")?;
        Ok(())
    }
}

/// Line feed and vertical tab both become `<a:br/>` inside a paragraph.
const LINE_BREAKS: [char; 2] = ['\n', '\u{0b}'];

fn write_paragraph(xml: &mut XmlBuilder, paragraph: &Paragraph) -> Result<()> {
    // sz is in hundredths of a point
    let size = paragraph.size_pt.map(|pt| (pt * 100).to_string());
    let mut attrs = vec![("lang", "en-US")];
    if let Some(size) = size.as_deref() {
        attrs.push(("sz", size));
    }
    attrs.push(("dirty", "0"));

    xml.start("a:p", &[])?;
    for (i, line) in paragraph.text.split(LINE_BREAKS).enumerate() {
        if i > 0 {
            xml.start("a:br", &[])?;
            write_run_props(xml, &attrs, paragraph.color)?;
            xml.end("a:br")?;
        }
        if line.is_empty() && i > 0 {
            continue;
        }
        xml.start("a:r", &[])?;
        write_run_props(xml, &attrs, paragraph.color)?;
        xml.text_element("a:t", line)?;
        xml.end("a:r")?;
    }
    xml.end("a:p")?;
    Ok(())
}

fn write_run_props(xml: &mut XmlBuilder, attrs: &[(&str, &str)], color: Option<RgbColor>) -> Result<()> {
    match color {
        Some(color) => {
            xml.start("a:rPr", attrs)?;
            xml.solid_fill(color)?;
            xml.end("a:rPr")?;
        }
        None => {
            xml.empty("a:rPr", attrs)?;
        }
    }
    Ok(())
}

/// A picture referencing an image part through a slide relationship.
#[derive(Debug, Clone)]
pub struct PictureShape {
    pub id: u32,
    pub rect: Rect,
    /// Relationship id of the image part (`rIdN`).
    pub rel_id: String,
    /// Alternative text, usually the source file name.
    pub description: String,
}

impl PictureShape {
    pub(crate) fn write_xml(&self, xml: &mut XmlBuilder) -> Result<()> {
        let id = self.id.to_string();
        let name = format!("Picture {}", self.id - 1);

        xml.start("p:pic", &[])?;
        xml.start("p:nvPicPr", &[])?;
        xml.empty(
            "p:cNvPr",
            &[
                ("id", id.as_str()),
                ("name", name.as_str()),
                ("descr", self.description.as_str()),
            ],
        )?;
        xml.start("p:cNvPicPr", &[])?;
        xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
        xml.end("p:cNvPicPr")?;
        xml.empty("p:nvPr", &[])?;
        xml.end("p:nvPicPr")?;

        xml.start("p:blipFill", &[])?;
        xml.empty("a:blip", &[("r:embed", self.rel_id.as_str())])?;
        xml.start("a:stretch", &[])?;
        xml.empty("a:fillRect", &[])?;
        xml.end("a:stretch")?;
        xml.end("p:blipFill")?;

        xml.start("p:spPr", &[])?;
        xml.xfrm(self.rect)?;
        xml.rect_geometry()?;
        xml.end("p:spPr")?;
        xml.end("p:pic")?;
        Ok(())
    }
}

/// Any shape in a slide's shape tree.
#[derive(Debug, Clone)]
pub enum Shape {
    Text(TextShape),
    Picture(PictureShape),
}

impl Shape {
    pub(crate) fn write_xml(&self, xml: &mut XmlBuilder) -> Result<()> {
        match self {
            Shape::Text(shape) => shape.write_xml(xml),
            Shape::Picture(shape) => shape.write_xml(xml),
        }
    }
}
