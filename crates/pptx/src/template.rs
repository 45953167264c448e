//! Slide master, slide layouts and theme shared by every slide.
//!
//! The deck uses one master with two layouts. Slides pick a layout by
//! [`LayoutKind`]; theming at the master level is described by a
//! [`MasterStyle`].

use deck_core::{LayoutKind, Result, RgbColor};

use crate::geometry::{BODY_FULL, TITLE};
use crate::shapes::{TextRole, TextShape};
use crate::xml::{rel_type, Relationships, XmlBuilder, PML_NAMESPACES};

pub(crate) const MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
pub(crate) const MASTER_RELS_PART: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub(crate) const THEME_PART: &str = "ppt/theme/theme1.xml";
pub(crate) const PRES_PROPS_PART: &str = "ppt/presProps.xml";
pub(crate) const TABLE_STYLES_PART: &str = "ppt/tableStyles.xml";

pub(crate) const THEME_XML: &str = include_str!("../resources/theme1.xml");
pub(crate) const PRES_PROPS_XML: &str = include_str!("../resources/presProps.xml");
pub(crate) const TABLE_STYLES_XML: &str = include_str!("../resources/tableStyles.xml");

/// First id in the master's layout id list.
const LAYOUT_ID_BASE: u32 = 2_147_483_649;

/// A slide layout of the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideLayout {
    /// Title placeholder plus a content placeholder.
    TitleAndContent,
    /// Title placeholder only.
    TitleOnly,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; 2] = [SlideLayout::TitleAndContent, SlideLayout::TitleOnly];

    /// Layout used for a slide of the given kind. Free text goes in a text
    /// box on the title-only layout.
    pub fn for_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Bulleted => Self::TitleAndContent,
            LayoutKind::FreeText | LayoutKind::TitleOnly => Self::TitleOnly,
        }
    }

    /// 1-based number of the layout part.
    pub fn number(self) -> usize {
        match self {
            Self::TitleAndContent => 1,
            Self::TitleOnly => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TitleAndContent => "Title and Content",
            Self::TitleOnly => "Title Only",
        }
    }

    fn layout_type(self) -> &'static str {
        match self {
            Self::TitleAndContent => "obj",
            Self::TitleOnly => "titleOnly",
        }
    }

    pub fn part_name(self) -> String {
        format!("ppt/slideLayouts/slideLayout{}.xml", self.number())
    }

    pub fn rels_part_name(self) -> String {
        format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", self.number())
    }

    /// Relationship target from a slide part.
    pub fn slide_target(self) -> String {
        format!("../slideLayouts/slideLayout{}.xml", self.number())
    }

    pub(crate) fn to_xml(self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        let mut attrs = PML_NAMESPACES.to_vec();
        attrs.push(("type", self.layout_type()));
        attrs.push(("preserve", "1"));
        xml.start("p:sldLayout", &attrs)?;
        xml.start("p:cSld", &[("name", self.name())])?;
        xml.start("p:spTree", &[])?;
        xml.group_shape_header()?;
        let body = (self == Self::TitleAndContent).then_some(TextRole::Body);
        write_placeholders(&mut xml, body)?;
        xml.end("p:spTree")?;
        xml.end("p:cSld")?;
        xml.start("p:clrMapOvr", &[])?;
        xml.empty("a:masterClrMapping", &[])?;
        xml.end("p:clrMapOvr")?;
        xml.end("p:sldLayout")?;
        Ok(xml.finish())
    }

    pub(crate) fn rels_xml(self) -> Result<Vec<u8>> {
        let mut rels = Relationships::new();
        rels.add(rel_type::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        rels.to_xml()
    }
}

/// Empty title (and optionally body) placeholders at their default regions.
fn write_placeholders(xml: &mut XmlBuilder, body: Option<TextRole>) -> Result<()> {
    let title = TextShape {
        id: 2,
        role: TextRole::Title,
        rect: TITLE,
        paragraphs: Vec::new(),
        wrap: false,
        shrink_on_overflow: false,
    };
    title.write_xml(xml)?;
    if let Some(role) = body {
        let body = TextShape {
            id: 3,
            role,
            rect: BODY_FULL,
            paragraphs: Vec::new(),
            wrap: false,
            shrink_on_overflow: true,
        };
        body.write_xml(xml)?;
    }
    Ok(())
}

/// Deck-wide defaults written into the slide master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MasterStyle {
    pub background: Option<RgbColor>,
    pub title_color: Option<RgbColor>,
    pub body_color: Option<RgbColor>,
}

impl MasterStyle {
    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start("p:sldMaster", &PML_NAMESPACES)?;
        xml.start("p:cSld", &[])?;

        xml.start("p:bg", &[])?;
        match self.background {
            Some(color) => {
                xml.start("p:bgPr", &[])?;
                xml.solid_fill(color)?;
                xml.empty("a:effectLst", &[])?;
                xml.end("p:bgPr")?;
            }
            None => {
                xml.start("p:bgRef", &[("idx", "1001")])?;
                xml.empty("a:schemeClr", &[("val", "bg1")])?;
                xml.end("p:bgRef")?;
            }
        }
        xml.end("p:bg")?;

        xml.start("p:spTree", &[])?;
        xml.group_shape_header()?;
        write_placeholders(&mut xml, Some(TextRole::MasterBody))?;
        xml.end("p:spTree")?;
        xml.end("p:cSld")?;

        xml.empty(
            "p:clrMap",
            &[
                ("bg1", "lt1"),
                ("tx1", "dk1"),
                ("bg2", "lt2"),
                ("tx2", "dk2"),
                ("accent1", "accent1"),
                ("accent2", "accent2"),
                ("accent3", "accent3"),
                ("accent4", "accent4"),
                ("accent5", "accent5"),
                ("accent6", "accent6"),
                ("hlink", "hlink"),
                ("folHlink", "folHlink"),
            ],
        )?;

        xml.start("p:sldLayoutIdLst", &[])?;
        for (i, _) in SlideLayout::ALL.iter().enumerate() {
            let id = (LAYOUT_ID_BASE + i as u32).to_string();
            let rel_id = format!("rId{}", i + 1);
            xml.empty("p:sldLayoutId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
        }
        xml.end("p:sldLayoutIdLst")?;

        xml.start("p:txStyles", &[])?;
        xml.start("p:titleStyle", &[])?;
        xml.start("a:lvl1pPr", &[("algn", "l")])?;
        default_run(&mut xml, "4000", self.title_color)?;
        xml.end("a:lvl1pPr")?;
        xml.end("p:titleStyle")?;

        xml.start("p:bodyStyle", &[])?;
        xml.start("a:lvl1pPr", &[("marL", "228600"), ("indent", "-228600")])?;
        xml.empty("a:buFont", &[("typeface", "Arial")])?;
        xml.empty("a:buChar", &[("char", "\u{2022}")])?;
        default_run(&mut xml, "2800", self.body_color)?;
        xml.end("a:lvl1pPr")?;
        xml.end("p:bodyStyle")?;

        xml.start("p:otherStyle", &[])?;
        xml.start("a:defPPr", &[])?;
        xml.empty("a:defRPr", &[("lang", "en-US")])?;
        xml.end("a:defPPr")?;
        xml.end("p:otherStyle")?;
        xml.end("p:txStyles")?;

        xml.end("p:sldMaster")?;
        Ok(xml.finish())
    }

    pub(crate) fn rels_xml(&self) -> Result<Vec<u8>> {
        let mut rels = Relationships::new();
        for layout in SlideLayout::ALL {
            rels.add(rel_type::SLIDE_LAYOUT, layout.slide_target());
        }
        rels.add(rel_type::THEME, "../theme/theme1.xml");
        rels.to_xml()
    }
}

/// `<a:defRPr>` with a size and either an explicit or the scheme text color.
fn default_run(xml: &mut XmlBuilder, size: &str, color: Option<RgbColor>) -> Result<()> {
    xml.start("a:defRPr", &[("sz", size)])?;
    match color {
        Some(color) => {
            xml.solid_fill(color)?;
        }
        None => {
            xml.start("a:solidFill", &[])?;
            xml.empty("a:schemeClr", &[("val", "tx1")])?;
            xml.end("a:solidFill")?;
        }
    }
    xml.end("a:defRPr")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_str(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_layout_for_kind() {
        assert_eq!(SlideLayout::for_kind(LayoutKind::Bulleted), SlideLayout::TitleAndContent);
        assert_eq!(SlideLayout::for_kind(LayoutKind::FreeText), SlideLayout::TitleOnly);
        assert_eq!(SlideLayout::for_kind(LayoutKind::TitleOnly), SlideLayout::TitleOnly);
        assert_eq!(
            SlideLayout::TitleOnly.slide_target(),
            "../slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_title_only_layout_has_no_body() {
        let out = as_str(SlideLayout::TitleOnly.to_xml().unwrap());
        assert!(out.contains(r#"type="titleOnly""#));
        assert!(out.contains(r#"<p:ph type="title"/>"#));
        assert!(!out.contains(r#"<p:ph idx="1"/>"#));

        let out = as_str(SlideLayout::TitleAndContent.to_xml().unwrap());
        assert!(out.contains(r#"<p:ph idx="1"/>"#));
        assert!(!out.contains(r#"type="body""#));
    }

    #[test]
    fn test_default_master_uses_scheme_colors() {
        let out = as_str(MasterStyle::default().to_xml().unwrap());
        assert!(out.contains(r#"<p:bgRef idx="1001">"#));
        assert!(out.contains(r#"<a:schemeClr val="tx1"/>"#));
        assert!(!out.contains("srgbClr"));
        assert_eq!(out.matches("<p:sldLayoutId ").count(), 2);
        assert!(out.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(out.contains(r#"name="Text Placeholder 2""#));
    }

    #[test]
    fn test_themed_master() {
        let style = MasterStyle {
            background: Some(RgbColor::from_u32(0x2563eb)),
            title_color: Some(RgbColor::from_u32(0xdbeafe)),
            body_color: Some(RgbColor::from_u32(0x1e40af)),
        };
        let out = as_str(style.to_xml().unwrap());
        let bg = out.find(r#"val="2563EB""#).unwrap();
        let title = out.find(r#"val="DBEAFE""#).unwrap();
        let body = out.find(r#"val="1E40AF""#).unwrap();
        assert!(bg < title && title < body);
        assert!(out.contains("<p:titleStyle>"));
    }

    #[test]
    fn test_master_relationships() {
        let out = as_str(MasterStyle::default().rels_xml().unwrap());
        assert!(out.contains("../slideLayouts/slideLayout1.xml"));
        assert!(out.contains("../slideLayouts/slideLayout2.xml"));
        assert!(out.contains(r#"Id="rId3""#));
        assert!(out.contains("../theme/theme1.xml"));
    }

    #[test]
    fn test_static_parts_are_xml() {
        for part in [THEME_XML, PRES_PROPS_XML, TABLE_STYLES_XML] {
            assert!(part.starts_with("<?xml"));
        }
        assert!(THEME_XML.contains("<a:clrScheme"));
    }
}
