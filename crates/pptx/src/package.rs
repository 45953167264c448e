//! OPC packaging: every part of the deck written into one ZIP container.

use deck_core::{Error, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::geometry::{SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::media::MediaCatalog;
use crate::slide::SlidePart;
use crate::template::{
    MasterStyle, SlideLayout, MASTER_PART, MASTER_RELS_PART, PRES_PROPS_PART, PRES_PROPS_XML,
    TABLE_STYLES_PART, TABLE_STYLES_XML, THEME_PART, THEME_XML,
};
use crate::xml::{rel_type, Relationships, XmlBuilder, NS_CONTENT_TYPES, PML_NAMESPACES};

pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub(crate) const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Content types of the parts this writer emits.
mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
}

/// Id of the only slide master.
const MASTER_ID: &str = "2147483648";
/// First slide id; PowerPoint requires ids of 256 and up.
const FIRST_SLIDE_ID: u32 = 256;
/// Notes page size (portrait letter).
const NOTES_WIDTH: &str = "6858000";
const NOTES_HEIGHT: &str = "9144000";

fn slide_part_name(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

fn slide_rels_part_name(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::ZipError(e.to_string())
}

/// Everything needed to write a deck.
pub(crate) struct Package<'a> {
    pub slides: &'a [SlidePart],
    pub media: &'a MediaCatalog,
    pub master: MasterStyle,
}

impl Package<'_> {
    /// Serialize the package to `.pptx` bytes.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = PartSink::new();

        zip.write("[Content_Types].xml", &self.content_types_xml()?)?;
        zip.write("_rels/.rels", &package_rels_xml()?)?;

        zip.write(PRESENTATION_PART, &self.presentation_xml()?)?;
        zip.write(PRESENTATION_RELS_PART, &self.presentation_rels_xml()?)?;

        for (i, slide) in self.slides.iter().enumerate() {
            zip.write(&slide_part_name(i + 1), &slide.to_xml()?)?;
            zip.write(&slide_rels_part_name(i + 1), &slide.rels_xml()?)?;
        }

        for layout in SlideLayout::ALL {
            zip.write(&layout.part_name(), &layout.to_xml()?)?;
            zip.write(&layout.rels_part_name(), &layout.rels_xml()?)?;
        }

        zip.write(MASTER_PART, &self.master.to_xml()?)?;
        zip.write(MASTER_RELS_PART, &self.master.rels_xml()?)?;
        zip.write(THEME_PART, THEME_XML.as_bytes())?;
        zip.write(PRES_PROPS_PART, PRES_PROPS_XML.as_bytes())?;
        zip.write(TABLE_STYLES_PART, TABLE_STYLES_XML.as_bytes())?;

        for part in self.media.parts() {
            zip.write(&part.part_name, &part.bytes)?;
        }

        let bytes = zip.finish()?;
        log::debug!(
            "Packaged {} slides and {} images ({} bytes)",
            self.slides.len(),
            self.media.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn content_types_xml(&self) -> Result<Vec<u8>> {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels", content_type::RELATIONSHIPS);
        defaults.insert("xml", content_type::XML);
        for part in self.media.parts() {
            defaults.insert(part.extension, part.content_type);
        }

        let mut overrides = vec![(format!("/{}", PRESENTATION_PART), content_type::PRESENTATION)];
        for number in 1..=self.slides.len() {
            overrides.push((format!("/{}", slide_part_name(number)), content_type::SLIDE));
        }
        for layout in SlideLayout::ALL {
            overrides.push((format!("/{}", layout.part_name()), content_type::SLIDE_LAYOUT));
        }
        overrides.push((format!("/{}", MASTER_PART), content_type::SLIDE_MASTER));
        overrides.push((format!("/{}", THEME_PART), content_type::THEME));
        overrides.push((format!("/{}", PRES_PROPS_PART), content_type::PRES_PROPS));
        overrides.push((format!("/{}", TABLE_STYLES_PART), content_type::TABLE_STYLES));

        let mut xml = XmlBuilder::new()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (extension, content_type) in &defaults {
            xml.empty(
                "Default",
                &[("Extension", *extension), ("ContentType", *content_type)],
            )?;
        }
        for (part_name, content_type) in &overrides {
            xml.empty(
                "Override",
                &[("PartName", part_name.as_str()), ("ContentType", *content_type)],
            )?;
        }
        xml.end("Types")?;
        Ok(xml.finish())
    }

    fn presentation_xml(&self) -> Result<Vec<u8>> {
        let cx = SLIDE_WIDTH.to_string();
        let cy = SLIDE_HEIGHT.to_string();

        let mut xml = XmlBuilder::new()?;
        let mut attrs = PML_NAMESPACES.to_vec();
        attrs.push(("saveSubsetFonts", "1"));
        xml.start("p:presentation", &attrs)?;

        xml.start("p:sldMasterIdLst", &[])?;
        xml.empty("p:sldMasterId", &[("id", MASTER_ID), ("r:id", "rId1")])?;
        xml.end("p:sldMasterIdLst")?;

        if !self.slides.is_empty() {
            xml.start("p:sldIdLst", &[])?;
            for i in 0..self.slides.len() {
                let id = (FIRST_SLIDE_ID + i as u32).to_string();
                // rId1 is the master, slides follow in order
                let rel_id = format!("rId{}", i + 2);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
            }
            xml.end("p:sldIdLst")?;
        }

        xml.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        xml.empty("p:notesSz", &[("cx", NOTES_WIDTH), ("cy", NOTES_HEIGHT)])?;
        xml.end("p:presentation")?;
        Ok(xml.finish())
    }

    fn presentation_rels_xml(&self) -> Result<Vec<u8>> {
        let mut rels = Relationships::new();
        rels.add(rel_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        for number in 1..=self.slides.len() {
            rels.add(rel_type::SLIDE, format!("slides/slide{}.xml", number));
        }
        rels.add(rel_type::PRES_PROPS, "presProps.xml");
        rels.add(rel_type::THEME, "theme/theme1.xml");
        rels.add(rel_type::TABLE_STYLES, "tableStyles.xml");
        rels.to_xml()
    }
}

fn package_rels_xml() -> Result<Vec<u8>> {
    let mut rels = Relationships::new();
    rels.add(rel_type::OFFICE_DOCUMENT, PRESENTATION_PART);
    rels.to_xml()
}

/// Deflated ZIP entries written to memory.
struct PartSink {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl PartSink {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options).map_err(zip_error)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish().map_err(zip_error)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TITLE;
    use crate::shapes::{Paragraph, TextRole};
    use crate::test_support::png;
    use deck_core::LayoutKind;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn two_slides() -> Vec<SlidePart> {
        ["One", "Two"]
            .iter()
            .map(|title| {
                let mut slide = SlidePart::new(LayoutKind::TitleOnly);
                slide.add_text(TextRole::Title, TITLE, vec![Paragraph::new(*title)]);
                slide
            })
            .collect()
    }

    #[test]
    fn test_package_contains_all_parts() {
        let slides = two_slides();
        let media = MediaCatalog::new();
        let bytes = Package {
            slides: &slides,
            media: &media,
            master: MasterStyle::default(),
        }
        .to_bytes()
        .unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/presProps.xml",
            "ppt/tableStyles.xml",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let slides = two_slides();
        let media = MediaCatalog::new();
        let bytes = Package {
            slides: &slides,
            media: &media,
            master: MasterStyle::default(),
        }
        .to_bytes()
        .unwrap();

        let pres = read_part(&bytes, PRESENTATION_PART);
        assert!(pres.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(pres.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(pres.contains(r#"<p:sldSz cx="14630400" cy="8229600"/>"#));

        let rels = read_part(&bytes, PRESENTATION_RELS_PART);
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml""#));
    }

    #[test]
    fn test_content_types_cover_media() {
        let slides = two_slides();
        let mut media = MediaCatalog::new();
        media.add("a.png", png(2, 2)).unwrap();
        let bytes = Package {
            slides: &slides,
            media: &media,
            master: MasterStyle::default(),
        }
        .to_bytes()
        .unwrap();

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!types.contains("/ppt/slides/slide3.xml"));

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(archive.by_name("ppt/media/image1.png").unwrap().size() > 0);
    }

    #[test]
    fn test_empty_deck_has_no_slide_list() {
        let media = MediaCatalog::new();
        let bytes = Package {
            slides: &[],
            media: &media,
            master: MasterStyle::default(),
        }
        .to_bytes()
        .unwrap();
        assert!(!read_part(&bytes, PRESENTATION_PART).contains("sldIdLst"));
    }
}
