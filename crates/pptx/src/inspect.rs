//! Reads a generated deck back into a summary of what each slide shows.

use deck_core::{Error, Result, RgbColor};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::geometry::Rect;
use crate::package::{PRESENTATION_PART, PRESENTATION_RELS_PART};

/// One paragraph of body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphSummary {
    /// Run text, with `<a:br/>` read back as `\n`.
    pub text: String,
    pub size_pt: Option<u32>,
    pub color: Option<RgbColor>,
}

/// What one slide contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideSummary {
    /// 1-based position in the presentation.
    pub number: usize,
    /// Target of the slide's layout relationship.
    pub layout: Option<String>,
    pub title: Option<String>,
    pub title_color: Option<RgbColor>,
    /// Paragraphs of the body placeholder or text box.
    pub paragraphs: Vec<ParagraphSummary>,
    /// Position of the body placeholder or text box.
    pub body: Option<Rect>,
    /// Pictures other than a full-slide backdrop.
    pub pictures: Vec<Rect>,
    /// A full-slide picture is present and precedes every text shape.
    pub backdrop_first: bool,
    /// Solid background fill.
    pub background: Option<RgbColor>,
}

/// Summary of a whole deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub slide_width: i64,
    pub slide_height: i64,
    pub slides: Vec<SlideSummary>,
    /// Number of embedded image parts.
    pub media_count: usize,
}

/// Inspect `.pptx` bytes.
pub fn inspect(bytes: &[u8]) -> Result<DeckSummary> {
    DeckInspector::new().inspect(Cursor::new(bytes))
}

/// Reader for `.pptx` packages.
pub struct DeckInspector;

impl DeckInspector {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a package read from `reader`.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation = read_file_from_archive(&mut archive, PRESENTATION_PART)?;
        let (slide_width, slide_height, slide_rel_ids) = parse_presentation(&presentation)?;
        let targets = parse_relationships(&read_file_from_archive(
            &mut archive,
            PRESENTATION_RELS_PART,
        )?)?;

        let mut slides = Vec::with_capacity(slide_rel_ids.len());
        for (i, rel_id) in slide_rel_ids.iter().enumerate() {
            let target = targets.get(rel_id).ok_or_else(|| {
                Error::XmlError(format!("slide relationship {} has no target", rel_id))
            })?;
            let path = resolve_target("ppt", target);
            let content = read_file_from_archive(&mut archive, &path)?;
            let mut slide = parse_slide(&content)?;
            slide.number = i + 1;

            let rels_path = rels_path_for(&path);
            if archive.by_name(&rels_path).is_ok() {
                let rels = parse_relationships(&read_file_from_archive(&mut archive, &rels_path)?)?;
                slide.layout = rels
                    .into_values()
                    .find(|target| target.contains("slideLayouts/"));
            }
            slides.push(slide);
        }

        let media_count = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/media/"))
            .count();

        log::debug!("Inspected {} slides, {} media parts", slides.len(), media_count);
        Ok(DeckSummary {
            slide_width,
            slide_height,
            slides,
            media_count,
        })
    }
}

impl Default for DeckInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Slide size and the relationship ids of `p:sldIdLst`, in order.
fn parse_presentation(xml: &str) -> Result<(i64, i64, Vec<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let (mut cx, mut cy) = (0, 0);
    let mut rel_ids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sldId" => {
                        if let Some(id) = attr(e, b"r:id") {
                            rel_ids.push(id);
                        }
                    }
                    b"sldSz" => {
                        cx = attr(e, b"cx").and_then(|v| v.parse().ok()).unwrap_or(0);
                        cy = attr(e, b"cy").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }
    Ok((cx, cy, rel_ids))
}

/// Map of relationship id to target.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut targets = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }
    Ok(targets)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Title,
    Body,
    TextBox,
    Other,
    Picture,
}

#[derive(Debug)]
struct ShapeScan {
    kind: ShapeKind,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
    paragraphs: Vec<ParagraphSummary>,
}

impl ShapeScan {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            offset: None,
            extent: None,
            paragraphs: Vec::new(),
        }
    }

    fn rect(&self) -> Option<Rect> {
        match (self.offset, self.extent) {
            (Some((x, y)), Some((cx, cy))) => Some(Rect::new(x, y, cx, cy)),
            _ => None,
        }
    }
}

/// Walk a slide's XML and collect its shapes in document order.
fn parse_slide(xml: &str) -> Result<SlideSummary> {
    let mut reader = Reader::from_str(xml);

    let mut shapes: Vec<ShapeScan> = Vec::new();
    let mut current: Option<ShapeScan> = None;
    let mut background = None;
    let mut in_background = false;
    let mut in_run_props = false;
    let mut in_text = false;
    let mut paragraph: Option<ParagraphSummary> = None;
    let mut has_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"bg" => in_background = true,
                    b"sp" => current = Some(ShapeScan::new(ShapeKind::Other)),
                    b"pic" => current = Some(ShapeScan::new(ShapeKind::Picture)),
                    b"p" if current.is_some() => {
                        paragraph = Some(ParagraphSummary {
                            text: String::new(),
                            size_pt: None,
                            color: None,
                        });
                        has_run = false;
                    }
                    b"r" => has_run = true,
                    b"br" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.text.push('\n');
                        }
                    }
                    b"rPr" => {
                        in_run_props = true;
                        read_run_size(e, paragraph.as_mut());
                    }
                    b"t" => in_text = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"ph" => {
                        if let Some(shape) = current.as_mut() {
                            shape.kind = if attr(e, b"type").as_deref() == Some("title") {
                                ShapeKind::Title
                            } else {
                                ShapeKind::Body
                            };
                        }
                    }
                    b"cNvSpPr" => {
                        if let Some(shape) = current.as_mut() {
                            if attr(e, b"txBox").as_deref() == Some("1") {
                                shape.kind = ShapeKind::TextBox;
                            }
                        }
                    }
                    b"off" => {
                        if let Some(shape) = current.as_mut() {
                            shape.offset = Some((int_attr(e, b"x"), int_attr(e, b"y")));
                        }
                    }
                    b"ext" => {
                        if let Some(shape) = current.as_mut() {
                            shape.extent = Some((int_attr(e, b"cx"), int_attr(e, b"cy")));
                        }
                    }
                    b"rPr" => read_run_size(e, paragraph.as_mut()),
                    b"srgbClr" => {
                        let color = attr(e, b"val").and_then(|v| RgbColor::from_hex(&v));
                        if in_background {
                            background = color;
                        } else if in_run_props {
                            if let Some(p) = paragraph.as_mut() {
                                p.color = color;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(p) = paragraph.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        p.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"bg" => in_background = false,
                    b"rPr" => in_run_props = false,
                    b"t" => in_text = false,
                    b"p" => {
                        if let (Some(p), Some(shape)) = (paragraph.take(), current.as_mut()) {
                            if has_run {
                                shape.paragraphs.push(p);
                            }
                        }
                    }
                    b"sp" | b"pic" => {
                        if let Some(shape) = current.take() {
                            shapes.push(shape);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(summarize(shapes, background))
}

fn summarize(shapes: Vec<ShapeScan>, background: Option<RgbColor>) -> SlideSummary {
    let mut summary = SlideSummary {
        background,
        ..Default::default()
    };

    let is_backdrop =
        |s: &ShapeScan| s.kind == ShapeKind::Picture && s.rect().is_some_and(|r| r.is_full_slide());
    let first_text = shapes
        .iter()
        .position(|s| !matches!(s.kind, ShapeKind::Picture));
    let first_backdrop = shapes.iter().position(is_backdrop);
    summary.backdrop_first = match (first_backdrop, first_text) {
        (Some(b), Some(t)) => b < t,
        (Some(_), None) => true,
        (None, _) => false,
    };

    for shape in shapes {
        match shape.kind {
            ShapeKind::Title if summary.title.is_none() => {
                let text: Vec<&str> = shape.paragraphs.iter().map(|p| p.text.as_str()).collect();
                summary.title = Some(text.join("\n"));
                summary.title_color = shape.paragraphs.first().and_then(|p| p.color);
            }
            ShapeKind::Body | ShapeKind::TextBox if summary.body.is_none() => {
                summary.body = shape.rect();
                summary.paragraphs = shape.paragraphs;
            }
            ShapeKind::Picture if !is_backdrop(&shape) => {
                if let Some(rect) = shape.rect() {
                    summary.pictures.push(rect);
                }
            }
            _ => {}
        }
    }
    summary
}

fn read_run_size(e: &BytesStart, paragraph: Option<&mut ParagraphSummary>) {
    if let Some(p) = paragraph {
        if let Some(sz) = attr(e, b"sz").and_then(|v| v.parse::<u32>().ok()) {
            p.size_pt = Some(sz / 100);
        }
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn int_attr(e: &BytesStart, key: &[u8]) -> i64 {
    attr(e, key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
