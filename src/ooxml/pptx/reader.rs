//! Read a written presentation back into a logical summary.
//!
//! Only what the deck builder writes is recovered: per slide the layout, the
//! title, the paragraphs of the subtitle or body placeholder (`idx=1`) and the
//! speaker notes. Paragraphs without any text run, such as the single empty
//! paragraph of a cleared text frame, are not reported.

use crate::common::unit::centipoints_to_pt;
use crate::common::xml::resolve_reference;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, Part};
use crate::ooxml::pptx::layout::{PlaceholderType, SlideLayout, attr_value};
use crate::ooxml::pptx::writer::LINE_BREAK;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// One paragraph of a text frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphSummary {
    pub text: String,
    pub level: u8,
    /// Font size of the first run, when set explicitly
    pub font_size_pt: Option<f64>,
}

/// Logical content of one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSummary {
    pub layout_name: String,
    pub layout_type: String,
    pub title: Option<String>,
    /// Paragraphs of the `idx=1` placeholder (subtitle or body)
    pub body: Vec<ParagraphSummary>,
    pub notes: String,
}

impl SlideSummary {
    /// Body paragraph texts.
    pub fn body_texts(&self) -> Vec<&str> {
        self.body.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Logical content of a presentation, slides in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSummary {
    pub title: Option<String>,
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = OpcPackage::open(path)?;
        Self::from_package(&package)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let package = OpcPackage::from_bytes(data)?;
        Self::from_package(&package)
    }

    pub fn from_package(package: &OpcPackage) -> Result<Self> {
        let presentation = package.main_document_part()?;

        let mut slides = Vec::new();
        for r_id in slide_r_ids(xml_of(presentation)?)? {
            let slide = package.related_part(presentation, &r_id)?;
            slides.push(summarize_slide(package, slide)?);
        }

        let title = core_title(package)?;
        Ok(Self { title, slides })
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

fn xml_of(part: &dyn Part) -> Result<&str> {
    part.xml_str().ok_or_else(|| {
        OoxmlError::InvalidFormat(format!("{} is not an XML part", part.partname()))
    })
}

/// Relationship ids of `sldIdLst`, in presentation order.
fn slide_r_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut r_ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sldId" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    // `r:id`, as opposed to the unprefixed numeric `id`
                    if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                        r_ids.push(attr.unescape_value()?.into_owned());
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(r_ids)
}

fn summarize_slide(package: &OpcPackage, slide: &dyn Part) -> Result<SlideSummary> {
    let layout_part = package.part_related_by(slide, rt::SLIDE_LAYOUT)?;
    let layout = SlideLayout::parse(xml_of(layout_part)?)?;

    let shapes = read_shapes(xml_of(slide)?)?;
    let title = shapes
        .iter()
        .find(|s| s.kind.as_ref().is_some_and(PlaceholderType::is_title))
        .map(|s| join_texts(&s.paragraphs));
    let body = shapes
        .into_iter()
        .find(|s| s.idx == 1 && s.kind.as_ref().is_some_and(|k| !k.is_title()))
        .map(|s| s.paragraphs)
        .unwrap_or_default();

    let notes = match package.part_related_by(slide, rt::NOTES_SLIDE) {
        Ok(notes_part) => read_shapes(xml_of(notes_part)?)?
            .into_iter()
            .find(|s| s.kind == Some(PlaceholderType::Body))
            .map(|s| join_texts(&s.paragraphs))
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    Ok(SlideSummary {
        layout_name: layout.name().to_string(),
        layout_type: layout.layout_type().to_string(),
        title,
        body,
        notes,
    })
}

fn join_texts(paragraphs: &[ParagraphSummary]) -> String {
    paragraphs
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `dc:title` of the core properties, if present.
fn core_title(package: &OpcPackage) -> Result<Option<String>> {
    let Ok(rel) = package.rels().part_with_reltype(rt::CORE_PROPERTIES) else {
        return Ok(None);
    };
    let partname = package.rels().target_partname(rel)?;
    let mut reader = Reader::from_str(xml_of(package.get_part(&partname)?)?);

    let mut in_title = false;
    let mut title: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == b"title" => {
                in_title = true;
                title = Some(String::new());
            },
            Event::End(ref e) if e.local_name().as_ref() == b"title" => in_title = false,
            Event::Text(ref e) if in_title => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&e.decode()?);
                }
            },
            Event::GeneralRef(ref e) if in_title => {
                if let (Some(title), Some(resolved)) = (title.as_mut(), resolve_reference(&e.decode()?)) {
                    title.push_str(&resolved);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }
    Ok(title)
}

/// A shape with its placeholder and text paragraphs.
#[derive(Debug, Default)]
struct ShapeText {
    kind: Option<PlaceholderType>,
    idx: u32,
    paragraphs: Vec<ParagraphSummary>,
}

#[derive(Debug)]
struct OpenParagraph {
    summary: ParagraphSummary,
    has_run: bool,
}

/// Collect every `<p:sp>` of a slide or notes slide.
fn read_shapes(xml: &str) -> Result<Vec<ShapeText>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();

    let mut shape: Option<ShapeText> = None;
    let mut paragraph: Option<OpenParagraph> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"sp" => shape = Some(ShapeText::default()),
                b"p" if shape.is_some() => {
                    paragraph = Some(OpenParagraph {
                        summary: ParagraphSummary {
                            text: String::new(),
                            level: 0,
                            font_size_pt: None,
                        },
                        has_run: false,
                    });
                },
                b"pPr" => read_level(e, paragraph.as_mut())?,
                b"r" => {
                    in_run = true;
                    if let Some(p) = paragraph.as_mut() {
                        p.has_run = true;
                    }
                },
                b"rPr" if in_run => read_font_size(e, paragraph.as_mut())?,
                b"t" if in_run => in_text = true,
                b"ph" => read_placeholder(e, shape.as_mut())?,
                _ => {},
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"ph" => read_placeholder(e, shape.as_mut())?,
                b"pPr" => read_level(e, paragraph.as_mut())?,
                b"rPr" if in_run => read_font_size(e, paragraph.as_mut())?,
                b"br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.summary.text.push(LINE_BREAK);
                    }
                },
                _ => {},
            },
            Event::Text(ref e) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    p.summary.text.push_str(&e.decode()?);
                }
            },
            Event::GeneralRef(ref e) if in_text => {
                let name = e.decode()?;
                let resolved = resolve_reference(&name).ok_or_else(|| {
                    OoxmlError::Xml(format!("unknown entity reference '&{};'", name))
                })?;
                if let Some(p) = paragraph.as_mut() {
                    p.summary.text.push_str(&resolved);
                }
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => in_run = false,
                b"p" => {
                    if let (Some(p), Some(s)) = (paragraph.take(), shape.as_mut())
                        && p.has_run
                    {
                        s.paragraphs.push(p.summary);
                    }
                },
                b"sp" => {
                    if let Some(s) = shape.take() {
                        shapes.push(s);
                    }
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(shapes)
}

fn read_placeholder(e: &quick_xml::events::BytesStart<'_>, shape: Option<&mut ShapeText>) -> Result<()> {
    let Some(shape) = shape else {
        return Ok(());
    };
    shape.kind = Some(
        attr_value(e, b"type")?.map_or(PlaceholderType::Object, |t| PlaceholderType::parse(&t)),
    );
    if let Some(idx) = attr_value(e, b"idx")? {
        shape.idx = idx
            .parse()
            .map_err(|_| OoxmlError::InvalidFormat(format!("placeholder idx '{}'", idx)))?;
    }
    Ok(())
}

fn read_level(e: &quick_xml::events::BytesStart<'_>, paragraph: Option<&mut OpenParagraph>) -> Result<()> {
    if let (Some(p), Some(lvl)) = (paragraph, attr_value(e, b"lvl")?) {
        p.summary.level = lvl
            .parse()
            .map_err(|_| OoxmlError::InvalidFormat(format!("paragraph level '{}'", lvl)))?;
    }
    Ok(())
}

/// Keep the size of the first run that sets one.
fn read_font_size(e: &quick_xml::events::BytesStart<'_>, paragraph: Option<&mut OpenParagraph>) -> Result<()> {
    let Some(p) = paragraph else {
        return Ok(());
    };
    if p.summary.font_size_pt.is_some() {
        return Ok(());
    }
    if let Some(sz) = attr_value(e, b"sz")? {
        let centipoints = sz
            .parse()
            .map_err(|_| OoxmlError::InvalidFormat(format!("font size '{}'", sz)))?;
        p.summary.font_size_pt = Some(centipoints_to_pt(centipoints));
    }
    Ok(())
}
