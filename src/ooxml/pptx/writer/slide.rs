/// Slides of a presentation being written.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, PlaceholderRef, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::pptx::layout::{PlaceholderSpec, PlaceholderType, SlideLayout};
use std::fmt::Write as FmtWrite;

use super::textframe::TextFrame;

/// A placeholder shape on a slide, inheriting position and style from the
/// layout placeholder with the same `idx`.
#[derive(Debug, Clone)]
pub struct Placeholder {
    shape_id: u32,
    name: String,
    kind: PlaceholderType,
    idx: u32,
    text_frame: TextFrame,
}

impl Placeholder {
    fn from_spec(shape_id: u32, spec: &PlaceholderSpec) -> Self {
        Self {
            shape_id,
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            idx: spec.idx,
            text_frame: TextFrame::new(),
        }
    }

    pub fn kind(&self) -> &PlaceholderType {
        &self.kind
    }

    pub fn idx(&self) -> u32 {
        self.idx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text_frame(&self) -> &TextFrame {
        &self.text_frame
    }

    pub fn text_frame_mut(&mut self) -> &mut TextFrame {
        &mut self.text_frame
    }

    fn write_xml(&self, xml: &mut String) -> std::fmt::Result {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>"#,
            self.shape_id,
            escape_xml(&self.name)
        )?;
        write_ph(xml, &self.kind, self.idx)?;
        xml.push_str("</p:nvPr></p:nvSpPr><p:spPr/>");
        self.text_frame.write_xml(xml)?;
        xml.push_str("</p:sp>");
        Ok(())
    }
}

/// A slide in a presentation being written.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID in `sldIdLst` (unique, starting at 256)
    pub(crate) slide_id: u32,
    layout_index: usize,
    placeholders: Vec<Placeholder>,
    notes: String,
}

impl MutableSlide {
    /// Create a slide with one empty placeholder per layout placeholder.
    pub(crate) fn new(slide_id: u32, layout_index: usize, layout: &SlideLayout) -> Self {
        let placeholders = layout
            .placeholders()
            .iter()
            .zip(2u32..)
            .map(|(spec, shape_id)| Placeholder::from_spec(shape_id, spec))
            .collect();

        Self {
            slide_id,
            layout_index,
            placeholders,
            notes: String::new(),
        }
    }

    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Index of the layout this slide was created from.
    pub fn layout_index(&self) -> usize {
        self.layout_index
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder(&self, idx: u32) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.idx == idx)
    }

    /// Placeholder with the given `idx`.
    pub fn placeholder_mut(&mut self, idx: u32) -> Result<&mut Placeholder> {
        self.placeholders
            .iter_mut()
            .find(|ph| ph.idx == idx)
            .ok_or(OoxmlError::PlaceholderNotFound(PlaceholderRef::Idx(idx)))
    }

    /// The title placeholder (`title` or `ctrTitle`).
    pub fn title_mut(&mut self) -> Result<&mut Placeholder> {
        self.placeholders
            .iter_mut()
            .find(|ph| ph.kind.is_title())
            .ok_or(OoxmlError::PlaceholderNotFound(PlaceholderRef::Title))
    }

    /// Title text, `None` when the layout has no title placeholder.
    pub fn title(&self) -> Option<String> {
        self.placeholders
            .iter()
            .find(|ph| ph.kind.is_title())
            .map(|ph| ph.text_frame.text())
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title_mut()?.text_frame_mut().set_text(title);
        Ok(())
    }

    /// Set the speaker notes text.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Generate the slide part XML.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.placeholders.len() * 512);
        self.write_slide(&mut xml)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        Ok(xml)
    }

    fn write_slide(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )?;
        write_group_header(xml);
        for placeholder in &self.placeholders {
            placeholder.write_xml(xml)?;
        }
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
        Ok(())
    }

    /// Generate the notes slide part XML: a slide image placeholder and the
    /// notes body placeholder holding the notes text.
    pub(crate) fn generate_notes_xml(&self) -> Result<String> {
        let mut body = TextFrame::new();
        body.set_text(&self.notes);

        let mut xml = String::with_capacity(1024 + self.notes.len());
        self.write_notes(&mut xml, &body)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        Ok(xml)
    }

    fn write_notes(&self, xml: &mut String, body: &TextFrame) -> std::fmt::Result {
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(
            xml,
            r#"<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )?;
        write_group_header(xml);

        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr>"#);
        write_ph(xml, &PlaceholderType::SlideImage, 0)?;
        xml.push_str("</p:nvPr></p:nvSpPr><p:spPr/></p:sp>");

        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>"#);
        write_ph(xml, &PlaceholderType::Body, 1)?;
        xml.push_str("</p:nvPr></p:nvSpPr><p:spPr/>");
        body.write_xml(xml)?;
        xml.push_str("</p:sp>");

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
        Ok(())
    }
}

fn write_group_header(xml: &mut String) {
    xml.push_str(r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
}

/// Write `<p:ph>`; `obj` is the default type and 0 the default idx.
fn write_ph(xml: &mut String, kind: &PlaceholderType, idx: u32) -> std::fmt::Result {
    xml.push_str("<p:ph");
    if *kind != PlaceholderType::Object {
        write!(xml, r#" type="{}""#, escape_xml(kind.as_str()))?;
    }
    if idx != 0 {
        write!(xml, r#" idx="{}""#, idx)?;
    }
    xml.push_str("/>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::template;

    fn layout(index: usize) -> SlideLayout {
        SlideLayout::parse(template::slide_layouts()[index]).unwrap()
    }

    #[test]
    fn test_placeholders_follow_layout() {
        let slide = MutableSlide::new(256, 0, &layout(0));
        let kinds: Vec<&PlaceholderType> = slide.placeholders().iter().map(Placeholder::kind).collect();
        assert_eq!(kinds, [&PlaceholderType::CenterTitle, &PlaceholderType::SubTitle]);
        assert_eq!(slide.placeholder(1).unwrap().name(), "Subtitle 2");
        assert_eq!(slide.title().as_deref(), Some(""));
    }

    #[test]
    fn test_missing_placeholders() {
        let mut slide = MutableSlide::new(256, 2, &layout(2));
        assert!(matches!(
            slide.placeholder_mut(1),
            Err(OoxmlError::PlaceholderNotFound(PlaceholderRef::Idx(1)))
        ));

        let mut blank = MutableSlide::new(257, 3, &layout(3));
        assert!(matches!(
            blank.set_title("Nope"),
            Err(OoxmlError::PlaceholderNotFound(PlaceholderRef::Title))
        ));
        assert_eq!(blank.title(), None);
    }

    #[test]
    fn test_slide_xml() {
        let mut slide = MutableSlide::new(256, 1, &layout(1));
        slide.set_title("Architettura").unwrap();
        let body = slide.placeholder_mut(1).unwrap().text_frame_mut();
        body.clear();
        body.add_paragraph().set_text("Core").set_level(0).set_font_size(14.0);

        let xml = slide.to_xml().unwrap();
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:t>Architettura</a:t>"));
        assert!(xml.contains(r#"sz="1400""#));
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = MutableSlide::new(256, 1, &layout(1));
        assert_eq!(slide.notes(), "");
        let xml = slide.generate_notes_xml().unwrap();
        assert!(xml.contains(r#"<p:ph type="sldImg"/>"#));
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));

        slide.set_notes("Spiega il game loop");
        let xml = slide.generate_notes_xml().unwrap();
        assert!(xml.contains("<a:t>Spiega il game loop</a:t>"));
    }
}
