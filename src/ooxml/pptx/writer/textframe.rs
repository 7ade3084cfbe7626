//! Text frames and paragraphs of placeholder shapes.

use crate::common::unit::pt_to_centipoints;
use crate::common::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// Line break inside a paragraph, written as `<a:br/>`. A `\n` in a
/// paragraph's own text is written the same way.
pub const LINE_BREAK: char = '\u{000B}';

/// A paragraph holding a single run of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    text: String,
    level: Option<u8>,
    font_size_pt: Option<f64>,
}

impl Paragraph {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.text = text.to_string();
        self
    }

    /// Indentation level, 0 to 8.
    pub fn set_level(&mut self, level: u8) -> &mut Self {
        self.level = Some(level.min(8));
        self
    }

    pub fn set_font_size(&mut self, pt: f64) -> &mut Self {
        self.font_size_pt = Some(pt);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> u8 {
        self.level.unwrap_or(0)
    }

    pub fn font_size(&self) -> Option<f64> {
        self.font_size_pt
    }

    fn write_xml(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<a:p>");
        if let Some(level) = self.level {
            write!(xml, r#"<a:pPr lvl="{}"/>"#, level)?;
        }

        let run_props = match self.font_size_pt {
            Some(pt) => format!(r#" lang="en-US" sz="{}" dirty="0""#, pt_to_centipoints(pt)),
            None => r#" lang="en-US" dirty="0""#.to_string(),
        };

        for (i, line) in self.text.split([LINE_BREAK, '\n']).enumerate() {
            if i > 0 {
                write!(xml, "<a:br><a:rPr{}/></a:br>", run_props)?;
            }
            write!(
                xml,
                "<a:r><a:rPr{}/><a:t>{}</a:t></a:r>",
                run_props,
                escape_xml(&strip_invalid_xml_chars(line))
            )?;
        }

        if let Some(pt) = self.font_size_pt {
            write!(xml, r#"<a:endParaRPr lang="en-US" sz="{}" dirty="0"/>"#, pt_to_centipoints(pt))?;
        }
        xml.push_str("</a:p>");
        Ok(())
    }
}

/// The text body of a shape: an ordered list of paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content; each `\n`-separated line becomes a paragraph.
    pub fn set_text(&mut self, text: &str) {
        self.paragraphs = text.split('\n').map(Paragraph::new).collect();
    }

    /// Remove every paragraph.
    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }

    /// Append an empty paragraph and return it for configuration.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::default());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph texts joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Write `<p:txBody>`. A text body needs at least one `<a:p>`, so an
    /// empty frame is written with a single empty paragraph.
    pub(crate) fn write_xml(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
        if self.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }
        for paragraph in &self.paragraphs {
            paragraph.write_xml(xml)?;
        }
        xml.push_str("</p:txBody>");
        Ok(())
    }
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, CR, LF).
fn strip_invalid_xml_chars(text: &str) -> std::borrow::Cow<'_, str> {
    let invalid = |c: char| c < ' ' && !matches!(c, '\t' | '\n' | '\r');
    if text.chars().any(invalid) {
        text.chars().filter(|&c| !invalid(c)).collect::<String>().into()
    } else {
        text.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_xml(frame: &TextFrame) -> String {
        let mut xml = String::new();
        frame.write_xml(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_set_text_splits_lines() {
        let mut frame = TextFrame::new();
        frame.set_text("Core\nRendering\n");
        let texts: Vec<&str> = frame.paragraphs().iter().map(Paragraph::text).collect();
        assert_eq!(texts, ["Core", "Rendering", ""]);
        assert_eq!(frame.text(), "Core\nRendering\n");
    }

    #[test]
    fn test_empty_frame_keeps_one_paragraph() {
        let mut frame = TextFrame::new();
        frame.set_text("placeholder");
        frame.clear();
        assert!(frame.is_empty());
        assert_eq!(frame.text(), "");
        assert_eq!(
            frame_xml(&frame),
            "<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>"
        );
    }

    #[test]
    fn test_paragraph_formatting() {
        let mut frame = TextFrame::new();
        frame
            .add_paragraph()
            .set_text("Scene graph & <ECS>")
            .set_level(0)
            .set_font_size(14.0);

        let xml = frame_xml(&frame);
        assert!(xml.contains(r#"<a:pPr lvl="0"/>"#));
        assert!(xml.contains(r#"<a:rPr lang="en-US" sz="1400" dirty="0"/><a:t>Scene graph &amp; &lt;ECS&gt;</a:t>"#));
        assert!(xml.contains(r#"<a:endParaRPr lang="en-US" sz="1400" dirty="0"/>"#));
    }

    #[test]
    fn test_unformatted_paragraph_has_no_ppr() {
        let mut frame = TextFrame::new();
        frame.set_text("");
        let xml = frame_xml(&frame);
        assert!(!xml.contains("a:pPr"));
        assert!(xml.contains("<a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t></a:t></a:r>"));
    }

    #[test]
    fn test_line_breaks_and_control_chars() {
        let mut frame = TextFrame::new();
        frame.set_text("first\u{000B}second\u{0007}");
        let xml = frame_xml(&frame);
        assert!(xml.contains("<a:t>first</a:t></a:r><a:br>"));
        assert!(xml.contains("<a:t>second</a:t>"));
        assert!(!xml.contains('\u{0007}'));
    }

    #[test]
    fn test_newline_in_paragraph_is_line_break() {
        let mut frame = TextFrame::new();
        frame.add_paragraph().set_text("riga1\nriga2\u{000B}riga3");
        assert_eq!(frame.paragraphs().len(), 1);

        let xml = frame_xml(&frame);
        assert!(!xml.contains('\n'));
        assert_eq!(xml.matches("<a:br>").count(), 2);
        assert!(xml.contains("<a:t>riga1</a:t></a:r><a:br>"));
        assert!(xml.contains("<a:t>riga2</a:t></a:r><a:br>"));
        assert!(xml.contains("<a:t>riga3</a:t>"));
    }

    #[test]
    fn test_level_is_clamped() {
        let mut paragraph = Paragraph::new("deep");
        paragraph.set_level(12);
        assert_eq!(paragraph.level(), 8);
    }
}
