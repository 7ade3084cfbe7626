//! Document properties written to `docProps/core.xml` and `docProps/app.xml`.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use chrono::{DateTime, SecondsFormat, Utc};

/// Core properties (Dublin Core metadata) of a package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the creator; also recorded as the last author.
    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self.last_modified_by = Some(creator.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    /// Stamp created and modified with the same instant.
    pub fn timestamped(mut self, at: DateTime<Utc>) -> Self {
        self.created = Some(at);
        self.modified = Some(at);
        self
    }

    /// Generate core.xml content.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        push_text_element(&mut xml, "dc:title", self.title.as_deref());
        push_text_element(&mut xml, "dc:subject", self.subject.as_deref());
        push_text_element(&mut xml, "dc:creator", self.creator.as_deref());
        push_text_element(&mut xml, "cp:keywords", self.keywords.as_deref());
        push_text_element(&mut xml, "cp:lastModifiedBy", self.last_modified_by.as_deref());

        if let Some(revision) = self.revision {
            xml.push_str(&format!("<cp:revision>{}</cp:revision>", revision));
        }

        for (tag, value) in [("dcterms:created", self.created), ("dcterms:modified", self.modified)] {
            if let Some(at) = value {
                xml.push_str(&format!(
                    r#"<{tag} xsi:type="dcterms:W3CDTF">{}</{tag}>"#,
                    at.to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// Extended (application) properties of a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppProperties {
    pub application: String,
    pub slides: usize,
    pub notes: usize,
}

impl AppProperties {
    pub fn new(slides: usize, notes: usize) -> Self {
        Self {
            application: env!("CARGO_PKG_NAME").to_string(),
            slides,
            notes,
        }
    }

    /// Generate app.xml content.
    pub fn to_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<Properties xmlns="{}" xmlns:vt="{}">"#,
                "<Application>{}</Application>",
                "<PresentationFormat>On-screen Show (4:3)</PresentationFormat>",
                "<Slides>{}</Slides>",
                "<Notes>{}</Notes>",
                "<HiddenSlides>0</HiddenSlides>",
                "</Properties>"
            ),
            namespace::OFC_EXTENDED_PROPERTIES,
            namespace::OFC_DOC_PROPS_VTYPES,
            escape_xml(&self.application),
            self.slides,
            self.notes
        )
    }
}

fn push_text_element(xml: &mut String, tag: &str, value: Option<&str>) {
    if let Some(value) = value {
        xml.push('<');
        xml.push_str(tag);
        xml.push('>');
        xml.push_str(&escape_xml(value));
        xml.push_str("</");
        xml.push_str(tag);
        xml.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_properties_builder() {
        let props = DocumentProperties::new()
            .title("BlazorGameEngine")
            .creator("Team")
            .keywords("blazor, ecs");

        assert_eq!(props.title.as_deref(), Some("BlazorGameEngine"));
        assert_eq!(props.creator.as_deref(), Some("Team"));
        assert_eq!(props.last_modified_by.as_deref(), Some("Team"));
        assert_eq!(props.keywords.as_deref(), Some("blazor, ecs"));
    }

    #[test]
    fn test_core_xml() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        let props = DocumentProperties::new()
            .title("Engine & <Renderer>")
            .creator("Team")
            .timestamped(at);

        let xml = props.to_xml();
        assert!(xml.contains("<dc:title>Engine &amp; &lt;Renderer&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>Team</dc:creator>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-05-17T09:30:00Z</dcterms:created>"#
        ));
        assert!(xml.contains(
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">2024-05-17T09:30:00Z</dcterms:modified>"#
        ));
        assert!(!xml.contains("dc:subject"));
    }

    #[test]
    fn test_app_xml_counts() {
        let xml = AppProperties::new(15, 15).to_xml();
        assert!(xml.contains("<Slides>15</Slides>"));
        assert!(xml.contains("<Notes>15</Notes>"));
        assert!(xml.contains("<Application>deckgen</Application>"));
    }
}
