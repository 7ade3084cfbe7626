//! Slide layouts and the placeholders they define.

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt;

/// Kind of a placeholder, from the `type` attribute of `<p:ph>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    /// Generic content placeholder (`obj`, also the default when `type` is absent)
    Object,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Other(String),
}

impl PlaceholderType {
    pub fn parse(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::SubTitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "sldImg" => Self::SlideImage,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Other(other) => other,
        }
    }

    /// Whether this placeholder holds the slide title.
    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder as declared by a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
    pub kind: PlaceholderType,
    pub idx: u32,
    /// Shape name, e.g. `Subtitle 2`
    pub name: String,
}

/// A slide layout of the presentation template.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    name: String,
    layout_type: String,
    placeholders: Vec<PlaceholderSpec>,
}

impl SlideLayout {
    /// Read name, type and placeholders from slide layout XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut name = String::new();
        let mut layout_type = String::new();
        let mut placeholders = Vec::new();
        let mut shape_name: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"sldLayout" => {
                        layout_type = attr_value(e, b"type")?.unwrap_or_else(|| "cust".to_string());
                    },
                    b"cSld" => name = attr_value(e, b"name")?.unwrap_or_default(),
                    b"cNvPr" => shape_name = attr_value(e, b"name")?,
                    b"ph" => {
                        let kind = attr_value(e, b"type")?
                            .map_or(PlaceholderType::Object, |t| PlaceholderType::parse(&t));
                        let idx = match attr_value(e, b"idx")? {
                            Some(idx) => idx.parse::<u32>().map_err(|_| {
                                OoxmlError::InvalidFormat(format!("placeholder idx '{}'", idx))
                            })?,
                            None => 0,
                        };
                        placeholders.push(PlaceholderSpec {
                            kind,
                            idx,
                            name: shape_name.take().unwrap_or_default(),
                        });
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if layout_type.is_empty() {
            return Err(OoxmlError::InvalidFormat(
                "slide layout XML has no sldLayout root".to_string(),
            ));
        }

        Ok(Self {
            name,
            layout_type,
            placeholders,
        })
    }

    /// Layout name, e.g. `Title and Content`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout type, e.g. `title` or `obj`.
    pub fn layout_type(&self) -> &str {
        &self.layout_type
    }

    pub fn placeholders(&self) -> &[PlaceholderSpec] {
        &self.placeholders
    }

    pub fn placeholder(&self, idx: u32) -> Option<&PlaceholderSpec> {
        self.placeholders.iter().find(|ph| ph.idx == idx)
    }
}

/// Unescaped value of attribute `key`.
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::template;

    #[test]
    fn test_template_layouts() {
        let layouts: Vec<SlideLayout> = template::slide_layouts()
            .iter()
            .map(|xml| SlideLayout::parse(xml).unwrap())
            .collect();

        let names: Vec<&str> = layouts.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["Title Slide", "Title and Content", "Title Only", "Blank"]);

        let title = &layouts[0];
        assert_eq!(title.layout_type(), "title");
        assert_eq!(title.placeholders()[0].kind, PlaceholderType::CenterTitle);
        let subtitle = title.placeholder(1).unwrap();
        assert_eq!(subtitle.kind, PlaceholderType::SubTitle);
        assert_eq!(subtitle.name, "Subtitle 2");

        let content = &layouts[1];
        assert_eq!(content.layout_type(), "obj");
        assert_eq!(content.placeholder(1).unwrap().kind, PlaceholderType::Object);

        assert!(layouts[2].placeholder(1).is_none());
        assert!(layouts[3].placeholders().is_empty());
    }

    #[test]
    fn test_invalid_idx() {
        let xml = r#"<p:sldLayout xmlns:p="urn:p" type="obj"><p:cSld name="X"><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="one"/></p:nvPr></p:nvSpPr></p:sp>
            </p:spTree></p:cSld></p:sldLayout>"#;
        assert!(matches!(SlideLayout::parse(xml), Err(OoxmlError::InvalidFormat(_))));
    }

    #[test]
    fn test_not_a_layout() {
        assert!(SlideLayout::parse("<p:sld xmlns:p=\"urn:p\"/>").is_err());
    }

    #[test]
    fn test_placeholder_type_round_trip() {
        for value in ["title", "ctrTitle", "subTitle", "body", "obj", "sldImg", "pic"] {
            assert_eq!(PlaceholderType::parse(value).as_str(), value);
        }
        assert!(PlaceholderType::CenterTitle.is_title());
        assert!(!PlaceholderType::SubTitle.is_title());
    }
}
