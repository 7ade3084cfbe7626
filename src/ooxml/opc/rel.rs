/// Relationships between the parts of an OPC package.
///
/// Every source (the package itself or a part) owns one `Relationships`
/// collection, serialized to its `.rels` part. Relationship ids are allocated
/// as `rId1`, `rId2`, ... in insertion order.
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{namespace, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target reference as written in the `.rels` part, relative to the
    /// source part's directory for internal relationships.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Directory of the source part, used to resolve relative targets
    base_uri: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new<S: Into<String>>(base_uri: S) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: Vec::new(),
        }
    }

    /// Parse the XML of a `.rels` part.
    pub fn from_xml<S: Into<String>>(base_uri: S, xml: &str) -> Result<Self> {
        let mut rels = Self::new(base_uri);
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value),
                            b"Type" => reltype = Some(value),
                            b"Target" => target = Some(value),
                            b"TargetMode" => is_external = value == target_mode::EXTERNAL,
                            _ => {},
                        }
                    }

                    let (Some(r_id), Some(reltype), Some(target)) = (r_id, reltype, target) else {
                        return Err(OpcError::InvalidRelationship(
                            "Relationship element is missing Id, Type or Target".to_string(),
                        ));
                    };
                    rels.rels
                        .push(Relationship::new(r_id, reltype, target, is_external));
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(rels)
    }

    /// Relationship with the given id.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// Return the id of the internal relationship of `reltype` to `target`,
    /// adding it with the next free id when it does not exist yet.
    pub fn get_or_add(&mut self, reltype: &str, target: &PackURI) -> String {
        let target_ref = target.relative_ref(&self.base_uri);
        if let Some(rel) = self
            .rels
            .iter()
            .find(|rel| !rel.is_external && rel.reltype == reltype && rel.target_ref == target_ref)
        {
            return rel.r_id.clone();
        }

        let r_id = self.next_r_id();
        self.rels.push(Relationship::new(
            r_id.clone(),
            reltype.to_string(),
            target_ref,
            false,
        ));
        r_id
    }

    /// Lowest `rIdN` not in use.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| rel.r_id.strip_prefix("rId"))
            .filter_map(|num| atoi_simd::parse_pos::<u32, false>(num.as_bytes()).ok())
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for num in used {
            if num == next {
                next += 1;
            } else if num > next {
                break;
            }
        }

        format!("rId{}", next)
    }

    /// Absolute part name of an internal relationship's target.
    pub fn target_partname(&self, rel: &Relationship) -> Result<PackURI> {
        if rel.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} points outside the package",
                rel.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &rel.target_ref)
    }

    /// Part name of the target of relationship `r_id`.
    pub fn target_of(&self, r_id: &str) -> Result<PackURI> {
        let rel = self
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(r_id.to_string()))?;
        self.target_partname(rel)
    }

    /// The single relationship of `reltype`.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.iter().filter(|rel| rel.reltype == reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(reltype.to_string())),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to the XML of a `.rels` part, in insertion order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);

        for rel in &self.rels {
            xml.push_str(r#"<Relationship Id=""#);
            xml.push_str(&escape_xml(&rel.r_id));
            xml.push_str(r#"" Type=""#);
            xml.push_str(&escape_xml(&rel.reltype));
            xml.push_str(r#"" Target=""#);
            xml.push_str(&escape_xml(&rel.target_ref));
            xml.push('"');
            if rel.is_external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;

    fn uri(s: &str) -> PackURI {
        PackURI::new(s).unwrap()
    }

    #[test]
    fn test_get_or_add_reuses_ids() {
        let mut rels = Relationships::new("/ppt/slides");

        let layout = uri("/ppt/slideLayouts/slideLayout2.xml");
        assert_eq!(rels.get_or_add(RT::SLIDE_LAYOUT, &layout), "rId1");
        assert_eq!(rels.get_or_add(RT::SLIDE_LAYOUT, &layout), "rId1");

        let notes = uri("/ppt/notesSlides/notesSlide1.xml");
        assert_eq!(rels.get_or_add(RT::NOTES_SLIDE, &notes), "rId2");
        assert_eq!(rels.len(), 2);
        assert_eq!(
            rels.get("rId1").unwrap().target_ref(),
            "../slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_next_r_id_fills_gaps() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="t" Target="a.xml"/>
            <Relationship Id="rId3" Type="t" Target="b.xml"/>
        </Relationships>"#;
        let rels = Relationships::from_xml("/ppt", xml).unwrap();
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_next_r_id_skips_foreign_ids() {
        let xml = r#"<Relationships>
            <Relationship Id="rId1" Type="t" Target="a.xml"/>
            <Relationship Id="rId2" Type="t" Target="b.xml"/>
            <Relationship Id="rIdThumb" Type="t" Target="c.xml"/>
            <Relationship Id="rId-3" Type="t" Target="d.xml"/>
            <Relationship Id="custom7" Type="t" Target="e.xml"/>
        </Relationships>"#;
        let rels = Relationships::from_xml("/ppt", xml).unwrap();
        assert_eq!(rels.next_r_id(), "rId3");
    }

    #[test]
    fn test_xml_round_trip_resolves_targets() {
        let mut rels = Relationships::new("/ppt");
        rels.get_or_add(RT::SLIDE_MASTER, &uri("/ppt/slideMasters/slideMaster1.xml"));
        rels.get_or_add(RT::SLIDE, &uri("/ppt/slides/slide1.xml"));

        let parsed = Relationships::from_xml("/ppt", &rels.to_xml()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed.target_of("rId2").unwrap().as_str(),
            "/ppt/slides/slide1.xml"
        );
        assert_eq!(parsed.part_with_reltype(RT::SLIDE_MASTER).unwrap().r_id(), "rId1");
        assert!(parsed.target_of("rId9").is_err());
    }

    #[test]
    fn test_external_relationship_has_no_partname() {
        let xml = r#"<Relationships><Relationship Id="rId1" Type="t" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/></Relationships>"#;
        let rels = Relationships::from_xml("/ppt/slides", xml).unwrap();
        let rel = rels.get("rId1").unwrap();
        assert!(rel.is_external());
        assert_eq!(rel.target_ref(), "https://example.com/?a=1&b=2");
        assert!(rels.target_partname(rel).is_err());
    }
}
