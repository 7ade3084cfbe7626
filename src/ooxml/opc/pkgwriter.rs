//! Serializes an [`OpcPackage`] into a ZIP container.
//!
//! Members are written in a fixed order: `[Content_Types].xml`, the package
//! relationships, then each part (in part-name order) followed by its
//! relationships.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::BTreeMap;

pub struct PackageWriter;

impl PackageWriter {
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        let content_types = ContentTypesItem::from_package(package).to_xml();
        phys_writer.write(&PackURI::new(CONTENT_TYPES_URI)?, content_types.as_bytes())?;

        let package_uri = PackURI::new(PACKAGE_URI)?;
        phys_writer.write(&package_uri.rels_uri(), package.rels().to_xml().as_bytes())?;

        for part in package.iter_parts() {
            phys_writer.write(part.partname(), part.blob())?;
            if !part.rels().is_empty() {
                phys_writer.write(&part.partname().rels_uri(), part.rels().to_xml().as_bytes())?;
            }
        }

        phys_writer.finish()
    }
}

/// `Default` and `Override` entries of `[Content_Types].xml`.
struct ContentTypesItem {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self {
            defaults: BTreeMap::from([
                ("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string()),
                ("xml".to_string(), ct::XML.to_string()),
            ]),
            overrides: BTreeMap::new(),
        };

        for part in package.iter_parts() {
            let ext = part.partname().ext();
            if Self::is_default_content_type(ext, part.content_type()) {
                cti.defaults
                    .insert(ext.to_string(), part.content_type().to_string());
            } else {
                cti.overrides.insert(
                    part.partname().to_string(),
                    part.content_type().to_string(),
                );
            }
        }

        cti
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", "image/png")
                | ("jpeg", "image/jpeg")
                | ("gif", "image/gif")
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;
    use crate::ooxml::opc::part::XmlPart;
    use crate::ooxml::opc::phys_pkg::PhysPkgReader;

    fn sample_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        pkg.add_part(Box::new(XmlPart::new(pres.clone(), ct::PML_PRESENTATION_MAIN, "<p:presentation/>")));
        pkg.add_part(Box::new(XmlPart::new(
            PackURI::new("/ppt/custom.xml").unwrap(),
            ct::XML,
            "<custom/>",
        )));
        pkg.relate_to(&pres, RT::OFFICE_DOCUMENT);
        pkg
    }

    #[test]
    fn test_content_types_xml() {
        let xml = ContentTypesItem::from_package(&sample_package()).to_xml();

        assert!(xml.contains(r#"<Default Extension="xml" ContentType="application/xml"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/presentation.xml""#));
        assert!(!xml.contains(r#"PartName="/ppt/custom.xml""#));
    }

    #[test]
    fn test_member_order() {
        let bytes = PackageWriter::to_bytes(&sample_package()).unwrap();
        let reader = PhysPkgReader::from_bytes(bytes).unwrap();

        assert_eq!(
            reader.member_names(),
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "ppt/custom.xml",
                "ppt/presentation.xml",
            ]
        );
    }

    #[test]
    fn test_identical_packages_serialize_identically() {
        let first = PackageWriter::to_bytes(&sample_package()).unwrap();
        let second = PackageWriter::to_bytes(&sample_package()).unwrap();
        assert_eq!(first, second);
    }
}
