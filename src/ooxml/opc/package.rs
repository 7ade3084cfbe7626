/// In-memory OPC package.
///
/// `OpcPackage` holds the package relationships and every part keyed by its
/// part name. Parts are kept in name order, so serialization is deterministic.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::path::Path;

pub struct OpcPackage {
    rels: Relationships,
    parts: BTreeMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI),
            parts: BTreeMap::new(),
        }
    }

    /// Open a package file (`.pptx`, ...).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut phys_reader = PhysPkgReader::open(path)?;
        PackageReader::unmarshal(&mut phys_reader)
    }

    /// Load a package from its serialized bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut phys_reader = PhysPkgReader::from_bytes(data)?;
        PackageReader::unmarshal(&mut phys_reader)
    }

    /// Serialize the package into ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// The part the `officeDocument` package relationship points at
    /// (`presentation.xml` for a presentation).
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        let rel = self
            .rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?;
        let partname = self.rels.target_partname(rel)?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Part reached from `source` through relationship `r_id`.
    pub fn related_part(&self, source: &dyn Part, r_id: &str) -> Result<&dyn Part> {
        let target = source.rels().target_of(r_id)?;
        self.get_part(&target)
    }

    /// Part reached from `source` through its single relationship of `reltype`.
    pub fn part_related_by(&self, source: &dyn Part, reltype: &str) -> Result<&dyn Part> {
        let rel = source.rels().part_with_reltype(reltype)?;
        let target = source.rels().target_partname(rel)?;
        self.get_part(&target)
    }

    /// Add a part, replacing any part with the same name.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    /// Parts in part-name order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or reuse a package relationship to `partname` and return its id.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        self.rels.get_or_add(reltype, partname)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as CT;
    use crate::ooxml::opc::part::XmlPart;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn minimal_pptx() -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
            let options = SimpleFileOptions::default();

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>"#).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#).unwrap();

            writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
</Relationships>"#).unwrap();

            writer.start_file("ppt/presentation.xml", options).unwrap();
            writer.write_all(b"<p:presentation/>").unwrap();

            writer.start_file("ppt/slides/slide1.xml", options).unwrap();
            writer.write_all(b"<p:sld/>").unwrap();

            writer.start_file("ppt/orphan.xml", options).unwrap();
            writer.write_all(b"<orphan/>").unwrap();

            writer.finish().unwrap();
        }
        zip_data
    }

    #[test]
    fn test_open_walks_relationship_graph() {
        let pkg = OpcPackage::from_bytes(minimal_pptx()).unwrap();

        assert_eq!(pkg.part_count(), 2);
        assert!(!pkg.contains_part(&PackURI::new("/ppt/orphan.xml").unwrap()));

        let main_part = pkg.main_document_part().unwrap();
        assert_eq!(main_part.content_type(), CT::PML_PRESENTATION_MAIN);

        let slide = pkg.related_part(main_part, "rId1").unwrap();
        assert_eq!(slide.partname().as_str(), "/ppt/slides/slide1.xml");
        assert_eq!(slide.xml_str(), Some("<p:sld/>"));
    }

    #[test]
    fn test_write_then_read() {
        let mut pkg = OpcPackage::new();
        let pres_uri = PackURI::new("/ppt/presentation.xml").unwrap();
        let slide_uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();

        let mut pres = XmlPart::new(pres_uri.clone(), CT::PML_PRESENTATION_MAIN, "<p:presentation/>");
        let r_id = pres.relate_to(&slide_uri, relationship_type::SLIDE);
        pkg.add_part(Box::new(pres));
        pkg.add_part(Box::new(XmlPart::new(slide_uri.clone(), CT::PML_SLIDE, "<p:sld/>")));
        pkg.relate_to(&pres_uri, relationship_type::OFFICE_DOCUMENT);

        let reread = OpcPackage::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reread.part_count(), 2);
        let main_part = reread.main_document_part().unwrap();
        let slide = reread
            .part_related_by(main_part, relationship_type::SLIDE)
            .unwrap();
        assert_eq!(slide.partname(), &slide_uri);
        assert_eq!(slide.content_type(), CT::PML_SLIDE);
        assert_eq!(main_part.rels().get(&r_id).unwrap().target_ref(), "slides/slide1.xml");
    }
}
