/// Parts of an OPC package.
///
/// A part is a named blob with a content type and its own relationships. The
/// presentation writer produces XML parts only; reading a package written by
/// another producer can also yield binary parts (thumbnails, media).
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;

pub trait Part {
    fn partname(&self) -> &PackURI;

    fn content_type(&self) -> &str;

    fn blob(&self) -> &[u8];

    fn rels(&self) -> &Relationships;

    fn rels_mut(&mut self) -> &mut Relationships;

    /// Add or reuse a relationship from this part to `target` and return its id.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels_mut().get_or_add(reltype, target)
    }

    /// XML text of the part, `None` for binary parts.
    fn xml_str(&self) -> Option<&str> {
        None
    }
}

/// A part holding opaque binary content.
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri());
        Self {
            partname,
            content_type,
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// A part whose content is an XML document.
#[derive(Debug)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml: String,
    rels: Relationships,
}

impl XmlPart {
    pub fn new<S: Into<String>>(partname: PackURI, content_type: &str, xml: S) -> Self {
        let rels = Relationships::new(partname.base_uri());
        Self {
            partname,
            content_type: content_type.to_string(),
            xml: xml.into(),
            rels,
        }
    }

    /// Load an XML part from raw bytes, rejecting content that is not UTF-8.
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Self> {
        let xml = String::from_utf8(blob).map_err(|e| e.utf8_error())?;
        Ok(Self::new(partname, &content_type, xml))
    }

    /// A quick-xml reader over the part content.
    pub fn reader(&self) -> Reader<&[u8]> {
        let mut reader = Reader::from_reader(self.xml.as_bytes());
        reader.config_mut().trim_text(false);
        reader
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    fn xml_str(&self) -> Option<&str> {
        Some(&self.xml)
    }
}

/// Selects the part type for content read from a package.
pub struct PartFactory;

impl PartFactory {
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    #[inline]
    fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}
