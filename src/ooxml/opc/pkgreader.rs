//! Loads a serialized OPC package into an [`OpcPackage`].
//!
//! Parts are discovered by walking the relationship graph from the package
//! relationships, the same way consuming applications do; ZIP members that no
//! relationship reaches are ignored.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::PartFactory;
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{HashMap, HashSet, VecDeque};

/// Content type lookup built from `[Content_Types].xml`.
struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };
        let mut reader = Reader::from_reader(xml);

        loop {
            match reader.read_event()? {
                Event::Empty(ref e) | Event::Start(ref e) => {
                    let key_attr: &[u8] = match e.local_name().as_ref() {
                        b"Default" => b"Extension",
                        b"Override" => b"PartName",
                        _ => continue,
                    };

                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == key_attr {
                            key = Some(attr.unescape_value()?.into_owned());
                        } else if attr.key.as_ref() == b"ContentType" {
                            content_type = Some(attr.unescape_value()?.into_owned());
                        }
                    }

                    if let (Some(key), Some(content_type)) = (key, content_type) {
                        if key_attr == b"Extension" {
                            map.defaults.insert(key.to_lowercase(), content_type);
                        } else {
                            map.overrides.insert(key, content_type);
                        }
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(map)
    }

    /// Override first, then the default for the part's extension.
    fn get(&self, pack_uri: &PackURI) -> Result<String> {
        self.overrides
            .get(pack_uri.as_str())
            .or_else(|| self.defaults.get(&pack_uri.ext().to_lowercase()))
            .cloned()
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

pub struct PackageReader;

impl PackageReader {
    /// Read every part reachable from the package relationships.
    pub fn unmarshal(phys_reader: &mut PhysPkgReader) -> Result<OpcPackage> {
        let content_types = ContentTypeMap::from_xml(&phys_reader.content_types_xml()?)?;

        let package_uri = PackURI::new(PACKAGE_URI)?;
        let mut package = OpcPackage::new();
        *package.rels_mut() = Self::load_rels(phys_reader, &package_uri)?;

        let mut visited = HashSet::new();
        let mut queue: VecDeque<PackURI> = Self::internal_targets(package.rels())?.into();
        queue.retain(|uri| visited.insert(uri.clone()));

        while let Some(partname) = queue.pop_front() {
            let rels = Self::load_rels(phys_reader, &partname)?;
            for child in Self::internal_targets(&rels)? {
                if visited.insert(child.clone()) {
                    queue.push_back(child);
                }
            }

            let blob = phys_reader.blob_for(&partname)?;
            let content_type = content_types.get(&partname)?;
            let mut part = PartFactory::load(partname, content_type, blob)?;
            *part.rels_mut() = rels;
            package.add_part(part);
        }

        Ok(package)
    }

    fn load_rels(phys_reader: &mut PhysPkgReader, source_uri: &PackURI) -> Result<Relationships> {
        match phys_reader.rels_xml_for(source_uri)? {
            Some(xml) => Relationships::from_xml(source_uri.base_uri(), std::str::from_utf8(&xml)?),
            None => Ok(Relationships::new(source_uri.base_uri())),
        }
    }

    fn internal_targets(rels: &Relationships) -> Result<Vec<PackURI>> {
        rels.iter()
            .filter(|rel| !rel.is_external())
            .map(|rel| rels.target_partname(rel))
            .collect()
    }
}
