/// Presentation writer for PPTX.
use crate::common::unit::inches_to_emu;
use crate::ooxml::common::{AppProperties, DocumentProperties};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, Part, Relationships, XmlPart};
use crate::ooxml::pptx::layout::SlideLayout;
use crate::ooxml::pptx::template;
use chrono::Utc;
use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use super::slide::MutableSlide;

const PRESENTATION_URI: &str = "/ppt/presentation.xml";
const SLIDE_MASTER_URI: &str = "/ppt/slideMasters/slideMaster1.xml";
const NOTES_MASTER_URI: &str = "/ppt/notesMasters/notesMaster1.xml";
const THEME_URI: &str = "/ppt/theme/theme1.xml";
const NOTES_THEME_URI: &str = "/ppt/theme/theme2.xml";
const PRES_PROPS_URI: &str = "/ppt/presProps.xml";
const VIEW_PROPS_URI: &str = "/ppt/viewProps.xml";
const TABLE_STYLES_URI: &str = "/ppt/tableStyles.xml";
const CORE_PROPS_URI: &str = "/docProps/core.xml";
const APP_PROPS_URI: &str = "/docProps/app.xml";

/// First slide ID; `sldId` values below 256 are reserved.
const FIRST_SLIDE_ID: u32 = 256;

/// A PowerPoint presentation built from the default template.
///
/// Slides are created from one of the template's layouts and carry that
/// layout's placeholders. Nothing is written until [`to_bytes`](Self::to_bytes)
/// or [`save`](Self::save).
#[derive(Debug)]
pub struct MutablePresentation {
    layouts: Vec<SlideLayout>,
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    properties: DocumentProperties,
}

impl MutablePresentation {
    /// Create an empty presentation from the default template.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Result<Self> {
        let layouts = template::slide_layouts()
            .iter()
            .map(|xml| SlideLayout::parse(xml))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layouts,
            slides: Vec::new(),
            slide_width: inches_to_emu(10.0),
            slide_height: inches_to_emu(7.5),
            properties: DocumentProperties::new(),
        })
    }

    /// Layouts of the template, in template order.
    pub fn slide_layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Append a slide using layout `layout_index`.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut MutableSlide> {
        let layout = self
            .layouts
            .get(layout_index)
            .ok_or(OoxmlError::LayoutNotFound {
                index: layout_index,
                available: self.layouts.len(),
            })?;

        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        let slide = MutableSlide::new(slide_id, layout_index, layout);
        self.slides.push(slide);

        let last = self.slides.len() - 1;
        Ok(&mut self.slides[last])
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the core document properties written to `docProps/core.xml`.
    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.properties = properties;
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Assemble the OPC package for the current content.
    pub fn to_package(&self) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();

        let pres_uri = PackURI::new(PRESENTATION_URI)?;
        let master_uri = PackURI::new(SLIDE_MASTER_URI)?;
        let notes_master_uri = PackURI::new(NOTES_MASTER_URI)?;
        let theme_uri = PackURI::new(THEME_URI)?;
        let notes_theme_uri = PackURI::new(NOTES_THEME_URI)?;

        // presentation.xml refers to its parts by rId, so its relationships
        // are allocated before the XML is generated.
        let mut pres_rels = Relationships::new(pres_uri.base_uri());
        let master_r_id = pres_rels.get_or_add(rt::SLIDE_MASTER, &master_uri);
        pres_rels.get_or_add(rt::THEME, &theme_uri);
        for (uri, reltype, content_type, xml) in [
            (PRES_PROPS_URI, rt::PRES_PROPS, ct::PML_PRES_PROPS, template::pres_props_xml()),
            (VIEW_PROPS_URI, rt::VIEW_PROPS, ct::PML_VIEW_PROPS, template::view_props_xml()),
            (TABLE_STYLES_URI, rt::TABLE_STYLES, ct::PML_TABLE_STYLES, template::table_styles_xml()),
        ] {
            let uri = PackURI::new(uri)?;
            pres_rels.get_or_add(reltype, &uri);
            package.add_part(Box::new(XmlPart::new(uri, content_type, xml)));
        }
        let notes_master_r_id = pres_rels.get_or_add(rt::NOTES_MASTER, &notes_master_uri);

        self.add_master_parts(&mut package, &master_uri, &theme_uri)?;

        let mut notes_master = XmlPart::new(
            notes_master_uri.clone(),
            ct::PML_NOTES_MASTER,
            template::notes_master_xml(),
        );
        notes_master.relate_to(&notes_theme_uri, rt::THEME);
        package.add_part(Box::new(notes_master));
        package.add_part(Box::new(XmlPart::new(theme_uri, ct::OFC_THEME, template::theme_xml())));
        package.add_part(Box::new(XmlPart::new(
            notes_theme_uri,
            ct::OFC_THEME,
            template::theme_xml(),
        )));

        let mut slide_r_ids = Vec::with_capacity(self.slides.len());
        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            let slide_uri = PackURI::new(format!("/ppt/slides/slide{}.xml", number))?;
            let notes_uri = PackURI::new(format!("/ppt/notesSlides/notesSlide{}.xml", number))?;
            let layout_uri = layout_uri(slide.layout_index())?;

            let mut slide_part = XmlPart::new(slide_uri.clone(), ct::PML_SLIDE, slide.to_xml()?);
            slide_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
            slide_part.relate_to(&notes_uri, rt::NOTES_SLIDE);

            let mut notes_part =
                XmlPart::new(notes_uri, ct::PML_NOTES_SLIDE, slide.generate_notes_xml()?);
            notes_part.relate_to(&notes_master_uri, rt::NOTES_MASTER);
            notes_part.relate_to(&slide_uri, rt::SLIDE);

            slide_r_ids.push(pres_rels.get_or_add(rt::SLIDE, &slide_uri));
            package.add_part(Box::new(slide_part));
            package.add_part(Box::new(notes_part));
        }

        let pres_xml = self.generate_presentation_xml(&master_r_id, &notes_master_r_id, &slide_r_ids)?;
        let mut pres_part = XmlPart::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN, pres_xml);
        *pres_part.rels_mut() = pres_rels;
        package.add_part(Box::new(pres_part));

        self.add_doc_props(&mut package)?;
        package.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

        debug!(
            slides = self.slides.len(),
            parts = package.part_count(),
            "assembled presentation package"
        );
        Ok(package)
    }

    /// Slide master, its layouts and their relationships. The master's
    /// `sldLayoutIdLst` refers to layout N as `rIdN`, so layouts are related
    /// first and in order.
    fn add_master_parts(
        &self,
        package: &mut OpcPackage,
        master_uri: &PackURI,
        theme_uri: &PackURI,
    ) -> Result<()> {
        let mut master = XmlPart::new(
            master_uri.clone(),
            ct::PML_SLIDE_MASTER,
            template::slide_master_xml(),
        );

        for (index, xml) in template::slide_layouts().into_iter().enumerate() {
            let uri = layout_uri(index)?;
            master.relate_to(&uri, rt::SLIDE_LAYOUT);

            let mut layout = XmlPart::new(uri, ct::PML_SLIDE_LAYOUT, xml);
            layout.relate_to(master_uri, rt::SLIDE_MASTER);
            package.add_part(Box::new(layout));
        }

        master.relate_to(theme_uri, rt::THEME);
        package.add_part(Box::new(master));
        Ok(())
    }

    fn add_doc_props(&self, package: &mut OpcPackage) -> Result<()> {
        let mut properties = self.properties.clone();
        if properties.title.is_none() {
            properties.title = self.slides.first().and_then(MutableSlide::title);
        }
        if properties.created.is_none() {
            properties = properties.timestamped(Utc::now());
        }

        let core_uri = PackURI::new(CORE_PROPS_URI)?;
        package.relate_to(&core_uri, rt::CORE_PROPERTIES);
        package.add_part(Box::new(XmlPart::new(
            core_uri,
            ct::OPC_CORE_PROPERTIES,
            properties.to_xml(),
        )));

        let app_uri = PackURI::new(APP_PROPS_URI)?;
        package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);
        let app = AppProperties::new(self.slides.len(), self.slides.len());
        package.add_part(Box::new(XmlPart::new(
            app_uri,
            ct::OFC_EXTENDED_PROPERTIES,
            app.to_xml(),
        )));
        Ok(())
    }

    /// Generate presentation.xml content with the relationship IDs allocated
    /// in the presentation part.
    pub(crate) fn generate_presentation_xml(
        &self,
        master_r_id: &str,
        notes_master_r_id: &str,
        slide_r_ids: &[String],
    ) -> Result<String> {
        let mut xml = String::with_capacity(1024 + slide_r_ids.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        write!(
            xml,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
            master_r_id
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            notes_master_r_id
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, r_id) in self.slides.iter().zip(slide_r_ids) {
                write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, slide.slide_id(), r_id)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
            self.slide_width, self.slide_height
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Serialize the presentation to `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_package()?.to_bytes()?)
    }

    /// Serialize and write to `path`, replacing an existing file atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_atomic(path.as_ref(), &bytes)?;
        Ok(())
    }
}

/// Part name of template layout `index` (0-based).
fn layout_uri(index: usize) -> Result<PackURI> {
    Ok(PackURI::new(format!(
        "/ppt/slideLayouts/slideLayout{}.xml",
        index + 1
    ))?)
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`. On failure the destination is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
