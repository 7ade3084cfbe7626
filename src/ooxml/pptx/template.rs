//! Default presentation template.
//!
//! The parts every new presentation starts from: one slide master with four
//! layouts, a notes master, the Office theme and the presentation-level
//! property parts. The XML lives under `resources/pptx` and is minified into
//! the binary at compile time.

use xml_minifier::minified_xml;

/// Slide master; its `sldLayoutIdLst` refers to the layouts as `rId1..rId4`.
pub fn slide_master_xml() -> &'static str {
    minified_xml!("resources/pptx/slideMasters/slideMaster1.xml")
}

/// Slide layouts in template order:
///
/// | index | name              | placeholders                 |
/// |-------|-------------------|------------------------------|
/// | 0     | Title Slide       | ctrTitle, subTitle (idx 1)   |
/// | 1     | Title and Content | title, body (idx 1)          |
/// | 2     | Title Only        | title                        |
/// | 3     | Blank             |                              |
pub fn slide_layouts() -> [&'static str; 4] {
    [
        minified_xml!("resources/pptx/slideLayouts/slideLayout1.xml"),
        minified_xml!("resources/pptx/slideLayouts/slideLayout2.xml"),
        minified_xml!("resources/pptx/slideLayouts/slideLayout3.xml"),
        minified_xml!("resources/pptx/slideLayouts/slideLayout4.xml"),
    ]
}

pub fn notes_master_xml() -> &'static str {
    minified_xml!("resources/pptx/notesMaster.xml")
}

/// Office theme, shared by the slide master and the notes master.
pub fn theme_xml() -> &'static str {
    minified_xml!("resources/pptx/theme/theme1.xml")
}

pub fn pres_props_xml() -> &'static str {
    minified_xml!("resources/pptx/presProps.xml")
}

pub fn view_props_xml() -> &'static str {
    minified_xml!("resources/pptx/viewProps.xml")
}

pub fn table_styles_xml() -> &'static str {
    minified_xml!("resources/pptx/tableStyles.xml")
}
