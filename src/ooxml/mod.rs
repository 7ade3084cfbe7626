//! Office Open XML (OOXML) presentation support.
//!
//! Two layers, following the Open Packaging Conventions:
//!
//! 1. **OPC layer** (`opc`): package handling (ZIP container, parts,
//!    relationships, content types)
//! 2. **PresentationML** (`pptx`): template, layouts, slides, notes and the
//!    read-back inspector
//!
//! `common` holds the document properties shared by every package kind.
pub mod common;
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

pub use common::{AppProperties, DocumentProperties};

// Re-export error types
pub use error::{OoxmlError, Result};
