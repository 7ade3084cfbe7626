/// Open Packaging Conventions (OPC) layer.
///
/// The container format shared by all Office Open XML documents:
///
/// - part names ([`PackURI`]) and parts ([`Part`], [`XmlPart`])
/// - relationships between parts ([`Relationships`], `.rels` parts)
/// - content types (`[Content_Types].xml`)
/// - the ZIP container itself
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
