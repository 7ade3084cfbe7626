//! Parts shared by all OOXML document kinds.

pub mod properties;

pub use properties::{AppProperties, DocumentProperties};
