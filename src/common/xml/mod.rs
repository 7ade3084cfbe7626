//! XML helpers shared by the writers and readers.

mod escape;

pub use escape::{escape_xml, resolve_reference};
