//! Mutable presentation writer components for PPTX.

pub mod pres;
pub mod slide;
pub mod textframe;

// Re-export main types
pub use pres::{MutablePresentation, write_atomic};
pub use slide::{MutableSlide, Placeholder};
pub use textframe::{LINE_BREAK, Paragraph, TextFrame};
