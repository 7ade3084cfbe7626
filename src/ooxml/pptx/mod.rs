//! PowerPoint (.pptx) presentation writing.
//!
//! A presentation starts from the bundled default template (one slide master,
//! four layouts, a notes master and the Office theme). Slides are added by
//! layout index; each slide gets the placeholders its layout declares, and
//! every slide carries a notes slide.
//!
//! # Example
//!
//! ```rust,no_run
//! use deckgen::ooxml::pptx::MutablePresentation;
//!
//! let mut pres = MutablePresentation::new()?;
//! let slide = pres.add_slide(1)?;
//! slide.set_title("Architettura")?;
//! let body = slide.placeholder_mut(1)?.text_frame_mut();
//! body.clear();
//! body.add_paragraph().set_text("Core").set_font_size(14.0);
//! pres.save("deck.pptx")?;
//! # Ok::<(), deckgen::ooxml::OoxmlError>(())
//! ```

pub mod layout;
pub mod reader;
pub mod template;
pub mod writer;

pub use layout::{PlaceholderSpec, PlaceholderType, SlideLayout};
pub use reader::{DeckSummary, ParagraphSummary, SlideSummary};
pub use writer::{MutablePresentation, MutableSlide, Paragraph, Placeholder, TextFrame};
