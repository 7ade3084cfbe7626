//! The slide deck: records, the built-in content, deck files and the builder.

pub mod builder;
pub mod content;
pub mod record;
pub mod source;

pub use builder::{BuildError, DeckBuilder, build, truncate_chars};
pub use content::{DEFAULT_OUTPUT_FILE, default_deck, default_records};
pub use record::{BuildOptions, SlideRecord};
pub use source::{Deck, DeckSourceError};
