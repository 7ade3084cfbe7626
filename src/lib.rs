//! deckgen - generates the BlazorGameEngine architecture slide deck
//!
//! The crate turns an ordered list of slide records (title, bullets, speaker
//! notes) into an Office Open XML presentation (`.pptx`).
//!
//! # Layers
//!
//! - [`deck`]: slide records, the built-in 15-slide deck, YAML deck files and
//!   the builder that drives the presentation writer
//! - [`ooxml::pptx`]: default template, layouts, slides, notes and a reader
//!   that summarizes a written deck
//! - [`ooxml::opc`]: Open Packaging Conventions (parts, relationships, content
//!   types, ZIP container)
//!
//! # Example
//!
//! ```no_run
//! use deckgen::deck::{self, DEFAULT_OUTPUT_FILE};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! deck::build(&deck::default_records(), Path::new(DEFAULT_OUTPUT_FILE))?;
//!
//! let summary = deckgen::ooxml::pptx::DeckSummary::open(DEFAULT_OUTPUT_FILE)?;
//! for slide in &summary.slides {
//!     println!("{}", slide.title.as_deref().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod deck;
pub mod logging;
pub mod ooxml;

pub use deck::{BuildError, BuildOptions, Deck, DeckBuilder, SlideRecord};
pub use ooxml::pptx::{DeckSummary, MutablePresentation};
