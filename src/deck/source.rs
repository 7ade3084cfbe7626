//! Decks loaded from YAML files.
//!
//! ```yaml
//! options:
//!   creator: "Team"
//! slides:
//!   - title: "Agenda"
//!     bullets: ["Architettura", "Demo"]
//!     notes: "Percorso della presentazione"
//! ```
//!
//! `options` and every field in it are optional; missing fields keep their
//! defaults. Unknown fields are rejected.

use super::record::{BuildOptions, SlideRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error loading a deck file.
#[derive(Error, Debug)]
pub enum DeckSourceError {
    #[error("Cannot read deck file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid deck file")]
    Parse(#[from] serde_saphyr::Error),
}

/// Slide records plus the options to build them with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deck {
    #[serde(default)]
    pub options: BuildOptions,
    pub slides: Vec<SlideRecord>,
}

impl Deck {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DeckSourceError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    /// Read and parse a YAML deck file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DeckSourceError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| DeckSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let deck = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), slides = deck.slides.len(), "loaded deck file");
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_deck() {
        let deck = Deck::from_yaml_str("slides:\n  - title: Solo\n").unwrap();
        assert_eq!(deck.options, BuildOptions::default());
        assert_eq!(deck.slides, [SlideRecord::new("Solo", &[], "")]);
    }

    #[test]
    fn test_options_override() {
        let yaml = r#"
options:
  title_layout: 2
  creator: "Team Blazor"
slides:
  - title: "Intro"
    bullets: ["a", "b"]
    notes: "n"
"#;
        let deck = Deck::from_yaml_str(yaml).unwrap();
        assert_eq!(deck.options.title_layout, 2);
        assert_eq!(deck.options.body_layout, 1);
        assert_eq!(deck.options.creator.as_deref(), Some("Team Blazor"));
        assert_eq!(deck.slides[0].bullets, ["a", "b"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Deck::from_yaml_str("slides:\n  - title: X\n    subtitle: Y\n").unwrap_err();
        assert!(matches!(err, DeckSourceError::Parse(_)));
    }

    #[test]
    fn test_parse_error_keeps_cause() {
        use std::error::Error;

        let err = Deck::from_yaml_str("slides:\n  - title: [unclosed\n").unwrap_err();
        let cause = err.source().expect("parse error has a cause");
        assert!(!cause.to_string().is_empty());
        assert_eq!(err.to_string(), "Invalid deck file");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Deck::load(dir.path().join("deck.yaml")).unwrap_err();
        assert!(matches!(err, DeckSourceError::Io { .. }));
    }
}
