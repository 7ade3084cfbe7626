//! Slide records and build options.

use serde::Deserialize;

/// One slide of a deck: headline, body lines and speaker notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideRecord {
    pub title: String,
    /// Body lines, in display order
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Speaker notes, empty when absent
    #[serde(default)]
    pub notes: String,
}

impl SlideRecord {
    pub fn new(title: &str, bullets: &[&str], notes: &str) -> Self {
        Self {
            title: title.to_string(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            notes: notes.to_string(),
        }
    }
}

/// Knobs of a build. The defaults reproduce the reference deck.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Template layout used for the first slide
    pub title_layout: usize,
    /// Template layout used for every other slide
    pub body_layout: usize,
    /// Joins the first record's bullets into the subtitle
    pub subtitle_separator: String,
    /// Subtitle limit, in characters
    pub subtitle_max_chars: usize,
    pub body_font_size_pt: f64,
    /// Author written to the document properties
    pub creator: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            title_layout: 0,
            body_layout: 1,
            subtitle_separator: " - ".to_string(),
            subtitle_max_chars: 250,
            body_font_size_pt: 14.0,
            creator: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = SlideRecord::new("Agenda", &["Architettura", "Demo"], "");
        assert_eq!(record.bullets, ["Architettura", "Demo"]);
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = BuildOptions::default();
        assert_eq!((options.title_layout, options.body_layout), (0, 1));
        assert_eq!(options.subtitle_separator, " - ");
        assert_eq!(options.subtitle_max_chars, 250);
        assert_eq!(options.body_font_size_pt, 14.0);
    }
}
