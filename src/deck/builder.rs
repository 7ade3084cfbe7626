//! Building a presentation from slide records.

use super::record::{BuildOptions, SlideRecord};
use crate::ooxml::pptx::{MutablePresentation, MutableSlide};
use crate::ooxml::pptx::writer::write_atomic;
use crate::ooxml::{DocumentProperties, OoxmlError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Error building a deck. Each variant names the step that failed.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No slide records to build")]
    EmptyInput,

    #[error("Document creation failed: {0}")]
    Create(#[source] OoxmlError),

    #[error("Slide layout {index} lookup failed: {source}")]
    LayoutLookup {
        index: usize,
        #[source]
        source: OoxmlError,
    },

    #[error("Slide {index} could not be filled: {source}")]
    Slide {
        index: usize,
        #[source]
        source: OoxmlError,
    },

    #[error("Presentation serialization failed: {0}")]
    Serialize(#[source] OoxmlError),

    #[error("Cannot write {}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Drives a [`MutablePresentation`] through one build pass.
///
/// The first record becomes a title slide whose subtitle is the joined
/// bullets; every other record becomes a title-and-body slide with one
/// paragraph per bullet. Every slide gets the record's notes.
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    options: BuildOptions,
}

impl DeckBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the in-memory presentation.
    pub fn build_presentation(
        &self,
        records: &[SlideRecord],
    ) -> Result<MutablePresentation, BuildError> {
        let Some((first, rest)) = records.split_first() else {
            return Err(BuildError::EmptyInput);
        };

        let mut pres = MutablePresentation::new().map_err(BuildError::Create)?;

        let mut properties = DocumentProperties::new().title(&first.title);
        if let Some(creator) = &self.options.creator {
            properties = properties.creator(creator);
        }
        pres.set_properties(properties);

        self.add_title_slide(&mut pres, first)?;
        for (offset, record) in rest.iter().enumerate() {
            self.add_body_slide(&mut pres, offset + 1, record)?;
        }

        Ok(pres)
    }

    /// Build and serialize to `.pptx` bytes.
    pub fn build_bytes(&self, records: &[SlideRecord]) -> Result<Vec<u8>, BuildError> {
        self.build_presentation(records)?
            .to_bytes()
            .map_err(BuildError::Serialize)
    }

    /// Build and write to `output_path`, replacing an existing file.
    ///
    /// The file is written next to the destination and renamed over it, so on
    /// failure an existing file at `output_path` is left untouched.
    pub fn build(&self, records: &[SlideRecord], output_path: &Path) -> Result<(), BuildError> {
        info!(slides = records.len(), path = %output_path.display(), "building presentation");

        let bytes = self.build_bytes(records)?;
        write_atomic(output_path, &bytes).map_err(|source| BuildError::IoFailure {
            path: output_path.to_path_buf(),
            source,
        })?;

        info!(
            slides = records.len(),
            bytes = bytes.len(),
            path = %output_path.display(),
            "presentation written"
        );
        Ok(())
    }

    fn add_slide<'a>(
        &self,
        pres: &'a mut MutablePresentation,
        layout: usize,
    ) -> Result<&'a mut MutableSlide, BuildError> {
        pres.add_slide(layout)
            .map_err(|source| BuildError::LayoutLookup { index: layout, source })
    }

    fn add_title_slide(
        &self,
        pres: &mut MutablePresentation,
        record: &SlideRecord,
    ) -> Result<(), BuildError> {
        let slide = self.add_slide(pres, self.options.title_layout)?;
        let slide_error = |source| BuildError::Slide { index: 0, source };

        slide.set_title(&record.title).map_err(slide_error)?;

        if !record.bullets.is_empty() {
            let joined = record.bullets.join(&self.options.subtitle_separator);
            let subtitle = truncate_chars(&joined, self.options.subtitle_max_chars);
            if !try_set_subtitle(slide, subtitle).map_err(slide_error)? {
                debug!(
                    layout = self.options.title_layout,
                    "title layout has no subtitle placeholder, subtitle skipped"
                );
            }
        }

        slide.set_notes(&record.notes);
        debug!(index = 0, title = %record.title, "added title slide");
        Ok(())
    }

    fn add_body_slide(
        &self,
        pres: &mut MutablePresentation,
        index: usize,
        record: &SlideRecord,
    ) -> Result<(), BuildError> {
        let slide = self.add_slide(pres, self.options.body_layout)?;
        let slide_error = |source| BuildError::Slide { index, source };

        slide.set_title(&record.title).map_err(slide_error)?;

        let body = slide.placeholder_mut(1).map_err(slide_error)?.text_frame_mut();
        body.clear();
        for bullet in &record.bullets {
            body.add_paragraph()
                .set_text(bullet)
                .set_level(0)
                .set_font_size(self.options.body_font_size_pt);
        }

        slide.set_notes(&record.notes);
        debug!(index, title = %record.title, bullets = record.bullets.len(), "added body slide");
        Ok(())
    }
}

/// Set the subtitle (placeholder `idx=1`). Returns `Ok(false)` when the
/// slide has no such placeholder; any other failure is returned.
fn try_set_subtitle(slide: &mut MutableSlide, text: &str) -> Result<bool, OoxmlError> {
    match slide.placeholder_mut(1) {
        Ok(placeholder) => {
            placeholder.text_frame_mut().set_text(text);
            Ok(true)
        },
        Err(OoxmlError::PlaceholderNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Build `records` into `output_path` with the default options.
pub fn build(records: &[SlideRecord], output_path: &Path) -> Result<(), BuildError> {
    DeckBuilder::default().build(records, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abcd", 3), "abc");
        assert_eq!(truncate_chars("", 0), "");
        assert_eq!(truncate_chars("JS↔C#", 3), "JS↔");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            DeckBuilder::default().build_presentation(&[]),
            Err(BuildError::EmptyInput)
        ));
    }

    #[test]
    fn test_title_slide_subtitle() {
        let records = [SlideRecord::new("Intro", &["a", "b", "c"], "note")];
        let pres = DeckBuilder::default().build_presentation(&records).unwrap();

        let slide = &pres.slides()[0];
        assert_eq!(slide.layout_index(), 0);
        assert_eq!(slide.title().as_deref(), Some("Intro"));
        assert_eq!(slide.placeholder(1).unwrap().text_frame().text(), "a - b - c");
        assert_eq!(slide.notes(), "note");
    }

    #[test]
    fn test_title_slide_without_bullets_keeps_empty_subtitle() {
        let records = [SlideRecord::new("Intro", &[], "")];
        let pres = DeckBuilder::default().build_presentation(&records).unwrap();
        assert!(pres.slides()[0].placeholder(1).unwrap().text_frame().is_empty());
    }

    #[test]
    fn test_body_slide_paragraphs() {
        let records = [
            SlideRecord::new("Intro", &[], ""),
            SlideRecord::new("Agenda", &["uno", "due"], ""),
        ];
        let pres = DeckBuilder::default().build_presentation(&records).unwrap();

        let body = pres.slides()[1].placeholder(1).unwrap().text_frame();
        let paragraphs = body.paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text(), "uno");
        assert!(paragraphs.iter().all(|p| p.level() == 0 && p.font_size() == Some(14.0)));
    }

    #[test]
    fn test_title_layout_without_subtitle() {
        let options = BuildOptions {
            title_layout: 2,
            ..BuildOptions::default()
        };
        let records = [SlideRecord::new("Intro", &["a"], "")];
        let pres = DeckBuilder::new(options).build_presentation(&records).unwrap();
        assert_eq!(pres.slides()[0].placeholders().len(), 1);
    }

    #[test]
    fn test_layout_lookup_failure() {
        let options = BuildOptions {
            body_layout: 9,
            ..BuildOptions::default()
        };
        let records = [SlideRecord::new("a", &[], ""), SlideRecord::new("b", &[], "")];
        assert!(matches!(
            DeckBuilder::new(options).build_presentation(&records),
            Err(BuildError::LayoutLookup { index: 9, .. })
        ));
    }

    #[test]
    fn test_body_layout_without_body() {
        let options = BuildOptions {
            body_layout: 2,
            ..BuildOptions::default()
        };
        let records = [SlideRecord::new("a", &[], ""), SlideRecord::new("b", &["x"], "")];
        assert!(matches!(
            DeckBuilder::new(options).build_presentation(&records),
            Err(BuildError::Slide { index: 1, .. })
        ));
    }

    #[test]
    fn test_blank_title_layout_fails() {
        let options = BuildOptions {
            title_layout: 3,
            ..BuildOptions::default()
        };
        let records = [SlideRecord::new("a", &[], "")];
        assert!(matches!(
            DeckBuilder::new(options).build_presentation(&records),
            Err(BuildError::Slide { index: 0, .. })
        ));
    }

    #[test]
    fn test_io_failure_reports_cause_once() {
        use std::error::Error;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deck.pptx");
        let err = DeckBuilder::default()
            .build(&[SlideRecord::new("a", &[], "")], &path)
            .unwrap_err();

        let cause = err.source().expect("io failure has a cause").to_string();
        assert!(!err.to_string().contains(&cause));

        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.starts_with("Cannot write "));
        assert_eq!(chain.matches(&cause).count(), 1);
    }
}
