//! Record assembly
//!
//! The document is annotated once as a whole and its leading lines once each;
//! every field is then computed independently from the raw text and those
//! annotations.

use std::sync::Arc;

use papermeta_core::{ExtractedRecord, ExtractionConfig, Result};

use crate::annotate::EntityAnnotator;
use crate::authors::{annotate_author_lines, authors_from_line_annotations};
use crate::conclusion::extract_conclusion;
use crate::date::resolve_date;
use crate::link::find_github_link;
use crate::title::detect_title;
use crate::topics::rank_topics;
use crate::{Annotation, EntityEngine};

/// Build a record from already computed annotations.
///
/// `document` is the whole-text annotation; `author_lines` holds one
/// annotation per leading line considered for authors.
pub fn assemble_record(
    text: &str,
    document: &Annotation,
    author_lines: &[Annotation],
    config: &ExtractionConfig,
) -> ExtractedRecord {
    ExtractedRecord {
        title: detect_title(text, config.min_title_len),
        authors: authors_from_line_annotations(author_lines, config.max_authors),
        date: resolve_date(document),
        conclusion: extract_conclusion(text, config.max_conclusion_sentences),
        github: find_github_link(text),
        topics: rank_topics(&document.noun_phrases, config.max_topics),
    }
}

/// Runs the full pipeline for one document at a time
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    annotator: EntityAnnotator,
    config: ExtractionConfig,
}

impl RecordAssembler {
    /// Create an assembler around a loaded engine with default settings
    pub fn new(engine: Arc<dyn EntityEngine>) -> Self {
        Self {
            annotator: EntityAnnotator::new(engine),
            config: ExtractionConfig::default(),
        }
    }

    /// Set extraction limits
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn engine_id(&self) -> &str {
        self.annotator.engine_id()
    }

    /// Extract a record from decoded document text.
    ///
    /// Fails only when the engine fails; missing fields are left empty.
    pub fn assemble(&self, text: &str) -> Result<ExtractedRecord> {
        let document = self.annotator.annotate_document(text)?;
        let author_lines = annotate_author_lines(text, &self.annotator, &self.config)?;

        let record = assemble_record(text, &document, &author_lines, &self.config);

        tracing::debug!(
            title = record.title.as_deref().unwrap_or(""),
            authors = %record.authors,
            date = record.date.as_deref().unwrap_or(""),
            has_conclusion = record.conclusion.is_some(),
            github = record.github.as_deref().unwrap_or(""),
            topics = record.topics.len(),
            "record assembled"
        );

        Ok(record)
    }
}
