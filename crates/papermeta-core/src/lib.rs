//! papermeta Core - Record types, errors and configuration
//!
//! This crate defines the shared vocabulary of the papermeta workspace:
//! - `ExtractedRecord`, the one output entity of the extraction pipeline
//! - `RecordRow`, the ordered 6-cell row handed to a record sink
//! - Common error types for the batch driver and its collaborators
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, EngineConfig, EngineKind, ExtractionConfig, LoggingConfig, SinkConfig,
    SinkFormat,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Per-document failures. Every variant is recoverable at the batch level:
/// the document is abandoned and the driver moves on to the next one.
#[derive(Error, Debug)]
pub enum PapermetaError {
    /// File extension is not one of the recognized document types
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Input path does not exist
    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// The text extractor produced no usable text
    #[error("Text extraction failed for {path}: {reason}")]
    ExtractionFailure { path: String, reason: String },

    /// The entity engine raised or was unreachable during annotation
    #[error("Entity engine failure: {0}")]
    EntityEngineFailure(String),

    /// The record sink rejected a write
    #[error("Record sink failure: {0}")]
    SinkFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for PapermetaError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PapermetaError>;

// ============================================================================
// Extracted Record
// ============================================================================

/// Metadata extracted from one research paper.
///
/// Built exactly once per document by the record assembler and handed to a
/// record sink. Any field may be absent; that is a normal heuristic outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// First line of the document, when it is long enough to be a title
    pub title: Option<String>,

    /// Up to three author names joined with ", " (empty when none found)
    pub authors: String,

    /// First date mentioned anywhere in the document
    pub date: Option<String>,

    /// Up to five sentences from the conclusion section
    pub conclusion: Option<String>,

    /// First GitHub URL in the document
    pub github: Option<String>,

    /// Up to five ranked topic phrases
    pub topics: Vec<String>,
}

impl ExtractedRecord {
    /// True when the heuristics found nothing at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_empty()
            && self.date.is_none()
            && self.conclusion.is_none()
            && self.github.is_none()
            && self.topics.is_empty()
    }

    /// Topics joined the way they are stored in a row
    pub fn topics_joined(&self) -> String {
        self.topics.join(", ")
    }

    /// Flatten into the ordered row layout used by record sinks
    pub fn to_row(&self) -> RecordRow {
        RecordRow {
            cells: [
                self.title.clone().unwrap_or_default(),
                self.date.clone().unwrap_or_default(),
                self.authors.clone(),
                self.github.clone().unwrap_or_default(),
                self.conclusion.clone().unwrap_or_default(),
                self.topics_joined(),
            ],
        }
    }
}

/// Ordered 6-cell row: `[title, date, authors, github, conclusion, topics]`.
///
/// Absent record fields become empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    cells: [String; 6],
}

impl RecordRow {
    /// Column names, in row order
    pub const COLUMNS: [&'static str; 6] =
        ["title", "date", "authors", "github", "conclusion", "topics"];

    /// Index of the conclusion cell
    pub const CONCLUSION: usize = 4;

    /// Borrow all cells in row order
    pub fn cells(&self) -> &[String; 6] {
        &self.cells
    }

    /// Get a cell by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        Self::COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.cells[i].as_str())
    }

    /// Replace the conclusion cell, leaving the rest untouched
    pub fn with_conclusion(mut self, conclusion: String) -> Self {
        self.cells[Self::CONCLUSION] = conclusion;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ExtractedRecord {
        ExtractedRecord {
            title: Some("Deep Learning for Proteins".to_string()),
            authors: "John Smith, Jane Doe".to_string(),
            date: Some("March 2024".to_string()),
            conclusion: Some("We show strong results.".to_string()),
            github: Some("https://github.com/org/repo".to_string()),
            topics: vec!["protein folding".to_string(), "training data".to_string()],
        }
    }

    #[test]
    fn test_row_order() {
        let row = sample_record().to_row();
        assert_eq!(
            row.cells(),
            &[
                "Deep Learning for Proteins".to_string(),
                "March 2024".to_string(),
                "John Smith, Jane Doe".to_string(),
                "https://github.com/org/repo".to_string(),
                "We show strong results.".to_string(),
                "protein folding, training data".to_string(),
            ]
        );
    }

    #[test]
    fn test_absent_fields_become_empty_cells() {
        let row = ExtractedRecord::default().to_row();
        assert!(row.cells().iter().all(|c| c.is_empty()));
        assert!(ExtractedRecord::default().is_empty());
    }

    #[test]
    fn test_row_lookup_by_column() {
        let row = sample_record().to_row();
        assert_eq!(row.get("github"), Some("https://github.com/org/repo"));
        assert_eq!(row.get("conclusion"), Some("We show strong results."));
        assert_eq!(row.get("missing"), None);

        let row = row.with_conclusion("short".to_string());
        assert_eq!(row.get("conclusion"), Some("short"));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: ExtractedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_error_display() {
        let err = PapermetaError::MissingFile(PathBuf::from("/tmp/paper.pdf"));
        assert_eq!(err.to_string(), "File does not exist: /tmp/paper.pdf");

        let err = PapermetaError::UnsupportedFormat("txt".to_string());
        assert_eq!(err.to_string(), "Unsupported file format: txt");
    }
}
