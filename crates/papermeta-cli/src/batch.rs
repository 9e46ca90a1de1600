//! Batch driver
//!
//! Validates each path, extracts its text, runs the record assembler and
//! appends the record to the sink. Every failure is confined to its own
//! document: it is logged, counted in the report, and the batch moves on.
//!
//! Author: hephaex@gmail.com

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use papermeta_core::{ExtractedRecord, PapermetaError, Result};
use papermeta_extractor::RecordAssembler;
use papermeta_parser::{FileType, ParserError, ParserRegistry};
use papermeta_sink::RecordSink;

// ============================================================================
// Report
// ============================================================================

/// A document that was skipped and why
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub processed: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            processed: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, path: &Path, error: &PapermetaError) {
        self.failures.push(BatchFailure {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }

    /// Stamp the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn skipped(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} of {} document(s), skipped {}",
            self.processed,
            self.total(),
            self.skipped()
        )?;
        if let Some(finished) = self.finished_at {
            let elapsed = finished - self.started_at;
            write!(f, " in {}ms", elapsed.num_milliseconds())?;
        }
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.path.display(), failure.reason)?;
        }
        Ok(())
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Runs documents through extraction and into a sink, one at a time
pub struct BatchDriver {
    parsers: ParserRegistry,
    assembler: RecordAssembler,
    sink: Box<dyn RecordSink>,
}

impl BatchDriver {
    pub fn new(
        parsers: ParserRegistry,
        assembler: RecordAssembler,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            parsers,
            assembler,
            sink,
        }
    }

    /// Extract a record without storing it.
    ///
    /// Checks run in order: extension, existence, text extraction, empty
    /// text; only then is the pipeline invoked.
    pub fn extract(&self, path: &Path) -> Result<ExtractedRecord> {
        if FileType::from_path(path) == FileType::Unknown {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("none");
            return Err(PapermetaError::UnsupportedFormat(ext.to_string()));
        }

        if !path.exists() {
            return Err(PapermetaError::MissingFile(path.to_path_buf()));
        }

        let document = self
            .parsers
            .parse(path)
            .map_err(|e| parser_error(path, e))?;

        if !document.has_text() {
            return Err(PapermetaError::ExtractionFailure {
                path: path.display().to_string(),
                reason: "no text extracted".to_string(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            file_type = %document.file_type,
            pages = document.metadata.page_count,
            paragraphs = document.metadata.paragraph_count,
            words = document.metadata.word_count,
            "text extracted"
        );

        self.assembler.assemble(&document.content)
    }

    /// Extract a record and append it to the sink
    pub fn process(&mut self, path: &Path) -> Result<ExtractedRecord> {
        let record = self.extract(path)?;
        self.sink.append(&record)?;
        Ok(record)
    }

    /// Process one document, logging and recording the outcome
    pub fn process_into(&mut self, path: &Path, report: &mut BatchReport) {
        match self.process(path) {
            Ok(record) => {
                tracing::info!(
                    path = %path.display(),
                    title = record.title.as_deref().unwrap_or(""),
                    sink = self.sink.sink_id(),
                    "document processed"
                );
                report.record_success();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document skipped");
                report.record_failure(path, &e);
            }
        }
    }

    /// Process every path in order
    pub fn run<I, P>(&mut self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::new();
        for path in paths {
            self.process_into(path.as_ref(), &mut report);
        }
        report.finish()
    }
}

fn parser_error(path: &Path, error: ParserError) -> PapermetaError {
    match error {
        ParserError::UnsupportedFormat(format) => PapermetaError::UnsupportedFormat(format),
        other => PapermetaError::ExtractionFailure {
            path: path.display().to_string(),
            reason: other.to_string(),
        },
    }
}
