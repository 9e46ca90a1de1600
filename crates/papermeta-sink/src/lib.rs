//! papermeta Sink - Record storage
//!
//! Appends one row per processed document to a persistent store. The storage
//! policy lives here rather than in the pipeline: an over-long conclusion is
//! cut to the configured cell length and suffixed with "...".
//!
//! Author: hephaex@gmail.com

use papermeta_core::{ExtractedRecord, PapermetaError, RecordRow, Result, SinkConfig, SinkFormat};

pub mod csv;
pub mod jsonl;

pub use self::csv::CsvSink;
pub use self::jsonl::JsonLinesSink;

/// Marker appended to a truncated cell
pub const TRUNCATION_MARKER: &str = "...";

/// Trait for record sink implementations
pub trait RecordSink: Send {
    /// Sink identifier for logging
    fn sink_id(&self) -> &str;

    /// Append one record
    fn append(&mut self, record: &ExtractedRecord) -> Result<()>;
}

/// Cut `value` to `max_chars` characters and append "..." when it is longer;
/// shorter values are returned unchanged.
pub fn truncate_cell(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &value[..cut]),
        None => value.to_string(),
    }
}

/// Flatten a record into a row with the storage policy applied
pub fn prepare_row(record: &ExtractedRecord, max_cell_length: usize) -> RecordRow {
    let row = record.to_row();
    let conclusion = truncate_cell(&row.cells()[RecordRow::CONCLUSION], max_cell_length);
    row.with_conclusion(conclusion)
}

/// Open the sink described by the configuration
pub fn open_sink(config: &SinkConfig) -> Result<Box<dyn RecordSink>> {
    tracing::debug!(
        format = %config.format,
        output = %config.output.display(),
        "opening record sink"
    );

    let sink: Box<dyn RecordSink> = match config.format {
        SinkFormat::Csv => Box::new(CsvSink::open(&config.output, config.max_cell_length)?),
        SinkFormat::Jsonl => Box::new(JsonLinesSink::open(
            &config.output,
            config.max_cell_length,
        )?),
    };
    Ok(sink)
}

pub(crate) fn sink_error(
    action: &str,
    path: &std::path::Path,
    e: impl std::fmt::Display,
) -> PapermetaError {
    PapermetaError::SinkFailure(format!("{action} {}: {e}", path.display()))
}

// ============================================================================
// In-memory sink
// ============================================================================

/// Sink that keeps prepared rows in memory
#[derive(Debug, Clone)]
pub struct MemorySink {
    rows: Vec<RecordRow>,
    max_cell_length: usize,
}

impl MemorySink {
    pub fn new(max_cell_length: usize) -> Self {
        Self {
            rows: Vec::new(),
            max_cell_length,
        }
    }

    pub fn rows(&self) -> &[RecordRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(SinkConfig::default().max_cell_length)
    }
}

impl RecordSink for MemorySink {
    fn sink_id(&self) -> &str {
        "memory"
    }

    fn append(&mut self, record: &ExtractedRecord) -> Result<()> {
        self.rows.push(prepare_row(record, self.max_cell_length));
        Ok(())
    }
}
