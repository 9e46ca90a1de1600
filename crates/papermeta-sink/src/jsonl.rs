//! JSON-lines record sink

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use papermeta_core::{ExtractedRecord, Result};

use crate::{sink_error, truncate_cell, RecordSink};

/// Sink writing one JSON object per line
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    max_cell_length: usize,
}

impl JsonLinesSink {
    pub fn open(path: impl AsRef<Path>, max_cell_length: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| sink_error("failed to open", &path, e))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            max_cell_length,
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn sink_id(&self) -> &str {
        "jsonl"
    }

    fn append(&mut self, record: &ExtractedRecord) -> Result<()> {
        let mut stored = record.clone();
        stored.conclusion = stored
            .conclusion
            .map(|c| truncate_cell(&c, self.max_cell_length));

        let line = serde_json::to_string(&stored)
            .map_err(|e| sink_error("failed to encode record for", &self.path, e))?;

        writeln!(self.writer, "{line}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| sink_error("failed to write", &self.path, e))
    }
}
