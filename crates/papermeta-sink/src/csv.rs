//! CSV record sink
//!
//! Appends to an existing file; the header row is only written when the file
//! is new or empty.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use papermeta_core::{ExtractedRecord, RecordRow, Result};

use crate::{prepare_row, sink_error, RecordSink};

/// Sink writing one CSV line per record
pub struct CsvSink {
    path: PathBuf,
    writer: BufWriter<File>,
    max_cell_length: usize,
}

impl CsvSink {
    /// Open `path` for appending, creating it with a header if needed
    pub fn open(path: impl AsRef<Path>, max_cell_length: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| sink_error("failed to open", &path, e))?;

        let is_empty = file
            .metadata()
            .map_err(|e| sink_error("failed to stat", &path, e))?
            .len()
            == 0;

        let mut sink = Self {
            path,
            writer: BufWriter::new(file),
            max_cell_length,
        };

        if is_empty {
            sink.write_line(&RecordRow::COLUMNS)?;
        }
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<()> {
        let line = cells
            .iter()
            .map(|c| csv_escape(c.as_ref()))
            .collect::<Vec<_>>()
            .join(",");

        writeln!(self.writer, "{line}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| sink_error("failed to write", &self.path, e))
    }
}

impl RecordSink for CsvSink {
    fn sink_id(&self) -> &str {
        "csv"
    }

    fn append(&mut self, record: &ExtractedRecord) -> Result<()> {
        let row = prepare_row(record, self.max_cell_length);
        self.write_line(row.cells())
    }
}

/// Quote a field when it holds a quote, comma or line break
fn csv_escape(s: &str) -> String {
    if s.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ExtractedRecord {
        ExtractedRecord {
            title: Some("Deep Learning for Proteins".to_string()),
            authors: "John Smith, Jane Doe".to_string(),
            date: None,
            conclusion: Some("We show \"strong\" results.\nMore later.".to_string()),
            github: Some("https://github.com/org/repo".to_string()),
            topics: vec!["protein folding".to_string(), "neural, network".to_string()],
        }
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_escape(""), "");
    }

    #[test]
    fn test_writes_header_then_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::open(&path, 10_000).unwrap();
        sink.append(&sample()).unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let expected = "title,date,authors,github,conclusion,topics\n\
                        Deep Learning for Proteins,,\"John Smith, Jane Doe\",https://github.com/org/repo,\
                        \"We show \"\"strong\"\" results.\nMore later.\",\"protein folding, neural, network\"\n";
        assert_eq!(content, expected);
    }

    #[test]
    fn test_reopen_appends_without_second_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        CsvSink::open(&path, 10_000).unwrap().append(&sample()).unwrap();
        let mut sink = CsvSink::open(&path, 10_000).unwrap();
        sink.append(&ExtractedRecord::default()).unwrap();
        assert_eq!(sink.path(), path.as_path());
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("title,date,authors").count(), 1);
        assert!(content.ends_with("\n,,,,,\n"));
    }

    #[test]
    fn test_truncates_conclusion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let record = ExtractedRecord {
            conclusion: Some("abcdefgh".to_string()),
            ..Default::default()
        };
        CsvSink::open(&path, 5).unwrap().append(&record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with(",,,,abcde...,\n"));
    }

    #[test]
    fn test_open_failure_is_sink_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = CsvSink::open(&path, 10).err().unwrap();
        assert!(matches!(err, papermeta_core::PapermetaError::SinkFailure(_)));
    }
}
