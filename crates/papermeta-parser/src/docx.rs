//! DOCX document parser using docx-rs
//!
//! Extracts body paragraph text from Microsoft Word documents, one line per
//! paragraph. Tables, headers and footers are skipped.

use std::path::Path;

use docx_rs::read_docx;

use crate::{
    read_bytes, DocumentParseMetadata, DocumentParser, FileType, ParsedDocument, ParserError,
    Result,
};

/// DOCX document parser
pub struct DocxParser {
    /// Drop paragraphs that contain no text
    pub skip_empty_paragraphs: bool,
}

impl DocxParser {
    /// Create a new DOCX parser with default settings
    pub fn new() -> Self {
        Self {
            skip_empty_paragraphs: false,
        }
    }

    /// Enable or disable skipping of empty paragraphs
    pub fn with_empty_paragraphs_skipped(mut self, enabled: bool) -> Self {
        self.skip_empty_paragraphs = enabled;
        self
    }

    /// Extract paragraph text from in-memory DOCX bytes
    pub fn extract_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let docx = read_docx(bytes).map_err(|e| ParserError::DocxError(e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(para) = child {
                let mut para_text = String::new();
                for child in &para.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for run_child in &run.children {
                            if let docx_rs::RunChild::Text(text) = run_child {
                                para_text.push_str(&text.text);
                            }
                        }
                    }
                }

                if self.skip_empty_paragraphs && para_text.trim().is_empty() {
                    continue;
                }
                paragraphs.push(para_text);
            }
        }

        Ok(paragraphs)
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for DocxParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = read_bytes(path)?;
        let paragraphs = self.extract_paragraphs(&bytes)?;
        let content = paragraphs.join("\n");

        let metadata = DocumentParseMetadata {
            page_count: None,
            paragraph_count: Some(paragraphs.len() as u32),
            word_count: Some(content.split_whitespace().count() as u32),
        };

        Ok(ParsedDocument {
            file_path: path.display().to_string(),
            file_type: FileType::Docx,
            content,
            metadata,
        })
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Docx]
    }
}
