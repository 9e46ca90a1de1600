//! papermeta Parser - Plain-text extraction from paper files
//!
//! Supports extraction from:
//! - PDF documents
//! - Microsoft Word (DOCX)
//!
//! Each parser implements the `DocumentParser` trait and produces
//! a `ParsedDocument` whose `content` is the decoded text handed to the
//! metadata extraction pipeline. Layout and structure are not preserved
//! beyond line breaks.

use std::path::Path;
use thiserror::Error;

pub mod docx;
pub mod pdf;

pub use docx::DocxParser;
pub use pdf::PdfParser;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during text extraction
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF parsing error
    #[error("PDF parsing error: {0}")]
    PdfError(String),

    /// DOCX parsing error
    #[error("DOCX parsing error: {0}")]
    DocxError(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Parsed Document Types
// ============================================================================

/// A parsed document with extracted content
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Original file path
    pub file_path: String,

    /// Detected file type
    pub file_type: FileType,

    /// Extracted text content
    pub content: String,

    /// Metadata gathered during extraction
    pub metadata: DocumentParseMetadata,
}

impl ParsedDocument {
    /// Create a new parsed document
    pub fn new(file_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            content: String::new(),
            metadata: DocumentParseMetadata::default(),
        }
    }

    /// Set content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether extraction produced any non-whitespace text
    pub fn has_text(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Metadata extracted during parsing
#[derive(Debug, Clone, Default)]
pub struct DocumentParseMetadata {
    /// Number of pages
    pub page_count: Option<u32>,

    /// Number of paragraphs
    pub paragraph_count: Option<u32>,

    /// Word count
    pub word_count: Option<u32>,
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for document parsers
pub trait DocumentParser: Send + Sync {
    /// Parse a document from a file path
    fn parse(&self, path: &Path) -> Result<ParsedDocument>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

/// Read a whole file, tagging IO failures with the path
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ParserError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with the PDF and DOCX parsers installed
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfParser::new());
        registry.register(DocxParser::new());
        registry
    }

    /// Register a parser
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a file type
    pub fn find_parser(&self, file_type: FileType) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(file_type))
            .map(|p| p.as_ref())
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let file_type = FileType::from_path(path);

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let parser = self
            .find_parser(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        tracing::debug!(path = %path.display(), %file_type, "extracting text");
        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("pdf"), FileType::Pdf);
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("docx"), FileType::Docx);
        assert_eq!(FileType::from_extension("doc"), FileType::Unknown);
        assert_eq!(FileType::from_extension("txt"), FileType::Unknown);
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(
            FileType::from_path(&PathBuf::from("papers/attention.Pdf")),
            FileType::Pdf
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("notes.v2.docx")),
            FileType::Docx
        );
        assert_eq!(FileType::from_path(&PathBuf::from("README")), FileType::Unknown);
    }

    #[test]
    fn test_registry_rejects_unknown_extension() {
        let registry = ParserRegistry::with_defaults();
        let err = registry.parse(&PathBuf::from("paper.txt")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat(ref ext) if ext == "txt"));

        let err = registry.parse(&PathBuf::from("paper")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat(ref ext) if ext == "none"));
    }

    #[test]
    fn test_registry_finds_parsers() {
        let registry = ParserRegistry::with_defaults();
        assert!(registry.find_parser(FileType::Pdf).is_some());
        assert!(registry.find_parser(FileType::Docx).is_some());
        assert!(registry.find_parser(FileType::Unknown).is_none());
        assert!(ParserRegistry::new().find_parser(FileType::Pdf).is_none());
    }

    #[test]
    fn test_registry_reports_io_error() {
        let registry = ParserRegistry::with_defaults();
        let err = registry
            .parse(&PathBuf::from("/no/such/dir/paper.pdf"))
            .unwrap_err();
        assert!(matches!(err, ParserError::IoError { .. }));
    }

    #[test]
    fn test_parsed_document_text_checks() {
        let doc = ParsedDocument::new("a.pdf", FileType::Pdf).with_content("  \n\t ");
        assert!(!doc.has_text());

        let doc = doc.with_content("Graph Neural Networks\nAlice Liddell");
        assert!(doc.has_text());
    }
}
