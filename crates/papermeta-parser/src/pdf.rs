//! PDF document parser using pdf-extract
//!
//! Concatenates the text of every page into a single string.

use std::path::Path;

use crate::{
    read_bytes, DocumentParseMetadata, DocumentParser, FileType, ParsedDocument, ParserError,
    Result,
};

/// PDF document parser
pub struct PdfParser {
    /// Strip form feed page separators from the extracted text
    pub strip_page_breaks: bool,
}

impl PdfParser {
    /// Create a new PDF parser with default settings
    pub fn new() -> Self {
        Self {
            strip_page_breaks: true,
        }
    }

    /// Keep or strip form feed characters between pages
    pub fn with_page_breaks_stripped(mut self, enabled: bool) -> Self {
        self.strip_page_breaks = enabled;
        self
    }

    /// Extract text from in-memory PDF bytes
    pub fn extract_text(&self, bytes: &[u8]) -> Result<(String, Option<u32>)> {
        // pdf-extract panics on some malformed fonts and page trees
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|panic| {
                ParserError::PdfError(format!("decoder panicked: {}", panic_message(&*panic)))
            })?
            .map_err(|e| ParserError::PdfError(e.to_string()))?;

        // Rough page estimate based on form feed characters
        let page_count = page_count(&text);

        let text = if self.strip_page_breaks {
            text.replace('\x0C', "\n")
        } else {
            text
        };

        Ok((text, page_count))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

fn page_count(text: &str) -> Option<u32> {
    let breaks = text.matches('\x0C').count() as u32;
    if breaks > 0 {
        Some(breaks + 1)
    } else {
        None
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = read_bytes(path)?;
        let (text, page_count) = self.extract_text(&bytes)?;

        let metadata = DocumentParseMetadata {
            page_count,
            paragraph_count: None,
            word_count: Some(text.split_whitespace().count() as u32),
        };

        Ok(ParsedDocument {
            file_path: path.display().to_string(),
            file_type: FileType::Pdf,
            content: text,
            metadata,
        })
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_pdf_parser_creation() {
        let parser = PdfParser::new();
        assert!(parser.strip_page_breaks);

        let parser = parser.with_page_breaks_stripped(false);
        assert!(!parser.strip_page_breaks);
    }

    #[test]
    fn test_page_count_estimate() {
        assert_eq!(page_count("single page"), None);
        assert_eq!(page_count("one\x0Ctwo\x0Cthree"), Some(3));
    }

    #[test]
    fn test_garbage_bytes_are_a_pdf_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf").unwrap();

        let err = PdfParser::new().parse(file.path()).unwrap_err();
        assert!(matches!(err, ParserError::PdfError(_)));
    }

    /// Assemble a PDF from object bodies, computing the xref offsets
    fn build_pdf(objects: &[&str]) -> Vec<u8> {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = pdf.len();
        let header = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        pdf.extend_from_slice(header.as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_decoder_panic_becomes_pdf_error() {
        let content = "BT /F1 12 Tf 72 712 Td (Hello) Tj ET";
        let stream = format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len());

        // a page with no MediaBox whose content uses an undeclared font
        let pdf = build_pdf(&[
            "<< /Type /Catalog /Pages 2 0 R >>",
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>",
            "<< /Type /Page /Parent 2 0 R /Resources << >> /Contents 4 0 R >>",
            &stream,
        ]);

        let result = PdfParser::new().extract_text(&pdf);
        assert!(matches!(result, Err(ParserError::PdfError(_))));
    }

    #[test]
    fn test_supported_types() {
        let parser = PdfParser::new();
        assert!(parser.can_parse(FileType::Pdf));
        assert!(!parser.can_parse(FileType::Docx));
    }
}
