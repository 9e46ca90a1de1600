//! Title detection

use crate::document_lines;

/// The first line of the document is the title when it is longer than
/// `min_len` characters. A short first line (a running header, a page
/// number) yields no title; later lines are never considered.
pub fn detect_title(text: &str, min_len: usize) -> Option<String> {
    let first = document_lines(text).next()?;
    if first.chars().count() > min_len {
        Some(first.to_string())
    } else {
        None
    }
}
