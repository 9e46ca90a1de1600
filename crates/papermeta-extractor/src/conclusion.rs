//! Conclusion section extraction
//!
//! Finds the first "Conclusion" heading (case-insensitive), takes the text up
//! to the next blank line, drops the heading line and keeps the leading
//! sentences. Reading stops at the first sentence that mentions the
//! acknowledgments or references section.

use once_cell::sync::Lazy;
use regex::Regex;

static CONCLUSION_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Conclusion[\s\S]+?(?:\n\n|\z)").unwrap());

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Substrings that end the conclusion (case-sensitive)
pub const STOP_MARKERS: [&str; 2] = ["Acknowledgments", "References"];

/// Extract up to `max_sentences` sentences of the conclusion.
///
/// Returns `None` when no conclusion heading is found, or when nothing is
/// left after the heading and the stop markers have been applied.
pub fn extract_conclusion(text: &str, max_sentences: usize) -> Option<String> {
    let section = CONCLUSION_SECTION.find(text)?.as_str();

    let body = section.split('\n').skip(1).collect::<Vec<_>>().join(" ");
    let body = body.trim();

    let kept: Vec<&str> = split_sentences(body)
        .into_iter()
        .take_while(|sentence| !STOP_MARKERS.iter().any(|m| sentence.contains(m)))
        .take(max_sentences)
        .collect();

    let conclusion = kept.join(" ");
    if conclusion.is_empty() {
        None
    } else {
        Some(conclusion)
    }
}

/// Split after `.`, `!` or `?` when followed by whitespace. The punctuation
/// stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}
