//! Project link detection

use once_cell::sync::Lazy;
use regex::Regex;

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://github\.com/\S+").unwrap());

/// First GitHub URL in the text, running up to the next whitespace.
///
/// Trailing punctuation is part of the match: "github.com/org/repo." keeps
/// its period.
pub fn find_github_link(text: &str) -> Option<String> {
    GITHUB_URL.find(text).map(|m| m.as_str().to_string())
}
