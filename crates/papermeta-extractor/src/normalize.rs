//! Character filter applied to author strings

/// Keep only ASCII letters, commas and whitespace.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ',' || c.is_whitespace())
        .collect()
}
