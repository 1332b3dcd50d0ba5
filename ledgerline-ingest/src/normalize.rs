//! Line normalization: raw extracted text into clean, non-empty lines.

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on any line-ending convention and keep only non-empty, collapsed lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}
