//! Small text helpers for keyword and library documentation.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes a multi-line literal the way a text block would.
///
/// A blank first and last line are dropped, the common indentation of the
/// non-blank lines is removed, blank lines become empty, and a line ending in a
/// backslash is joined with the next one.
pub fn trim_as_text_block(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    // indentation is counted in chars, whitespace may be multi-byte
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| match l.char_indices().nth(indent) {
            Some((start, _)) if !l.trim().is_empty() => &l[start..],
            _ => "",
        })
        .collect::<Vec<_>>()
        .join("\n")
        .replace("\\\n", "")
}

/// Trims and folds every run of whitespace into one space.
pub fn fold_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Applies `transform` unless `text` is blank, which yields an empty string.
pub fn if_not_blank<F>(text: &str, transform: F) -> String
where
    F: FnOnce(&str) -> String,
{
    if text.trim().is_empty() {
        String::new()
    } else {
        transform(text)
    }
}
