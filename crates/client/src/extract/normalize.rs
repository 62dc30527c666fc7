//! Text normalization for extracted elements.
//!
//! Prose blocks (headings, paragraphs, alerts) collapse every whitespace run to
//! a single space. Code keeps its internal layout and is only trimmed.

use scraper::ElementRef;

/// Concatenated text of all descendant text nodes.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an element with leading/trailing whitespace removed.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    element_text(element).trim().to_string()
}

/// Text of an element with whitespace runs collapsed and the ends trimmed.
pub fn normalized_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element_text(element))
}

/// Collapse internal whitespace runs (including newlines) to one space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
