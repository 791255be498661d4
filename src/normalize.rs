//! Extraction of a single HTML document from free-form provider output.
//!
//! Providers are asked for raw HTML but often wrap it in markdown fences,
//! prepend prose, or both. The strategy is layered: the best structural match
//! wins, and every step only applies when it finds something.

use regex::Regex;

use crate::types::GeneratedDocument;

lazy_static::lazy_static! {
    static ref HTML_FENCE: Regex = Regex::new(r"(?is)```html(.*?)```").unwrap();
    static ref ANY_FENCE: Regex = Regex::new(r"(?s)```(.*?)```").unwrap();
    static ref DOCTYPE_SPAN: Regex = Regex::new(r"(?is)<!DOCTYPE html>.*</html>").unwrap();
    static ref HTML_SPAN: Regex = Regex::new(r"(?is)<html.*</html>").unwrap();
}

/// Normalize raw provider text into a document.
///
/// Total: text with no recognisable structure comes back trimmed but
/// otherwise unchanged, which may be empty.
pub fn normalize(raw: &str) -> GeneratedDocument {
    let mut working = raw;

    if let Some(interior) = HTML_FENCE
        .captures(working)
        .or_else(|| ANY_FENCE.captures(working))
        .and_then(|captures| captures.get(1))
    {
        working = interior.as_str();
    }

    if let Some(span) = document_span(working) {
        working = span;
    }

    // Stripping stray markers can join a document span that was split by
    // them, so look for one again.
    let cleaned = working.replace("```html", "").replace("```", "");
    let document = document_span(&cleaned).unwrap_or(cleaned.as_str());
    GeneratedDocument::new(document.trim())
}

/// Widest `<!DOCTYPE html>…</html>` span, else widest `<html…</html>` span.
fn document_span(text: &str) -> Option<&str> {
    DOCTYPE_SPAN
        .find(text)
        .or_else(|| HTML_SPAN.find(text))
        .map(|span| span.as_str())
}
