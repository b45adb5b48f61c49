//! Metadata extraction: page title and table of contents.
//!
//! Both functions read the normalised source text, never the pre-processed
//! output, so container expansion cannot hide or invent headings.

use super::slug::slugify;
use crate::types::TocEntry;
use regex::Regex;
use std::sync::LazyLock;

/// Title used when a page has neither a level-1 nor a level-2 heading.
pub const UNTITLED: &str = "Untitled";

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*)$").expect("h1 pattern is valid"));

pub(crate) static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+(\S.*)$").expect("h2 pattern is valid"));

/// Resolve the page title.
///
/// First `# heading` wins; otherwise the first `## heading`; otherwise
/// [`UNTITLED`]. Only the first match at each level is consulted.
pub fn extract_title(content: &str) -> String {
    H1_RE
        .captures(content)
        .or_else(|| H2_RE.captures(content))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Collect one [`TocEntry`] per `## heading`, in source order.
///
/// Duplicate heading text produces duplicate ids; nothing de-duplicates them.
pub fn table_of_contents(content: &str) -> Vec<TocEntry> {
    H2_RE
        .captures_iter(content)
        .map(|caps| {
            let text = caps[1].trim().to_string();
            TocEntry {
                id: slugify(&text),
                text,
                level: 2,
            }
        })
        .collect()
}
