//! Shared types passed between the markdown core, the template step and the
//! build orchestrator.

use serde::{Deserialize, Serialize};

/// One level-2 heading, used for the in-page navigation sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Slug of `text`; also the `id` of the rendered `<h2>`.
    pub id: String,
    /// Heading text, trimmed.
    pub text: String,
    /// Always 2.
    pub level: u8,
}

/// Result of converting one markdown page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPage {
    pub html: String,
    /// First `#` heading, else first `##` heading, else `"Untitled"`.
    pub title: String,
    pub toc: Vec<TocEntry>,
}

/// A markdown file found in the pages directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSource {
    /// File name including `.md`, e.g. `profile.md`.
    pub filename: String,
    /// File name of the generated page, e.g. `profile.html`.
    pub output_path: String,
    /// Title from config; wins over the title found in the markdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_override: Option<String>,
}

impl PageSource {
    /// Site-root URL of the generated page (`/profile.html`).
    pub fn url(&self) -> String {
        format!("/{}", self.output_path)
    }
}

/// Site navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavItem {
    pub href: String,
    pub label: String,
    /// Internal links can be marked active; external ones open in a new tab.
    #[serde(default = "default_internal")]
    pub internal: bool,
}

fn default_internal() -> bool {
    true
}
