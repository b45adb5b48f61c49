//! CLI output formatting for the build and check commands.
//!
//! Output is information-first: each page leads with its positional index
//! and title, followed by `→` and the output file. The markdown source is
//! shown as secondary context on an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 bidri → index.html
//!     Source: index.md
//! 002 Profile - bidri → profile.html
//!     Source: profile.md
//!     Sections: 3
//!
//! Failed
//!     broken.md: cannot read pages/broken.md: stream did not contain valid UTF-8
//!
//! Built 2 pages, 2 assets, styles.css → dist
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Profile → profile.html
//!     Source: profile.md
//!     #profile Profile
//!     #contact Contact
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::site::{BuildReport, PageSummary};
use crate::types::TocEntry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 Title → file.html`
fn page_header(index: usize, title: &str, output: &str) -> String {
    format!("{} {} \u{2192} {}", format_index(index), title, output)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn toc_lines(toc: &[TocEntry], depth: usize) -> Vec<String> {
    toc.iter()
        .map(|entry| format!("{}#{} {}", indent(depth), entry.id, entry.text))
        .collect()
}

/// Format the result of a site build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in report.pages.iter().enumerate() {
            lines.push(page_header(i + 1, &page.title, &page.source.output_path));
            lines.push(format!("{}Source: {}", indent(1), page.source.filename));
            if !page.toc.is_empty() {
                lines.push(format!("{}Sections: {}", indent(1), page.toc.len()));
            }
        }
    }

    if !report.failures.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!("{}{}: {}", indent(1), failure.filename, failure.error));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let mut summary = format!(
        "Built {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.assets_copied, "asset"),
    );
    if report.stylesheet_written {
        summary.push_str(", styles.css");
    }
    summary.push_str(&format!(" \u{2192} {}", report.output_dir.display()));
    lines.push(summary);

    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

/// Format the pages found by `check`, with their table of contents.
pub fn format_check_output(pages: &[PageSummary]) -> Vec<String> {
    if pages.is_empty() {
        return vec!["No pages found".to_string()];
    }

    let mut lines = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        lines.push(page_header(i + 1, &page.title, &page.output_path));
        lines.push(format!("{}Source: {}", indent(1), page.filename));
        lines.extend(toc_lines(&page.toc, 1));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(pages: &[PageSummary]) {
    for line in format_check_output(pages) {
        println!("{}", line);
    }
}
