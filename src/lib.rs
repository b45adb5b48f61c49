//! # mdsite
//!
//! A small static site generator: one markdown file per page, one shared
//! HTML template, a handful of custom block containers.
//!
//! # Pipeline
//!
//! Each page goes through the same pure transformation before it touches the
//! filesystem:
//!
//! ```text
//! markdown ─┬─ title (first #, else first ##, else "Untitled")
//!           ├─ TOC   (every ##, slugified ids)
//!           └─ html  rewrite ./assets/ → /assets/
//!                    rewrite ./side-oripathy links
//!                    expand :::containers
//!                    inject <h2 id="…">
//!                    CommonMark/GFM render
//! ```
//!
//! [`site::build_site`] runs that for every page in parallel, fills the
//! template, and copies assets and the stylesheet into the output directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markdown`] | Title/TOC extraction, preprocessing passes, extensible markdown engine |
//! | [`template`] | Placeholder substitution, navigation and TOC sidebar rendering with Maud |
//! | [`pages`] | Discovers `pages/*.md` and maps them to output files |
//! | [`site`] | Build orchestration: clean, render pages, copy assets and CSS |
//! | [`minify`] | Regex-based HTML and CSS minification |
//! | [`serve`] | Static file server for previewing the output |
//! | [`config`] | `config.toml` loading, merging onto defaults, and validation |
//! | [`types`] | Shared data types (`ParsedPage`, `TocEntry`, `NavItem`, `PageSource`) |
//! | [`output`] | CLI output formatting for build and check |
//!
//! # Design Decisions
//!
//! ## Total markdown core
//!
//! [`markdown::parse_page`] never fails. Malformed containers stay literal
//! text, missing headings give `"Untitled"` and an empty TOC. All fallible
//! work (reading pages, writing output) lives in [`site`], where one bad page
//! is reported without stopping the rest of the build.
//!
//! ## Configuration over constants
//!
//! Page title overrides and navigation links come from `config.toml`, so the
//! same binary builds any site with this layout. See [`config`].

pub mod config;
pub mod markdown;
pub mod minify;
pub mod output;
pub mod pages;
pub mod serve;
pub mod site;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
