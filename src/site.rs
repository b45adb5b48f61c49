//! Site build orchestration.
//!
//! ```text
//! 1. Clean    dist/ is deleted and recreated
//! 2. Discover pages/*.md
//! 3. Pages    markdown → ParsedPage → template → (minify) → dist/<name>.html
//! 4. Assets   assets/** → dist/assets/**
//! 5. CSS      template/styles.css → (minify) → dist/styles.css
//! ```
//!
//! Pages are built in parallel on the rayon pool; they share only the
//! immutable template, config and [`MarkdownEngine`]. A page that cannot be
//! read or written is reported in [`BuildReport::failures`] and the rest of
//! the site is still built. Problems that affect every page (unreadable
//! pages directory or template) abort the build.

use crate::config::{SiteConfig, SitePaths};
use crate::markdown::{self, MarkdownEngine};
use crate::minify;
use crate::pages;
use crate::template::{self, PageContext};
use crate::types::{PageSource, TocEntry};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Output name of the copied stylesheet.
pub const STYLESHEET_OUTPUT: &str = "styles.css";
/// Output directory of the copied assets.
pub const ASSETS_OUTPUT: &str = "assets";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read pages directory {path}: {source}")]
    Pages {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot read template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot copy assets: {0}")]
    Assets(#[from] walkdir::Error),
    #[error("Output directory {0} would contain its own input")]
    UnsafeOutput(PathBuf),
}

/// Why a single page failed.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A page written to the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltPage {
    pub source: PageSource,
    /// Title used in `<title>` (config override or markdown title).
    pub title: String,
    pub toc: Vec<TocEntry>,
    /// Size of the written HTML in bytes.
    pub bytes: usize,
}

#[derive(Debug)]
pub struct PageFailure {
    pub filename: String,
    pub error: PageError,
}

/// Outcome of [`build_site`].
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Successfully built pages, in discovery order.
    pub pages: Vec<BuiltPage>,
    pub failures: Vec<PageFailure>,
    pub assets_copied: usize,
    pub stylesheet_written: bool,
    pub output_dir: PathBuf,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Metadata of a page as `check` reports it, without writing anything.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub filename: String,
    pub output_path: String,
    pub title: String,
    pub toc: Vec<TocEntry>,
}

/// Build the whole site rooted at `root`.
pub fn build_site(root: &Path, config: &SiteConfig) -> Result<BuildReport, SiteError> {
    let paths = config.resolve_paths(root);
    guard_output(&paths)?;

    clean_output_dir(&paths.output)?;

    let sources = pages::discover_pages(&paths.pages, config).map_err(|source| SiteError::Pages {
        path: paths.pages.clone(),
        source,
    })?;
    info!(count = sources.len(), dir = %paths.pages.display(), "discovered pages");

    let template =
        template::load_template(&paths.template).map_err(|source| SiteError::Template {
            path: paths.template.clone(),
            source,
        })?;

    let engine = MarkdownEngine::new(config.markdown.gfm);
    let year = template::current_year();

    let results: Vec<Result<BuiltPage, PageFailure>> = sources
        .par_iter()
        .map(|page| {
            build_page(page, &template, &engine, config, &paths, year).map_err(|error| {
                warn!(page = %page.filename, %error, "page failed");
                PageFailure {
                    filename: page.filename.clone(),
                    error,
                }
            })
        })
        .collect();

    let mut report = BuildReport {
        output_dir: paths.output.clone(),
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(page) => report.pages.push(page),
            Err(failure) => report.failures.push(failure),
        }
    }

    report.assets_copied = copy_assets(&paths.assets, &paths.output.join(ASSETS_OUTPUT))?;
    report.stylesheet_written = copy_stylesheet(
        &paths.stylesheet,
        &paths.output.join(STYLESHEET_OUTPUT),
        config.build.minify,
    )?;

    Ok(report)
}

/// Parse every page without writing output.
pub fn check_site(root: &Path, config: &SiteConfig) -> Result<Vec<PageSummary>, SiteError> {
    let paths = config.resolve_paths(root);
    let sources = pages::discover_pages(&paths.pages, config).map_err(|source| SiteError::Pages {
        path: paths.pages.clone(),
        source,
    })?;
    let engine = MarkdownEngine::new(config.markdown.gfm);

    sources
        .into_iter()
        .map(|page| -> Result<PageSummary, SiteError> {
            let content = fs::read_to_string(paths.pages.join(&page.filename))?;
            let parsed = markdown::parse_page(&content, &engine);
            Ok(PageSummary {
                title: page.title_override.unwrap_or(parsed.title),
                filename: page.filename,
                output_path: page.output_path,
                toc: parsed.toc,
            })
        })
        .collect()
}

fn build_page(
    page: &PageSource,
    template: &str,
    engine: &MarkdownEngine,
    config: &SiteConfig,
    paths: &SitePaths,
    year: i32,
) -> Result<BuiltPage, PageError> {
    let source_path = paths.pages.join(&page.filename);
    let content = fs::read_to_string(&source_path).map_err(|source| PageError::Read {
        path: source_path.clone(),
        source,
    })?;

    let parsed = markdown::parse_page(&content, engine);
    let title = page.title_override.clone().unwrap_or(parsed.title);
    let current_page = page.url();

    let context = PageContext {
        content: &parsed.html,
        title: &title,
        toc: &parsed.toc,
        current_page: &current_page,
        year,
    };
    let mut html = template::render_page(template, &context, config);
    if config.build.minify {
        html = minify::minify_html(&html);
    }

    let output_path = paths.output.join(&page.output_path);
    fs::write(&output_path, &html).map_err(|source| PageError::Write {
        path: output_path.clone(),
        source,
    })?;
    info!(page = %page.filename, output = %page.output_path, "built page");

    Ok(BuiltPage {
        source: page.clone(),
        title,
        toc: parsed.toc,
        bytes: html.len(),
    })
}

/// Refuse output directories that would delete the site's inputs on clean.
fn guard_output(paths: &SitePaths) -> Result<(), SiteError> {
    let inputs = [&paths.pages, &paths.assets, &paths.template, &paths.stylesheet];
    if inputs.iter().any(|input| input.starts_with(&paths.output)) {
        return Err(SiteError::UnsafeOutput(paths.output.clone()));
    }
    Ok(())
}

/// Delete and recreate the output directory.
pub fn clean_output_dir(dir: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Copy the assets tree into the output. Returns the number of files copied.
///
/// A missing assets directory is not an error; nothing is copied.
pub fn copy_assets(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    if !src.is_dir() {
        warn!(dir = %src.display(), "assets directory not found, skipping");
        return Ok(0);
    }

    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    debug!(copied, "copied assets");
    Ok(copied)
}

/// Copy the stylesheet, minified when requested. Returns whether it existed.
pub fn copy_stylesheet(src: &Path, dst: &Path, minify_css: bool) -> Result<bool, SiteError> {
    if !src.is_file() {
        warn!(file = %src.display(), "stylesheet not found, skipping");
        return Ok(false);
    }
    let mut css = fs::read_to_string(src)?;
    if minify_css {
        css = minify::minify_css(&css);
    }
    fs::write(dst, css)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn builds_all_fixture_pages() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        let report = build_site(tmp.path(), &config).unwrap();

        assert!(report.is_success());
        assert_eq!(built_outputs(&report), vec!["index.html", "profile.html"]);
        assert!(tmp.path().join("dist/index.html").is_file());
        assert!(tmp.path().join("dist/profile.html").is_file());
    }

    #[test]
    fn config_title_overrides_markdown_title() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        let report = build_site(tmp.path(), &config).unwrap();

        let index = find_built_page(&report, "index.md");
        assert_eq!(index.title, "bidri");
        let html = read_output(tmp.path(), "index.html");
        assert!(html.contains("<title>bidri</title>"));
    }

    #[test]
    fn markdown_title_used_without_override() {
        let tmp = setup_fixtures();
        let mut config = load_fixture_config(tmp.path());
        config.page_titles.clear();
        let report = build_site(tmp.path(), &config).unwrap();

        assert_eq!(find_built_page(&report, "profile.md").title, "Profile");
    }

    #[test]
    fn sidebar_only_on_pages_with_two_headings() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        build_site(tmp.path(), &config).unwrap();

        let profile = read_output(tmp.path(), "profile.html");
        assert!(profile.contains("toc-sidebar"));
        assert!(profile.contains("has-sidebar"));

        let index = read_output(tmp.path(), "index.html");
        assert!(!index.contains("toc-sidebar"));
    }

    #[test]
    fn nav_marks_current_page() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        build_site(tmp.path(), &config).unwrap();

        let index = read_output(tmp.path(), "index.html");
        assert!(index.contains(r#"<a href="/" class="active">Home</a>"#));
        let profile = read_output(tmp.path(), "profile.html");
        assert!(profile.contains(r#"<a href="/profile.html" class="active">Profile</a>"#));
    }

    #[test]
    fn assets_and_stylesheet_copied() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        let report = build_site(tmp.path(), &config).unwrap();

        assert_eq!(report.assets_copied, 2);
        assert!(tmp.path().join("dist/assets/icon.svg").is_file());
        assert!(tmp.path().join("dist/assets/img/banner.svg").is_file());
        assert!(report.stylesheet_written);
        assert!(tmp.path().join("dist/styles.css").is_file());
    }

    #[test]
    fn minify_applies_to_html_and_css() {
        let tmp = setup_fixtures();
        let mut config = load_fixture_config(tmp.path());
        config.build.minify = true;
        build_site(tmp.path(), &config).unwrap();

        let html = read_output(tmp.path(), "index.html");
        assert!(!html.contains("<!--"));
        assert!(html.starts_with("<!DOCTYPE html><html lang=\"ja\">"));
        let css = read_output(tmp.path(), "styles.css");
        assert!(!css.contains("/*"));
        assert!(!css.contains('\n'));
    }

    #[test]
    fn stale_output_removed() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        fs::create_dir_all(tmp.path().join("dist")).unwrap();
        fs::write(tmp.path().join("dist/stale.html"), "old").unwrap();

        build_site(tmp.path(), &config).unwrap();
        assert!(!tmp.path().join("dist/stale.html").exists());
    }

    #[test]
    fn missing_template_aborts_build() {
        let tmp = setup_fixtures();
        let mut config = load_fixture_config(tmp.path());
        config.paths.template = "template/missing.html".into();
        let err = build_site(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, SiteError::Template { .. }));
    }

    #[test]
    fn missing_pages_dir_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let err = build_site(tmp.path(), &SiteConfig::default()).unwrap_err();
        assert!(matches!(err, SiteError::Pages { .. }));
    }

    #[test]
    fn output_containing_inputs_rejected() {
        let tmp = setup_fixtures();
        let mut config = load_fixture_config(tmp.path());
        config.paths.output = "template".into();
        let err = build_site(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, SiteError::UnsafeOutput(_)));
        assert!(tmp.path().join("template/template.html").is_file());
    }

    #[test]
    fn unreadable_page_does_not_stop_other_pages() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        // Invalid UTF-8 fails read_to_string without needing permissions.
        fs::write(tmp.path().join("pages/broken.md"), [0xff, 0xfe, 0x00]).unwrap();

        let report = build_site(tmp.path(), &config).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "broken.md");
        assert!(matches!(report.failures[0].error, PageError::Read { .. }));
        assert_eq!(report.pages.len(), 2);
    }

    #[test]
    fn missing_assets_dir_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let copied = copy_assets(&tmp.path().join("none"), &tmp.path().join("out")).unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn missing_stylesheet_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let written =
            copy_stylesheet(&tmp.path().join("none.css"), &tmp.path().join("out.css"), false)
                .unwrap();
        assert!(!written);
    }

    #[test]
    fn check_reports_pages_without_writing() {
        let tmp = setup_fixtures();
        let config = load_fixture_config(tmp.path());
        let summaries = check_site(tmp.path(), &config).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].filename, "index.md");
        assert_eq!(summaries[0].title, "bidri");
        assert_eq!(summaries[1].toc.len(), 3);
        assert!(!tmp.path().join("dist").exists());
    }
}
