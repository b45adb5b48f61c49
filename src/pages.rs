//! Page discovery.
//!
//! Every `.md` file directly inside the pages directory is one page. The
//! output name keeps the file stem:
//!
//! ```text
//! pages/index.md    → index.html
//! pages/profile.md  → profile.html
//! ```
//!
//! Subdirectories are not descended into. Pages are returned sorted by file
//! name so builds are deterministic regardless of directory order.

use crate::config::SiteConfig;
use crate::types::PageSource;
use std::fs;
use std::path::{Path, PathBuf};

/// List the markdown pages in `pages_dir`.
pub fn discover_pages(pages_dir: &Path, config: &SiteConfig) -> std::io::Result<Vec<PageSource>> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(pages_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p))
        .collect();

    md_files.sort();

    Ok(md_files
        .iter()
        .filter_map(|path| {
            let filename = path.file_name()?.to_string_lossy().into_owned();
            let stem = path.file_stem()?.to_string_lossy().into_owned();
            Some(PageSource {
                output_path: output_filename(&stem),
                title_override: config.page_title(&filename).map(str::to_string),
                filename,
            })
        })
        .collect())
}

/// `index` → `index.html`, `name` → `name.html`.
pub fn output_filename(stem: &str) -> String {
    format!("{stem}.html")
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
