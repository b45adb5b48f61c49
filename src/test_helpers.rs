//! Shared test utilities for the mdsite test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = load_fixture_config(tmp.path());
//! let report = build_site(tmp.path(), &config).unwrap();
//!
//! assert_eq!(find_built_page(&report, "index.md").title, "bidri");
//! assert!(read_output(tmp.path(), "index.html").contains("<title>bidri</title>"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, SiteConfig};
use crate::site::{BuildReport, BuiltPage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture site's `config.toml`. Panics on error.
pub fn load_fixture_config(root: &Path) -> SiteConfig {
    config::load_config(root).unwrap_or_else(|e| panic!("fixture config invalid: {e}"))
}

// =========================================================================
// Build report lookups
// =========================================================================

/// Find a built page by source file name. Panics if not found.
pub fn find_built_page<'a>(report: &'a BuildReport, filename: &str) -> &'a BuiltPage {
    report
        .pages
        .iter()
        .find(|p| p.source.filename == filename)
        .unwrap_or_else(|| {
            let names: Vec<&str> = report
                .pages
                .iter()
                .map(|p| p.source.filename.as_str())
                .collect();
            panic!("page '{filename}' not built. Available: {names:?}")
        })
}

/// Output file names of all built pages, in build order.
pub fn built_outputs(report: &BuildReport) -> Vec<&str> {
    report
        .pages
        .iter()
        .map(|p| p.source.output_path.as_str())
        .collect()
}

/// Read a file from the fixture's `dist/` directory. Panics if missing.
pub fn read_output(root: &Path, rel: &str) -> String {
    let path = root.join("dist").join(rel);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
