//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so
//! a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! pages = "pages"                      # Directory of *.md pages
//! assets = "assets"                    # Copied to <output>/assets/
//! template = "template/template.html"  # Shared page template
//! stylesheet = "template/styles.css"   # Copied to <output>/styles.css
//! output = "dist"
//!
//! [build]
//! minify = false
//! max_threads = 4           # Omit for auto = CPU cores
//!
//! [markdown]
//! gfm = true                # Tables, strikethrough, task lists
//!
//! [site]
//! toc_title = "目次"         # Heading of the table-of-contents sidebar
//!
//! [page_titles]             # <title> overrides, keyed by page file name
//! "index.md" = "My Site"
//!
//! [[nav]]
//! href = "/"
//! label = "Home"
//! internal = true
//!
//! [serve]
//! interface = "127.0.0.1"
//! port = 3000
//! ```
//!
//! Tables merge key by key; arrays (`nav`) replace the default entirely.
//! Unknown keys are rejected to catch typos early.

use crate::types::NavItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the site root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Replaces what would otherwise be process-wide constant tables (page
/// titles, navigation) with one value passed to the build and template steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input and output locations, relative to the site root.
    pub paths: PathsConfig,
    /// Build behaviour (minification, parallelism).
    pub build: BuildConfig,
    /// Markdown engine options.
    pub markdown: MarkdownConfig,
    /// Site-wide text.
    pub site: SiteInfo,
    /// `<title>` overrides keyed by page file name (`"index.md"`).
    pub page_titles: BTreeMap<String, String>,
    /// Navigation links, in display order.
    pub nav: Vec<NavItem>,
    /// Development server settings.
    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            build: BuildConfig::default(),
            markdown: MarkdownConfig::default(),
            site: SiteInfo::default(),
            page_titles: BTreeMap::new(),
            nav: vec![NavItem {
                href: "/".to_string(),
                label: "Home".to_string(),
                internal: true,
            }],
            serve: ServeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("paths.pages", &self.paths.pages),
            ("paths.assets", &self.paths.assets),
            ("paths.template", &self.paths.template),
            ("paths.stylesheet", &self.paths.stylesheet),
            ("paths.output", &self.paths.output),
        ];
        for (key, value) in paths {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.paths.output.trim() == "." {
            return Err(ConfigError::Validation(
                "paths.output must not be the site root".into(),
            ));
        }
        for item in &self.nav {
            if item.label.trim().is_empty() || item.href.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "nav entries need a non-empty href and label".into(),
                ));
            }
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must not be 0".into()));
        }
        if self.build.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "build.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Title override for a page file, if configured.
    pub fn page_title(&self, filename: &str) -> Option<&str> {
        self.page_titles.get(filename).map(String::as_str)
    }

    /// Resolve the configured paths against the site root.
    pub fn resolve_paths(&self, root: &Path) -> SitePaths {
        SitePaths {
            pages: root.join(&self.paths.pages),
            assets: root.join(&self.paths.assets),
            template: root.join(&self.paths.template),
            stylesheet: root.join(&self.paths.stylesheet),
            output: root.join(&self.paths.output),
        }
    }
}

/// Input and output locations as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub pages: String,
    pub assets: String,
    pub template: String,
    pub stylesheet: String,
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pages: "pages".to_string(),
            assets: "assets".to_string(),
            template: "template/template.html".to_string(),
            stylesheet: "template/styles.css".to_string(),
            output: "dist".to_string(),
        }
    }
}

/// [`PathsConfig`] joined onto the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub pages: PathBuf,
    pub assets: PathBuf,
    pub template: PathBuf,
    pub stylesheet: PathBuf,
    pub output: PathBuf,
}

/// Build settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Minify generated HTML and the copied stylesheet.
    pub minify: bool,
    /// Maximum number of pages built in parallel.
    /// When absent, defaults to the number of CPU cores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &BuildConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Markdown engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// GitHub-flavoured extensions: tables, strikethrough, task lists.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Site-wide text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Heading of the table-of-contents sidebar.
    pub toc_title: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            toc_title: "目次".to_string(),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub interface: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILE))
}

/// Load config from an explicit file path. A missing file yields defaults.
pub fn load_config_file(config_path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mdsite Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables are merged with the defaults key by key; the [[nav]] list
# replaces the default list entirely. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Input and output locations (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
# Directory holding one .md file per page. index.md becomes index.html.
pages = "pages"

# Copied recursively to <output>/assets/.
assets = "assets"

# Shared HTML template. Placeholders: {{TITLE}} {{CONTENT}} {{NAV}}
# {{TOC}} {{BODY_CLASS}} {{YEAR}}
template = "template/template.html"

# Copied to <output>/styles.css.
stylesheet = "template/styles.css"

# Output directory. Deleted and recreated on every build.
output = "dist"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Minify generated HTML and the stylesheet.
minify = false

# Maximum pages built in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4

# ---------------------------------------------------------------------------
# Markdown
# ---------------------------------------------------------------------------
[markdown]
# GitHub-flavoured extensions: tables, strikethrough, task lists.
gfm = true

# ---------------------------------------------------------------------------
# Site text
# ---------------------------------------------------------------------------
[site]
# Heading of the table-of-contents sidebar (shown for 2+ headings).
toc_title = "目次"

# ---------------------------------------------------------------------------
# <title> overrides, keyed by page file name.
# Pages without an entry use their first heading.
# ---------------------------------------------------------------------------
[page_titles]
# "index.md" = "My Site"

# ---------------------------------------------------------------------------
# Development server
# ---------------------------------------------------------------------------
[serve]
interface = "127.0.0.1"
port = 3000

# ---------------------------------------------------------------------------
# Navigation, in display order. External links open in a new tab.
# ---------------------------------------------------------------------------
[[nav]]
href = "/"
label = "Home"
internal = true
"##
}
