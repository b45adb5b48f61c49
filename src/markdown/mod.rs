//! Markdown → HTML for one page.
//!
//! [`parse_page`] is the only entry point. It runs two independent passes
//! over the same source text:
//!
//! ```text
//!                 ┌─► extract_title ──────────────┐
//! source ─► CRLF ─┼─► table_of_contents ──────────┼─► ParsedPage
//!                 └─► image paths ─► links ─►      │
//!                     containers ─► heading ids ─► engine
//! ```
//!
//! The pre-processing steps are order dependent: containers are expanded
//! before heading ids are injected, and both run before the engine. They are
//! private to this module so nothing can call them out of order.
//!
//! Every step is a total function over text. Malformed custom syntax is left
//! as literal text; a page without headings is titled [`UNTITLED`].
//!
//! | Module | Role |
//! |--------|------|
//! | `slug` | Heading id derivation shared by the TOC and heading injection |
//! | `extract` | Title and table of contents |
//! | `rewrite` | `./assets/` images and the `./side-oripathy` link |
//! | `container` | `:::type` blocks and their renderers |
//! | `heading` | `## text` → `<h2 id>` |
//! | `engine` | pulldown-cmark wrapper with block extensions |

mod container;
pub mod engine;
mod extract;
mod heading;
mod rewrite;
mod slug;

pub use engine::{BlockExtension, BlockToken, ContainerExtension, MarkdownEngine};
pub use extract::{UNTITLED, extract_title, table_of_contents};
pub use rewrite::SIDE_ORIPATHY_URL;
pub use slug::slugify;

use crate::types::ParsedPage;
use tracing::debug;

/// Convert one markdown document to HTML plus its title and TOC.
pub fn parse_page(content: &str, engine: &MarkdownEngine) -> ParsedPage {
    let source = normalize_line_endings(content);

    let title = extract_title(&source);
    let toc = table_of_contents(&source);
    debug!(%title, headings = toc.len(), "extracted page metadata");

    let html = engine.render(&preprocess(&source));

    ParsedPage { html, title, toc }
}

fn preprocess(source: &str) -> String {
    let text = rewrite::rewrite_image_paths(source);
    let text = rewrite::rewrite_links(&text);
    let text = container::expand_containers(&text);
    heading::inject_heading_ids(&text)
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
