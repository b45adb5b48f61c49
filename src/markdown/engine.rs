//! Markdown engine with pluggable block extensions.
//!
//! pulldown-cmark has no hook for custom block syntax, so [`MarkdownEngine`]
//! replaces each block a registered [`BlockExtension`] claims with a
//! placeholder HTML comment, renders the whole document in one pulldown-cmark
//! pass, then splices the extension output in place of the placeholders.
//! Link reference definitions therefore resolve across claimed blocks.
//!
//! Extensions are never consulted inside fenced code blocks.
//!
//! The engine holds no per-document state: build one, then share it between
//! threads for every page of a build.

use super::container::{self, ContainerKind};
use pulldown_cmark::{Options, Parser, html as md_html};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--mdsite-block-(\d+)-->\n?").expect("placeholder pattern is valid")
});

/// A block claimed by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken {
    /// Bytes of source consumed, including the trailing newline if any.
    pub raw_len: usize,
    /// Extension-defined block type (e.g. the container tag).
    pub kind: String,
    /// Block body.
    pub text: String,
}

/// Custom block-level syntax.
pub trait BlockExtension: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Cheap check: could a block of this extension start at `src[0]`?
    fn detect(&self, src: &str) -> bool;

    /// Claim a block at the start of `src`, or `None` if it is incomplete.
    fn tokenize(&self, src: &str) -> Option<BlockToken>;

    /// Render a claimed block to HTML.
    fn render(&self, token: &BlockToken, engine: &MarkdownEngine) -> String;
}

pub struct MarkdownEngine {
    options: Options,
    extensions: Vec<Box<dyn BlockExtension>>,
}

impl MarkdownEngine {
    /// Engine with the container extension registered.
    ///
    /// `gfm` turns on tables, strikethrough and task lists.
    pub fn new(gfm: bool) -> Self {
        Self::bare(gfm).with_extension(ContainerExtension)
    }

    /// Engine without any extensions.
    pub fn bare(gfm: bool) -> Self {
        let mut options = Options::empty();
        if gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        Self {
            options,
            extensions: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: impl BlockExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Render a markdown document to HTML.
    pub fn render(&self, src: &str) -> String {
        let mut markdown = String::with_capacity(src.len());
        let mut blocks: Vec<String> = Vec::new();
        let mut fence: Option<CodeFence> = None;
        let mut chunk_start = 0;
        let mut pos = 0;

        while pos < src.len() {
            let rest = &src[pos..];
            let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            let line = &rest[..line_len];

            if let Some(open) = fence {
                if open.is_closed_by(line) {
                    fence = None;
                }
            } else if let Some(open) = CodeFence::open(line) {
                fence = Some(open);
            } else if let Some((extension, token)) = self.claim(rest) {
                tracing::trace!(extension = extension.name(), kind = %token.kind, "block claimed");
                markdown.push_str(&src[chunk_start..pos]);
                markdown.push_str(&format!("\n<!--mdsite-block-{}-->\n\n", blocks.len()));
                blocks.push(extension.render(&token, self));
                pos += token.raw_len.max(1);
                chunk_start = pos;
                continue;
            }

            pos += line_len;
        }

        markdown.push_str(&src[chunk_start..]);

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        let parser = Parser::new_ext(&markdown, self.options);
        md_html::push_html(&mut html, parser);
        if blocks.is_empty() {
            return html;
        }

        PLACEHOLDER_RE
            .replace_all(&html, |caps: &Captures| {
                match caps[1].parse::<usize>().ok().and_then(|i| blocks.get(i)) {
                    Some(block) => format!("{block}\n"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn claim(&self, src: &str) -> Option<(&dyn BlockExtension, BlockToken)> {
        self.extensions
            .iter()
            .filter(|e| e.detect(src))
            .find_map(|e| e.tokenize(src).map(|token| (e.as_ref(), token)))
    }
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

/// An open ``` or ~~~ fence.
#[derive(Debug, Clone, Copy)]
struct CodeFence {
    marker: char,
    len: usize,
}

impl CodeFence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = strip_indent(line)?;
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(trimmed) = strip_indent(line) else {
            return false;
        };
        let len = trimmed.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && trimmed[len * self.marker.len_utf8()..].trim().is_empty()
    }
}

/// Strip up to three spaces of indentation; four or more is an indented
/// code line, not a fence.
fn strip_indent(line: &str) -> Option<&str> {
    let spaces = line.bytes().take_while(|b| *b == b' ').count();
    (spaces <= 3).then(|| &line[spaces..])
}

static CONTAINER_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A:::[A-Za-z0-9_-]+[ \t]*\n").expect("container open pattern is valid")
});

static CONTAINER_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A:::([A-Za-z0-9_-]+)[ \t]*\n(.*?)\n[ \t]*:::[ \t]*(?:\n|\z)")
        .expect("container block pattern is valid")
});

/// Block-level form of the `:::type` container syntax.
///
/// Tolerates trailing whitespace on the fences and an indented closing
/// fence, which the text pre-pass does not, and renders through the same
/// functions as the pre-pass.
pub struct ContainerExtension;

impl BlockExtension for ContainerExtension {
    fn name(&self) -> &str {
        "container"
    }

    fn detect(&self, src: &str) -> bool {
        src.starts_with(":::") && CONTAINER_OPEN_RE.is_match(src)
    }

    fn tokenize(&self, src: &str) -> Option<BlockToken> {
        let caps = CONTAINER_BLOCK_RE.captures(src)?;
        Some(BlockToken {
            raw_len: caps.get(0)?.end(),
            kind: caps[1].to_string(),
            text: caps[2].to_string(),
        })
    }

    fn render(&self, token: &BlockToken, engine: &MarkdownEngine) -> String {
        match ContainerKind::from_tag(&token.kind) {
            ContainerKind::ProfileHeader => container::render_profile_header(&token.text),
            ContainerKind::ScrollableList => {
                container::render_scrollable_list(&engine.render(&token.text))
            }
            ContainerKind::Other(tag) => container::render_generic(tag, &token.text),
        }
    }
}
