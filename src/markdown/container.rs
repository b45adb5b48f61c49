//! `:::type` container blocks.
//!
//! ```markdown
//! :::profile-header
//! ![icon](./assets/icon.png)
//! bidri
//! Hello there.
//! :::
//! ```
//!
//! A block opens with a line `:::<type>` and closes at the first following
//! line that is exactly `:::`. Containers do not nest; an inner opener is
//! simply part of the outer block's content.
//!
//! The renderers here are shared by the pre-pass ([`expand_containers`]) and
//! the engine-level [`ContainerExtension`](super::engine::ContainerExtension)
//! so a block renders the same way whichever path handles it.

use maud::{PreEscaped, html};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^:::([A-Za-z0-9_-]+)\n(.*?)\n:::$").expect("container pattern is valid")
});

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image pattern is valid"));

/// Container types with dedicated rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind<'a> {
    /// Icon, name and message card.
    ProfileHeader,
    /// A markdown list wrapped in a scrolling box.
    ScrollableList,
    /// Anything else: content wrapped in `div.container-<type>`.
    Other(&'a str),
}

impl<'a> ContainerKind<'a> {
    pub fn from_tag(tag: &'a str) -> Self {
        match tag {
            "profile-header" => Self::ProfileHeader,
            "scrollable-list" => Self::ScrollableList,
            other => Self::Other(other),
        }
    }
}

/// Replace every complete container block with its rendering.
///
/// Profile headers and generic containers become raw HTML. Scrollable lists
/// keep their markdown so the engine produces the list markup.
/// An opener without a matching `:::` line is left as literal text.
pub fn expand_containers(content: &str) -> String {
    CONTAINER_RE
        .replace_all(content, |caps: &Captures| {
            let body = &caps[2];
            match ContainerKind::from_tag(&caps[1]) {
                ContainerKind::ProfileHeader => render_profile_header(body),
                ContainerKind::ScrollableList => wrap_scrollable_list(body),
                ContainerKind::Other(tag) => render_generic(tag, body),
            }
        })
        .into_owned()
}

/// Render a profile card.
///
/// The image (`./assets/` made root relative) is the icon, the first
/// non-empty line after the image line is the name, and the remaining
/// non-empty lines form the message. The fragment is a single line of HTML
/// so the engine passes it through as one HTML block.
pub fn render_profile_header(content: &str) -> String {
    let (src, alt) = IMAGE_RE
        .captures(content)
        .map(|caps| (caps[2].replacen("./assets/", "/assets/", 1), caps[1].to_string()))
        .unwrap_or_default();

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let text_start = lines
        .iter()
        .position(|line| IMAGE_RE.is_match(line))
        .map_or(0, |idx| idx + 1);
    let text_lines = &lines[text_start.min(lines.len())..];

    let name = text_lines.first().copied().unwrap_or_default();
    let message = text_lines.get(1..).unwrap_or_default().join("\n");

    html! {
        div.profile-header {
            div.profile-icon-wrapper {
                img.profile-icon src=(src) alt=(alt);
                div.profile-name { (name) }
            }
            div.profile-message { (message) }
        }
    }
    .into_string()
}

/// Wrap list markdown in `div.scrollable-list`, leaving the list itself for
/// the engine. Blank lines around the content end the HTML blocks so the
/// list is parsed as markdown.
pub fn wrap_scrollable_list(content: &str) -> String {
    format!("<div class=\"scrollable-list\">\n\n{content}\n\n</div>")
}

/// Wrap already rendered list HTML in `div.scrollable-list`.
pub fn render_scrollable_list(list_html: &str) -> String {
    html! {
        div.scrollable-list { (PreEscaped(list_html)) }
    }
    .into_string()
}

/// Wrap raw content in `div.container-<tag>` without touching it.
///
/// The content sits on its own lines between the tags so line-anchored
/// passes (heading ids) still see its first and last lines.
pub fn render_generic(tag: &str, content: &str) -> String {
    html! {
        div class={ "container-" (tag) } { "\n" (PreEscaped(content)) "\n" }
    }
    .into_string()
}
