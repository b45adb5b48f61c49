//! Textual path and link rewrites applied before parsing.

use regex::Regex;
use std::sync::LazyLock;

/// External address the `./side-oripathy` cross-reference points to.
pub const SIDE_ORIPATHY_URL: &str = "https://bi9dri.github.io/emoklore-arknights-side-oripathy/";

static ASSET_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(\./assets/").expect("image pattern is valid"));

static SIDE_ORIPATHY_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(\./side-oripathy\)").expect("link pattern is valid")
});

/// Make `./assets/` image destinations site-root relative (`/assets/`).
///
/// Only the exact `./assets/` prefix is recognised.
pub fn rewrite_image_paths(content: &str) -> String {
    ASSET_IMAGE_RE
        .replace_all(content, "![${1}](/assets/")
        .into_owned()
}

/// Point `[text](./side-oripathy)` at [`SIDE_ORIPATHY_URL`].
///
/// This is one hard-coded cross-reference, not a link resolver; every other
/// relative link is left alone.
pub fn rewrite_links(content: &str) -> String {
    SIDE_ORIPATHY_LINK_RE
        .replace_all(content, format!("[${{1}}]({SIDE_ORIPATHY_URL})").as_str())
        .into_owned()
}
