//! `## heading` → `<h2 id="…">` injection.
//!
//! The heading becomes literal HTML so the engine passes it through with its
//! id intact. The heading text is inserted as-is: inline markdown inside a
//! level-2 heading is not rendered.

use super::extract::H2_RE;
use super::slug::slugify;
use maud::{PreEscaped, html};
use regex::Captures;

pub fn inject_heading_ids(content: &str) -> String {
    H2_RE
        .replace_all(content, |caps: &Captures| {
            let text = caps[1].trim();
            html! {
                h2 id=(slugify(text)) { (PreEscaped(text)) }
            }
            .into_string()
        })
        .into_owned()
}
