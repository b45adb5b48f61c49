//! Regex-based HTML and CSS minification.
//!
//! These are conservative whitespace and comment passes, not parsers. They do
//! not know about `<pre>` blocks or CSS strings; whitespace runs inside them
//! are collapsed too.

use regex::Regex;
use std::sync::LazyLock;

static HTML_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment pattern is valid"));
static BETWEEN_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("inter-tag pattern is valid"));
static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));
static CSS_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("css comment pattern is valid"));
static CSS_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,])\s*").expect("css punctuation pattern is valid"));

pub fn minify_html(html: &str) -> String {
    let html = HTML_COMMENT_RE.replace_all(html, "");
    let html = BETWEEN_TAGS_RE.replace_all(&html, "><");
    WHITESPACE_RUN_RE
        .replace_all(html.trim(), " ")
        .into_owned()
}

pub fn minify_css(css: &str) -> String {
    let css = CSS_COMMENT_RE.replace_all(css, "");
    let css = CSS_PUNCTUATION_RE.replace_all(&css, "$1");
    let css = css.replace(";}", "}");
    WHITESPACE_RUN_RE
        .replace_all(css.trim(), " ")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_comments_removed() {
        assert_eq!(minify_html("<p>a</p><!-- note\nmore --><p>b</p>"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn html_whitespace_between_tags_removed() {
        let html = "<html>\n  <body>\n    <p>Hi</p>\n  </body>\n</html>\n";
        assert_eq!(minify_html(html), "<html><body><p>Hi</p></body></html>");
    }

    #[test]
    fn html_text_whitespace_collapsed() {
        assert_eq!(minify_html("<p>one    two\n\nthree</p>"), "<p>one two three</p>");
    }

    #[test]
    fn html_single_spaces_kept() {
        assert_eq!(minify_html("<p>a b</p>"), "<p>a b</p>");
    }

    #[test]
    fn css_comments_and_spacing_removed() {
        let css = "/* header */\nbody {\n  color: red;\n  margin: 0 auto;\n}\n";
        assert_eq!(minify_css(css), "body{color:red;margin:0 auto}");
    }

    #[test]
    fn css_selector_lists_tightened() {
        assert_eq!(minify_css("h1 , h2 {\n  font-weight : bold ;\n}"), "h1,h2{font-weight:bold}");
    }

    #[test]
    fn css_multiline_comment_removed() {
        assert_eq!(minify_css("/*\n * a\n * b\n */a{b:c}"), "a{b:c}");
    }
}
