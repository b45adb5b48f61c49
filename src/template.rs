//! Template placeholder substitution.
//!
//! The site template is a plain HTML file with these placeholders:
//!
//! | Placeholder | Replaced with |
//! |-------------|---------------|
//! | `{{TITLE}}` | Page title (escaped) |
//! | `{{CONTENT}}` | Rendered page HTML (raw) |
//! | `{{NAV}}` | Navigation links |
//! | `{{TOC}}` | Table-of-contents sidebar, only for 2+ headings |
//! | `{{BODY_CLASS}}` | `has-sidebar` when the sidebar is shown |
//! | `{{YEAR}}` | Current year |
//!
//! Substitution is a single pass over the template, so placeholder-like text
//! inside page content is never expanded. Unknown placeholders are left as is.

use crate::config::SiteConfig;
use crate::types::{NavItem, TocEntry};
use chrono::Datelike;
use maud::{Markup, html};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// The sidebar is only worth showing with at least this many headings.
pub const TOC_MIN_ENTRIES: usize = 2;

/// Body class set when the TOC sidebar is rendered.
pub const SIDEBAR_BODY_CLASS: &str = "has-sidebar";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("placeholder pattern is valid"));

/// Everything the template needs for one page.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub content: &'a str,
    pub title: &'a str,
    pub toc: &'a [TocEntry],
    /// Site-root URL of the page being rendered, e.g. `/profile.html`.
    pub current_page: &'a str,
    pub year: i32,
}

pub fn load_template(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Fill the template's placeholders for one page.
pub fn render_page(template: &str, page: &PageContext<'_>, config: &SiteConfig) -> String {
    let show_toc = page.toc.len() >= TOC_MIN_ENTRIES;

    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "TITLE" => html! { (page.title) }.into_string(),
            "CONTENT" => page.content.to_string(),
            "NAV" => render_nav(&config.nav, page.current_page).into_string(),
            "TOC" if show_toc => render_toc(page.toc, &config.site.toc_title).into_string(),
            "TOC" => String::new(),
            "BODY_CLASS" if show_toc => SIDEBAR_BODY_CLASS.to_string(),
            "BODY_CLASS" => String::new(),
            "YEAR" => page.year.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Render the navigation links.
///
/// An internal item is active when its `href` is the current page, or when it
/// is `/` and the current page is `/index.html`. External items open in a
/// new tab.
pub fn render_nav(items: &[NavItem], current_page: &str) -> Markup {
    html! {
        @for item in items {
            @let is_active = item.internal
                && (item.href == current_page || (current_page == "/index.html" && item.href == "/"));
            @if item.internal {
                a href=(item.href) class=[is_active.then_some("active")] { (item.label) }
            } @else {
                a href=(item.href) target="_blank" rel="noopener noreferrer" { (item.label) }
            }
        }
    }
}

/// Render the table-of-contents sidebar, one list item per entry.
pub fn render_toc(toc: &[TocEntry], title: &str) -> Markup {
    html! {
        aside.toc-sidebar {
            nav.toc-nav {
                h3.toc-title { (title) }
                ul.toc-list {
                    @for entry in toc {
                        li { a href={ "#" (entry.id) } { (entry.text) } }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<title>{{TITLE}}</title><body class=\"{{BODY_CLASS}}\"><nav>{{NAV}}</nav>{{TOC}}<main>{{CONTENT}}</main><footer>{{YEAR}}</footer></body>";

    fn entry(id: &str, text: &str) -> TocEntry {
        TocEntry {
            id: id.into(),
            text: text.into(),
            level: 2,
        }
    }

    fn context<'a>(toc: &'a [TocEntry], current_page: &'a str) -> PageContext<'a> {
        PageContext {
            content: "<p>Body</p>",
            title: "Page",
            toc,
            current_page,
            year: 2026,
        }
    }

    fn nav_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.nav = vec![
            NavItem {
                href: "/".into(),
                label: "Home".into(),
                internal: true,
            },
            NavItem {
                href: "/profile.html".into(),
                label: "Profile".into(),
                internal: true,
            },
            NavItem {
                href: "https://example.com/".into(),
                label: "Elsewhere".into(),
                internal: false,
            },
        ];
        config
    }

    #[test]
    fn fills_all_placeholders() {
        let html = render_page(TEMPLATE, &context(&[], "/index.html"), &nav_config());
        assert!(html.contains("<title>Page</title>"));
        assert!(html.contains("<main><p>Body</p></main>"));
        assert!(html.contains("<footer>2026</footer>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn toc_hidden_below_two_entries() {
        let toc = [entry("one", "One")];
        let html = render_page(TEMPLATE, &context(&toc, "/index.html"), &nav_config());
        assert!(!html.contains("toc-sidebar"));
        assert!(html.contains("<body class=\"\">"));
    }

    #[test]
    fn toc_shown_for_two_entries() {
        let toc = [entry("one", "One"), entry("two", "Two")];
        let html = render_page(TEMPLATE, &context(&toc, "/index.html"), &nav_config());
        assert!(html.contains("toc-sidebar"));
        assert!(html.contains("<body class=\"has-sidebar\">"));
    }

    #[test]
    fn toc_lists_entries_in_order() {
        let toc = [entry("b", "Bee"), entry("a", "Ay"), entry("c", "Sea")];
        let html = render_toc(&toc, "目次").into_string();
        assert_eq!(html.matches("<li>").count(), 3);
        let b = html.find("href=\"#b\"").unwrap();
        let a = html.find("href=\"#a\"").unwrap();
        let c = html.find("href=\"#c\"").unwrap();
        assert!(b < a && a < c);
        assert!(html.contains("<h3 class=\"toc-title\">目次</h3>"));
    }

    #[test]
    fn toc_title_from_config() {
        let toc = [entry("a", "A"), entry("b", "B")];
        let mut config = nav_config();
        config.site.toc_title = "Contents".into();
        let html = render_page(TEMPLATE, &context(&toc, "/index.html"), &config);
        assert!(html.contains("Contents"));
    }

    #[test]
    fn home_active_on_index() {
        let html = render_nav(&nav_config().nav, "/index.html").into_string();
        assert!(html.contains(r#"<a href="/" class="active">Home</a>"#));
        assert!(html.contains(r#"<a href="/profile.html">Profile</a>"#));
    }

    #[test]
    fn current_page_marked_active() {
        let html = render_nav(&nav_config().nav, "/profile.html").into_string();
        assert!(html.contains(r#"<a href="/profile.html" class="active">Profile</a>"#));
        assert!(html.contains(r#"<a href="/">Home</a>"#));
    }

    #[test]
    fn external_links_open_new_tab_and_never_active() {
        let mut items = nav_config().nav;
        items[2].href = "/index.html".into();
        let html = render_nav(&items, "/index.html").into_string();
        assert!(html.contains(
            r#"<a href="/index.html" target="_blank" rel="noopener noreferrer">Elsewhere</a>"#
        ));
    }

    #[test]
    fn title_is_escaped() {
        let mut ctx = context(&[], "/index.html");
        ctx.title = "A & B";
        let html = render_page(TEMPLATE, &ctx, &nav_config());
        assert!(html.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn placeholders_in_content_not_expanded() {
        let mut ctx = context(&[], "/index.html");
        ctx.content = "<code>{{YEAR}}</code>";
        let html = render_page(TEMPLATE, &ctx, &nav_config());
        assert!(html.contains("<code>{{YEAR}}</code>"));
    }

    #[test]
    fn repeated_and_unknown_placeholders() {
        let html = render_page(
            "{{TITLE}}|{{TITLE}}|{{UNKNOWN}}",
            &context(&[], "/index.html"),
            &nav_config(),
        );
        assert_eq!(html, "Page|Page|{{UNKNOWN}}");
    }
}
