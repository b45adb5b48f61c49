//! Heading slugs.
//!
//! Table-of-contents links and the `id` attributes injected into `<h2>`
//! elements both come from [`slugify`].
//!
//! Rules, applied in order:
//!
//! 1. Lower-case the text.
//! 2. Replace every run of whitespace with a single `-`.
//! 3. Drop every character that is not an ASCII word character
//!    (`[A-Za-z0-9_]`), a `-`, or Japanese script (Hiragana, Katakana,
//!    CJK Unified Ideographs).
//!
//! ```text
//! "Getting Started"   → "getting-started"
//! "What's new?"       → "whats-new"
//! "目次 テスト"        → "目次-テスト"
//! ```

/// Derive a heading id from heading text.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if is_slug_char(c) {
            slug.push(c);
        }
    }

    slug
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || matches!(c, '\u{3040}'..='\u{309F}')
        || matches!(c, '\u{30A0}'..='\u{30FF}')
        || matches!(c, '\u{4E00}'..='\u{9FFF}')
}
