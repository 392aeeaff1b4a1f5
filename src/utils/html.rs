//! CMS HTML helpers
//!
//! WordPress returns titles and excerpts as rendered HTML fragments. Listing
//! pages show them as plain text, so tags are dropped and the handful of
//! entities WordPress emits are decoded.

use regex::Regex;
use std::sync::OnceLock;

/// Entities decoded by `strip_html`, applied in this order
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#039;", "'"),
];

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern"))
}

/// Remove HTML tags and decode basic entities
///
/// Decoding is sequential, so `&amp;lt;` ends up as `<`.
pub fn strip_html(html: &str) -> String {
    let mut text = tag_pattern().replace_all(html, "").into_owned();
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text
}

/// Plain-text excerpt: first `max_chars` characters followed by "..."
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_html(html);
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}
