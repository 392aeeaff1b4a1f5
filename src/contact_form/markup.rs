//! Shortcode markup parser
//!
//! Form markup from the list endpoint looks like
//! `<label> Nome [text* your-name placeholder "Mario"] </label>`.
//! Each `[kind(*) name options...]` tag becomes a field.

use regex::Regex;
use std::sync::OnceLock;

use super::labels::title_case_label;
use super::{FieldKind, FormField};

struct KindPattern {
    kind: FieldKind,
    regex: Regex,
}

fn kind_patterns() -> &'static [KindPattern] {
    static PATTERNS: OnceLock<Vec<KindPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FieldKind::ALL
            .into_iter()
            .map(|kind| KindPattern {
                kind,
                regex: Regex::new(&format!(r"\[{}(\*?)\s+([^\]]+)\]", kind.as_str()))
                    .expect("static field pattern"),
            })
            .collect()
    })
}

fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r#"placeholder\s+"([^"]+)""#).expect("static placeholder pattern")
    })
}

/// Extract fields from shortcode markup
///
/// Fields are grouped by kind (text, email, tel, textarea, select, checkbox,
/// radio) and appear in document order within each kind.
pub fn parse_form_markup(markup: &str) -> Vec<FormField> {
    let mut fields = Vec::new();

    for pattern in kind_patterns() {
        for caps in pattern.regex.captures_iter(markup) {
            let required = &caps[1] == "*";
            let config = &caps[2];
            let name = config.split(' ').next().unwrap_or_default();

            let placeholder = placeholder_pattern()
                .captures(config)
                .map(|p| p[1].to_string());

            fields.push(FormField {
                name: name.to_string(),
                kind: pattern.kind,
                label: title_case_label(name),
                required,
                placeholder,
            });
        }
    }

    fields
}
