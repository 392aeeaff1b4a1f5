//! Display labels and placeholders derived from field names
//!
//! Field names follow the plugin convention `your-<thing>`. Two labelling
//! schemes are in use: a title-cased derivation (optionally translated to
//! Italian) for forms rendered from the schema or markup, and a fixed lookup
//! used by the public JSON form API.

/// Title-case translations for the schema-driven form
static TITLE_TRANSLATIONS: &[(&str, &str)] = &[
    ("Name", "Nome"),
    ("Surname", "Cognome"),
    ("Address", "Indirizzo"),
    ("City", "Città"),
    ("Phone", "Telefono"),
    ("Email", "Email"),
];

/// Fixed labels for the public form API
static PUBLIC_LABELS: &[(&str, &str)] = &[
    ("your-name", "Nome"),
    ("your-surname", "Cognome"),
    ("your-email", "Email"),
    ("your-phone", "Telefono"),
    ("your-address", "Indirizzo"),
    ("your-city", "Città"),
    ("your-message", "Messaggio"),
];

/// Fixed placeholders for the public form API
static PUBLIC_PLACEHOLDERS: &[(&str, &str)] = &[
    ("your-name", "Il tuo nome"),
    ("your-surname", "Il tuo cognome"),
    ("your-email", "la-tua-email@esempio.com"),
    ("your-phone", "Il tuo numero di telefono"),
    ("your-address", "Il tuo indirizzo"),
    ("your-city", "La tua città"),
    ("your-message", "Il tuo messaggio..."),
];

pub const EMAIL_PLACEHOLDER: &str = "la-tua-email@esempio.com";
pub const PHONE_PLACEHOLDER: &str = "+39 123 456 7890";

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// "your-postal-code" -> "Postal Code"
///
/// Drops a leading `your-`, turns every dash into a space and upper-cases
/// each character that starts a word.
pub fn title_case_label(name: &str) -> String {
    let stem = name.strip_prefix("your-").unwrap_or(name).replace('-', " ");

    let mut label = String::with_capacity(stem.len());
    let mut prev_is_word = false;
    for c in stem.chars() {
        if is_word_char(c) && !prev_is_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        prev_is_word = is_word_char(c);
    }
    label
}

/// Title-case label with the Italian translations applied
pub fn translated_label(name: &str) -> String {
    let label = title_case_label(name);
    match lookup(TITLE_TRANSLATIONS, &label) {
        Some(translated) => translated.to_string(),
        None => label,
    }
}

/// Label for the public API: fixed table, else a light cleanup of the name
///
/// The fallback only replaces the first `your-` and the first dash.
pub fn public_label(name: &str) -> String {
    if let Some(label) = lookup(PUBLIC_LABELS, name) {
        return label.to_string();
    }
    name.replacen("your-", "", 1).replacen('-', " ", 1)
}

/// Placeholder for the public API (empty when unknown)
pub fn public_placeholder(name: &str) -> String {
    lookup(PUBLIC_PLACEHOLDERS, name).unwrap_or_default().to_string()
}
