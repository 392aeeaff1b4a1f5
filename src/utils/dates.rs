//! Italian date formatting for post bylines

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const MONTHS_IT: [&str; 12] = [
    "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno",
    "luglio", "agosto", "settembre", "ottobre", "novembre", "dicembre",
];

/// Format a CMS date as "19 ottobre 2026"
///
/// Accepts RFC 3339 (`2026-10-19T08:30:00+02:00`), the naive WordPress
/// `date` field (`2026-10-19T08:30:00`) or a bare date. Anything else is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw.trim()) {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_IT[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
