//! Display formatting helpers.

use chrono::{DateTime, Utc};

/// Date format used on every screen, e.g. "Jan 01, 2023".
pub const DATE_FORMAT: &str = "%b %d, %Y";

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace all but the last `visible` characters with `*`.
pub fn mask_sensitive_data(data: &str, visible: usize) -> String {
    let len = data.chars().count();
    let masked = len.saturating_sub(visible);
    data.chars()
        .enumerate()
        .map(|(i, c)| if i < masked { '*' } else { c })
        .collect()
}
