//! Conversions between stored column values and in-memory types.
//!
//! Dates are persisted as millisecond Unix timestamps (`INTEGER`), string
//! lists as JSON arrays (`TEXT`).

use chrono::{DateTime, Utc};

/// Convert a stored millisecond timestamp into a date.
///
/// Returns `None` only when the timestamp is outside chrono's range.
pub fn timestamp_to_date(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Convert a date into a millisecond timestamp for storage.
pub fn date_to_timestamp(date: &DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

/// Current instant truncated to millisecond precision.
///
/// Entities built with this value compare equal after a storage round trip.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    timestamp_to_date(now.timestamp_millis()).unwrap_or(now)
}

/// Truncate any date to the precision the store keeps.
pub fn truncate_to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    timestamp_to_date(date.timestamp_millis()).unwrap_or(date)
}

/// Encode a string list for storage.
pub fn encode_string_list(items: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decode a stored string list.
///
/// Accepts the JSON array encoding and the older comma-joined text, so rows
/// written before the JSON encoding still load. An empty column is an empty
/// list.
pub fn decode_string_list(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }

    if stored.trim_start().starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(stored) {
            return items;
        }
        tracing::warn!("string list column is not a JSON array, decoding as legacy text");
    }

    stored.split(',').map(str::to_string).collect()
}
