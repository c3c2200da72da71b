//! Chronological ordering for journal entries.

use chrono::NaiveDate;

/// Ordering key for an entry date string.
///
/// Parses `YYYY-MM-DD`; anything unparsable maps to the epoch so malformed
/// dates sink deterministically to the start of a chronological listing
/// instead of failing the read. Combined with a stable sort, entries sharing
/// a key keep their insertion order.
pub fn date_key(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").unwrap_or_default()
}
