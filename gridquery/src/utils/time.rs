//! Time utility functions

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Parse an RFC 3339 timestamp string to DateTime<Utc>
///
/// Returns `None` for anything that is not a full RFC 3339 timestamp, so
/// plain strings like `"Hari"` or `"2019-01-01"` stay strings.
pub fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Format a DateTime<Utc> as RFC 3339 with a `Z` suffix
///
/// Fractional seconds are only emitted when present.
pub fn format_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Add whole days to a timestamp, saturating at the representable range
pub fn add_days(dt: &DateTime<Utc>, days: i64) -> DateTime<Utc> {
    dt.checked_add_signed(Duration::days(days)).unwrap_or_else(|| {
        tracing::warn!(%dt, days, "Timestamp overflow, keeping original");
        *dt
    })
}
