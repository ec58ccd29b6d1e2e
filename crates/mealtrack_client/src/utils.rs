//! Date normalization helpers for loosely-formatted meal documents.

/// Normalize a date string to YYYY-MM-DD.
///
/// Accepts:
/// - YYYY-MM-DD (returned as-is)
/// - RFC3339 datetime (date part extracted)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS (date part extracted)
pub fn normalize_date_str(s: &str) -> Option<String> {
    if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        return Some(s.to_string());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date().format("%Y-%m-%d").to_string());
    }
    None
}
