//! Care-date extraction
//!
//! Evaluates the registered field path against a resource instance and
//! normalizes the result to a UTC instant. Path evaluation here is plain
//! dotted field access over JSON objects; no expression language.

use crate::paths::care_date_path;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Resolve a dotted field path against a resource instance.
///
/// Returns zero-or-one scalar value; any missing or non-object step along
/// the way resolves to None.
pub fn resolve_path<'a>(resource: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = resource;
    for component in path.split('.') {
        current = current.as_object()?.get(component)?;
    }
    Some(current)
}

/// The canonical care date of a resource instance.
///
/// None when the resource's type has no registered path, the path does not
/// resolve, or the value does not parse as a date. Never an error; the
/// range filter treats undated entries as always-retained.
pub fn care_date(resource: &Value) -> Option<DateTime<Utc>> {
    let resource_type = resource.get("resourceType")?.as_str()?;
    let path = care_date_path(resource_type)?;
    let text = resolve_path(resource, path)?.as_str()?;

    let parsed = parse_instant(text);
    if parsed.is_none() {
        debug!(resource_type, path, value = text, "unparseable care date");
    }
    parsed
}

/// Parse a date or date-time string into a UTC instant.
///
/// Accepts full offset date-times, offset-less date-times (read as UTC),
/// and partial dates, which widen to their first instant.
pub(crate) fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }

    let date = match s.len() {
        4 => NaiveDate::parse_from_str(&format!("{}-01-01", s), "%Y-%m-%d").ok()?,
        7 => NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()?,
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?,
        _ => return None,
    };

    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}
