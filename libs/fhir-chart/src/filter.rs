//! Bundle range filtering by care date

use crate::resolve::care_date;
use chrono::{DateTime, Utc};
use galena_defs::Bundle;

/// Retain only bundle entries whose care date falls inside the given range
/// (start inclusive, end exclusive). The filter is advisory: entries whose
/// resource has no resolvable care date are always retained, and with both
/// bounds absent the bundle is left untouched.
pub fn filter_by_care_date(
    bundle: &mut Bundle,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) {
    if start.is_none() && end.is_none() {
        return;
    }

    let Some(entries) = bundle.entry.as_mut() else {
        return;
    };

    entries.retain(|entry| {
        let Some(resource) = entry.resource.as_ref() else {
            return true;
        };
        let Some(date) = care_date(resource) else {
            return true;
        };

        if start.is_some_and(|start| date < start) {
            return false;
        }
        if end.is_some_and(|end| date >= end) {
            return false;
        }
        true
    });
}
