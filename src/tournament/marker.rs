//! Tournament marker validation.
//!
//! A marker is a 10-character alphanumeric identifier whose first six
//! characters encode the event date as YYMMDD. The surrounding system owns
//! the marker's meaning; the engine only validates its format as part of
//! the close gate.

use chrono::NaiveDate;

use crate::errors::{EngineError, EngineResult};

/// Normalize a raw marker: trim, uppercase, strip inner whitespace.
///
/// Returns `None` if nothing remains.
pub fn normalize_marker(raw: &str) -> Option<String> {
    let s: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if s.is_empty() { None } else { Some(s) }
}

/// Format the event date as the expected six-character marker prefix (YYMMDD).
pub fn event_date_to_marker_prefix(event_date: NaiveDate) -> String {
    event_date.format("%y%m%d").to_string()
}

/// Validate a marker against the event date and return its normalized form.
///
/// Rules: exactly 10 characters, A-Z/0-9 only, starting with the event
/// date's YYMMDD prefix.
pub fn validate_marker_for_event_date(
    marker: &str,
    event_date: NaiveDate,
) -> EngineResult<String> {
    let normalized = normalize_marker(marker).ok_or_else(|| {
        EngineError::InvalidArgument("marker is empty".to_string())
    })?;

    if normalized.chars().count() != 10 {
        return Err(EngineError::InvalidArgument(
            "marker must be exactly 10 characters (YYMMDDxxxx)".to_string(),
        ));
    }
    if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(EngineError::InvalidArgument(
            "marker may only contain letters and digits".to_string(),
        ));
    }

    let prefix = event_date_to_marker_prefix(event_date);
    if !normalized.starts_with(&prefix) {
        return Err(EngineError::InvalidArgument(format!(
            "marker must start with the event date: {prefix}xxxx (YYMMDDxxxx)"
        )));
    }

    Ok(normalized)
}
