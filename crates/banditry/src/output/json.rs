//! JSON serialization for reports and sweep summaries.

use serde::Serialize;

use crate::error::Result;

/// Serialize a report to a compact JSON string.
///
/// # Errors
///
/// [`crate::Error::Json`] if serialization fails, which does not happen for
/// the report types of this crate.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// # Errors
///
/// As [`to_json`].
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
