//! Input validation utilities.
//!
//! Checks applied to caller-supplied values before they reach the store or the loader.

use crate::constants::{REQUIRED_COLUMNS, SHEETS_URL_PREFIX};
use crate::{DashboardError, DashboardResult, NonEmptyText};
use serde_json::Value;

/// Validates that `url` looks like a spreadsheet CSV export URL.
///
/// # Errors
///
/// Returns `DashboardError::InvalidSource` if the URL is blank or does not start with
/// [`SHEETS_URL_PREFIX`].
pub fn validate_sheets_url(url: &str) -> DashboardResult<NonEmptyText> {
    let url = NonEmptyText::new(url)
        .map_err(|_| DashboardError::InvalidSource("URL is required".into()))?;

    if !url.as_str().starts_with(SHEETS_URL_PREFIX) {
        return Err(DashboardError::InvalidSource(
            "Invalid Google Sheets URL".into(),
        ));
    }

    Ok(url)
}

/// Checks that every required field is present and non-null.
///
/// Fields are checked in [`REQUIRED_COLUMNS`] order and the first missing one is reported.
pub fn validate_required_fields(fields: &serde_json::Map<String, Value>) -> DashboardResult<()> {
    for field in REQUIRED_COLUMNS {
        match fields.get(field) {
            None | Some(Value::Null) => return Err(DashboardError::Validation { field }),
            Some(_) => {}
        }
    }
    Ok(())
}

/// Returns the required columns absent from `headers`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_required_columns(headers: &[&str]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.contains(required))
        .map(|c| (*c).to_string())
        .collect()
}
