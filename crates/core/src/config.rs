//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SHEETS_CSV_URL, MAX_FETCH_TIMEOUT_SECS};
use crate::loader::DatasetSource;
use crate::validation::validate_sheets_url;
use crate::{DashboardError, DashboardResult, NonEmptyText};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    sheets_url: NonEmptyText,
    fetch_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::InvalidConfig` if the timeout is zero.
    pub fn new(sheets_url: NonEmptyText, fetch_timeout: Duration) -> DashboardResult<Self> {
        if fetch_timeout.is_zero() {
            return Err(DashboardError::InvalidConfig(
                "fetch timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            sheets_url,
            fetch_timeout,
        })
    }

    /// Builds a configuration from optional raw values, as read from the environment.
    pub fn from_env_values(
        sheets_url: Option<String>,
        fetch_timeout_secs: Option<String>,
    ) -> DashboardResult<Self> {
        let sheets_url = sheets_url_from_env_value(sheets_url)?;
        let fetch_timeout = fetch_timeout_from_env_value(fetch_timeout_secs)?;
        Self::new(sheets_url, fetch_timeout)
    }

    pub fn sheets_url(&self) -> &NonEmptyText {
        &self.sheets_url
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// The dataset source the service starts with.
    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::new(self.sheets_url.clone(), self.fetch_timeout)
    }
}

/// Parse the sheets URL from an optional string value.
///
/// If `value` is `None` or blank, returns the default published sheet.
pub fn sheets_url_from_env_value(value: Option<String>) -> DashboardResult<NonEmptyText> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => validate_sheets_url(&v),
        None => Ok(NonEmptyText::new(DEFAULT_SHEETS_CSV_URL)?),
    }
}

/// Parse the fetch timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_FETCH_TIMEOUT_SECS`].
pub fn fetch_timeout_from_env_value(value: Option<String>) -> DashboardResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            DashboardError::InvalidConfig(format!("fetch timeout must be whole seconds, got '{v}'"))
        })?,
        None => DEFAULT_FETCH_TIMEOUT_SECS,
    };

    if !(1..=MAX_FETCH_TIMEOUT_SECS).contains(&secs) {
        return Err(DashboardError::InvalidConfig(format!(
            "fetch timeout must be between 1 and {MAX_FETCH_TIMEOUT_SECS} seconds"
        )));
    }

    Ok(Duration::from_secs(secs))
}
