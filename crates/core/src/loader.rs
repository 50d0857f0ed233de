//! Remote dataset loading with total fallback.
//!
//! [`RemoteLoader::load`] never fails. Whatever goes wrong upstream (timeout, refused connection,
//! error status, malformed or incomplete CSV) is folded into a [`LoadOutcome`] and the built-in
//! sample dataset is returned in place of the remote rows. The loader only performs the fetch; the
//! caller decides when to swap the result into the store, so no lock is held while the request is
//! in flight.

use crate::csv_codec::parse_csv;
use crate::record::PatientRecord;
use crate::sample::sample_patients;
use crate::NonEmptyText;
use std::fmt;
use std::time::Duration;

/// Where patient data is fetched from, and how long a fetch may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSource {
    url: NonEmptyText,
    timeout: Duration,
}

impl DatasetSource {
    pub fn new(url: NonEmptyText, timeout: Duration) -> Self {
        Self { url, timeout }
    }

    pub fn url(&self) -> &NonEmptyText {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same timeout, different location.
    pub fn with_url(&self, url: NonEmptyText) -> Self {
        Self {
            url,
            timeout: self.timeout,
        }
    }
}

/// Which path a load took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadOutcome {
    LoadedRemote,
    FallbackEmpty,
    FallbackMissingColumns,
    FallbackTransportError,
    FallbackParseError,
}

impl LoadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadOutcome::LoadedRemote => "loaded-remote",
            LoadOutcome::FallbackEmpty => "fallback-empty",
            LoadOutcome::FallbackMissingColumns => "fallback-missing-columns",
            LoadOutcome::FallbackTransportError => "fallback-transport-error",
            LoadOutcome::FallbackParseError => "fallback-parse-error",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, LoadOutcome::LoadedRemote)
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records produced by a load, always non-empty.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub records: Vec<PatientRecord>,
    /// Header order of the remote document; empty for the sample dataset.
    pub columns: Vec<String>,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    fn fallback(outcome: LoadOutcome) -> Self {
        Self {
            records: sample_patients(),
            columns: Vec::new(),
            outcome,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("response body is not valid UTF-8: {0}")]
    Encoding(std::string::FromUtf8Error),
}

/// Fetches a CSV document over HTTP and turns it into patient records.
#[derive(Clone, Debug, Default)]
pub struct RemoteLoader {
    client: reqwest::Client,
}

impl RemoteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the dataset at `source`, falling back to the sample dataset on any failure.
    pub async fn load(&self, source: &DatasetSource) -> LoadReport {
        tracing::info!("loading patient data from {}", source.url());

        match self.fetch(source).await {
            Ok(body) => Self::interpret(&body),
            Err(FetchError::Encoding(e)) => {
                tracing::warn!("could not decode dataset body: {e}; using sample data");
                LoadReport::fallback(LoadOutcome::FallbackParseError)
            }
            Err(e) => {
                tracing::warn!("error loading dataset: {e}; using sample data");
                LoadReport::fallback(LoadOutcome::FallbackTransportError)
            }
        }
    }

    /// Classifies a fetched CSV body. Anything other than a non-empty document with every
    /// required column is replaced by the sample dataset.
    pub fn interpret(body: &str) -> LoadReport {
        let parsed = match parse_csv(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("malformed dataset CSV: {e}; using sample data");
                return LoadReport::fallback(LoadOutcome::FallbackParseError);
            }
        };

        if parsed.headers.is_empty() || parsed.records.is_empty() {
            tracing::warn!("dataset returned no rows; using sample data");
            return LoadReport::fallback(LoadOutcome::FallbackEmpty);
        }

        let missing = parsed.missing_columns();
        if !missing.is_empty() {
            tracing::warn!("dataset is missing columns {:?}; using sample data", missing);
            return LoadReport::fallback(LoadOutcome::FallbackMissingColumns);
        }

        tracing::info!("loaded {} patients from remote dataset", parsed.records.len());
        LoadReport {
            columns: parsed.columns(),
            records: parsed.records,
            outcome: LoadOutcome::LoadedRemote,
        }
    }

    async fn fetch(&self, source: &DatasetSource) -> Result<String, FetchError> {
        let to_fetch_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(source.timeout())
            } else {
                FetchError::Transport(e)
            }
        };

        let response = self
            .client
            .get(source.url().as_str())
            .timeout(source.timeout())
            .send()
            .await
            .map_err(to_fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await.map_err(to_fetch_error)?;
        String::from_utf8(bytes.to_vec()).map_err(FetchError::Encoding)
    }
}
