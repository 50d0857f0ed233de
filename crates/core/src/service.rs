//! Dashboard service: the patient store plus its refresh lifecycle.

use crate::config::CoreConfig;
use crate::loader::{DatasetSource, LoadOutcome, RemoteLoader};
use crate::stats::{kpi_snapshot, KpiSnapshot, StatsReport};
use crate::store::PatientStore;
use crate::validation::validate_sheets_url;
use crate::DashboardResult;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;

/// Result of swapping freshly loaded data into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RefreshReport {
    pub outcome: LoadOutcome,
    pub patients_count: usize,
}

/// Owns the patient store, the current dataset source and the loader.
///
/// Cheap to clone; clones share the same store and source.
#[derive(Clone, Debug)]
pub struct DashboardService {
    store: PatientStore,
    source: Arc<RwLock<DatasetSource>>,
    loader: RemoteLoader,
    /// Serialises first loads; held across the fetch, so it is an async mutex.
    first_load: Arc<tokio::sync::Mutex<()>>,
}

impl DashboardService {
    /// Creates a service with an empty, not yet loaded store.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_source(cfg.dataset_source())
    }

    pub fn with_source(source: DatasetSource) -> Self {
        Self {
            store: PatientStore::new(),
            source: Arc::new(RwLock::new(source)),
            loader: RemoteLoader::new(),
            first_load: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    /// The dataset source currently in use.
    pub fn source(&self) -> DatasetSource {
        self.source.read().clone()
    }

    /// Reloads from the current source and replaces the store contents.
    ///
    /// Never fails: a failed fetch replaces the store with the sample dataset. The store lock is
    /// only taken for the final swap.
    pub async fn refresh(&self) -> RefreshReport {
        let source = self.source();
        let report = self.loader.load(&source).await;
        let patients_count = self
            .store
            .replace_all_with_columns(report.records, report.columns);

        tracing::info!(
            "refreshed patient data: {} patients ({})",
            patients_count,
            report.outcome
        );

        RefreshReport {
            outcome: report.outcome,
            patients_count,
        }
    }

    /// Performs the first load if nothing has populated the store yet.
    ///
    /// Concurrent callers wait for a first load already in flight instead of starting another one,
    /// so exactly one of them gets `Some`.
    pub async fn ensure_loaded(&self) -> Option<RefreshReport> {
        if self.store.is_loaded() {
            return None;
        }
        let _guard = self.first_load.lock().await;
        if self.store.is_loaded() {
            return None;
        }
        Some(self.refresh().await)
    }

    /// Points the service at a new spreadsheet and reloads from it.
    ///
    /// # Errors
    ///
    /// `DashboardError::InvalidSource` if `url` is blank or not a spreadsheet URL. The current
    /// source and data are kept in that case.
    pub async fn set_source_url(&self, url: &str) -> DashboardResult<RefreshReport> {
        let url = validate_sheets_url(url)?;
        {
            let mut source = self.source.write();
            let updated = source.with_url(url);
            *source = updated;
        }
        tracing::info!("dataset source updated to {}", self.source().url());
        Ok(self.refresh().await)
    }

    /// Every statistic over the current contents.
    pub fn stats(&self, today: NaiveDate) -> StatsReport {
        StatsReport::compute(&self.store.snapshot(), today)
    }

    pub fn kpis(&self, today: NaiveDate) -> KpiSnapshot {
        kpi_snapshot(&self.store.snapshot(), today)
    }
}
