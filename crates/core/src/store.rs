//! In-memory patient store.
//!
//! Records are kept in order behind a single exclusive lock, so every operation is atomic with
//! respect to every other one. Records are addressable two ways:
//!
//! - by **position**: the index in the current sequence. Removing a record shifts every later
//!   record down by one, so a previously returned index may afterwards point at a different
//!   record or be out of range.
//! - by [`RecordId`]: allocated when the record enters the store and never reused, so it stays
//!   valid across removals and bulk replacements of other records.

use crate::csv_codec::{parse_csv, write_csv_with_columns};
use crate::record::{PatientFields, PatientRecord, StoredPatient};
use crate::validation::validate_required_fields;
use crate::{DashboardError, DashboardResult};
use parking_lot::Mutex;
use std::sync::Arc;
use wardboard_uuid::RecordId;

#[derive(Debug, Default)]
struct StoreState {
    patients: Vec<StoredPatient>,
    /// Header order of the last bulk load, used to lay out exports.
    columns: Vec<String>,
    loaded: bool,
}

impl StoreState {
    fn position_of(&self, id: RecordId) -> DashboardResult<usize> {
        self.patients
            .iter()
            .position(|p| p.id == id)
            .ok_or(DashboardError::NotFound)
    }
}

/// Cloneable handle to the shared patient collection.
#[derive(Clone, Debug, Default)]
pub struct PatientStore {
    inner: Arc<Mutex<StoreState>>,
}

impl PatientStore {
    /// An empty store that has never been loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the whole collection for `records`, giving each a fresh [`RecordId`].
    ///
    /// Readers observe either the old or the new collection, never a mix.
    pub fn replace_all(&self, records: Vec<PatientRecord>) -> usize {
        self.replace_all_with_columns(records, Vec::new())
    }

    /// Like [`PatientStore::replace_all`], also remembering the column order of the source
    /// document so that exports reproduce it.
    pub fn replace_all_with_columns(
        &self,
        records: Vec<PatientRecord>,
        columns: Vec<String>,
    ) -> usize {
        let patients: Vec<StoredPatient> = records
            .into_iter()
            .map(|record| StoredPatient {
                id: RecordId::new(),
                record,
            })
            .collect();
        let count = patients.len();

        let mut state = self.inner.lock();
        state.patients = patients;
        state.columns = columns;
        state.loaded = true;
        count
    }

    /// True once any bulk load or import has populated the store.
    pub fn is_loaded(&self) -> bool {
        self.inner.lock().loaded
    }

    pub fn len(&self) -> usize {
        self.inner.lock().patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records in order, with `admitDate` normalised to `YYYY-MM-DD`.
    pub fn list(&self) -> Vec<StoredPatient> {
        self.inner
            .lock()
            .patients
            .iter()
            .map(|p| StoredPatient {
                id: p.id,
                record: p.record.normalized(),
            })
            .collect()
    }

    /// Raw copy of the current records, for statistics.
    pub fn snapshot(&self) -> Vec<PatientRecord> {
        self.inner
            .lock()
            .patients
            .iter()
            .map(|p| p.record.clone())
            .collect()
    }

    /// The record at `index`.
    ///
    /// # Errors
    ///
    /// `DashboardError::NotFound` when `index` is past the end.
    pub fn get(&self, index: usize) -> DashboardResult<StoredPatient> {
        let state = self.inner.lock();
        state
            .patients
            .get(index)
            .map(|p| StoredPatient {
                id: p.id,
                record: p.record.normalized(),
            })
            .ok_or(DashboardError::NotFound)
    }

    /// The record with stable identifier `id`, together with its current index.
    pub fn get_by_id(&self, id: RecordId) -> DashboardResult<(usize, StoredPatient)> {
        let state = self.inner.lock();
        let index = state.position_of(id)?;
        let p = &state.patients[index];
        Ok((
            index,
            StoredPatient {
                id: p.id,
                record: p.record.normalized(),
            },
        ))
    }

    /// Appends a new record and returns its index and identifier.
    ///
    /// # Errors
    ///
    /// `DashboardError::Validation` naming the first required field that is absent or null. The
    /// store is not modified in that case.
    pub fn insert(&self, fields: &PatientFields) -> DashboardResult<(usize, RecordId)> {
        validate_required_fields(fields)?;

        let stored = StoredPatient {
            id: RecordId::new(),
            record: PatientRecord::from_fields(fields),
        };
        let id = stored.id;

        let mut state = self.inner.lock();
        state.patients.push(stored);
        Ok((state.patients.len() - 1, id))
    }

    /// Merges `fields` into the record at `index`.
    ///
    /// Required fields are not re-validated, so an update may clear one.
    pub fn update(&self, index: usize, fields: &PatientFields) -> DashboardResult<()> {
        let mut state = self.inner.lock();
        let patient = state
            .patients
            .get_mut(index)
            .ok_or(DashboardError::NotFound)?;
        patient.record.merge(fields);
        Ok(())
    }

    /// Merges `fields` into the record with identifier `id`.
    pub fn update_by_id(&self, id: RecordId, fields: &PatientFields) -> DashboardResult<()> {
        let mut state = self.inner.lock();
        let index = state.position_of(id)?;
        state.patients[index].record.merge(fields);
        Ok(())
    }

    /// Removes and returns the record at `index`. Every later record moves down one position.
    pub fn remove(&self, index: usize) -> DashboardResult<StoredPatient> {
        let mut state = self.inner.lock();
        if index >= state.patients.len() {
            return Err(DashboardError::NotFound);
        }
        Ok(state.patients.remove(index))
    }

    /// Removes and returns the record with identifier `id`.
    pub fn remove_by_id(&self, id: RecordId) -> DashboardResult<StoredPatient> {
        let mut state = self.inner.lock();
        let index = state.position_of(id)?;
        Ok(state.patients.remove(index))
    }

    /// Serialises the whole collection, extension fields included, to CSV text.
    ///
    /// Columns follow the header order of the last bulk load, then any column added since.
    pub fn export_csv(&self) -> DashboardResult<String> {
        let (columns, records) = {
            let state = self.inner.lock();
            let records: Vec<PatientRecord> =
                state.patients.iter().map(|p| p.record.clone()).collect();
            (state.columns.clone(), records)
        };
        write_csv_with_columns(&columns, &records)
    }

    /// Replaces the collection with the rows of a CSV document and returns the new count.
    ///
    /// # Errors
    ///
    /// - `DashboardError::Schema` listing every missing required column.
    /// - `DashboardError::Csv` if the document is malformed.
    ///
    /// The store is left untouched on error.
    pub fn import_csv(&self, text: &str) -> DashboardResult<usize> {
        let parsed = parse_csv(text)?;

        let missing = parsed.missing_columns();
        if !missing.is_empty() {
            return Err(DashboardError::Schema { missing });
        }

        let columns = parsed.columns();
        Ok(self.replace_all_with_columns(parsed.records, columns))
    }
}
