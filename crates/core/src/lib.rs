//! # Wardboard Core
//!
//! Core business logic for the hospital dashboard backend.
//!
//! This crate contains the data operations only:
//! - Patient records held in an in-memory, lock-guarded store
//! - Loading the dataset from a published spreadsheet CSV, with a built-in sample fallback
//! - CSV import/export
//! - Aggregate statistics and headline KPIs
//! - Static chart configuration
//!
//! **No API concerns**: HTTP servers, request parsing and response shapes belong in `api-rest`
//! and `api-shared`.

pub mod charts;
pub mod config;
pub mod constants;
pub mod csv_codec;
pub mod error;
pub mod loader;
pub mod record;
pub mod sample;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use config::CoreConfig;
pub use error::{DashboardError, DashboardResult};
pub use loader::{DatasetSource, LoadOutcome, LoadReport, RemoteLoader};
pub use record::{PatientFields, PatientRecord, StoredPatient};
pub use service::{DashboardService, RefreshReport};
pub use store::PatientStore;
pub use wardboard_types::{NonEmptyText, TextError};
pub use wardboard_uuid::RecordId;
