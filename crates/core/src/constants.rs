//! Constants used throughout the Wardboard core crate.

/// Published CSV export of the default hospital spreadsheet.
pub const DEFAULT_SHEETS_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSyFf7QSGYYAawZk80QfL30IrehHkCaYGFsj9t8digpFhnOX6DKjRDDWIyARTy2xZF53Qekhp8QuckH/pub?gid=488215142&single=true&output=csv";

/// Every dataset source URL must start with this prefix.
pub const SHEETS_URL_PREFIX: &str = "https://docs.google.com/spreadsheets/";

/// Default bound on the remote CSV fetch, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Upper bound accepted for a configured fetch timeout, in seconds.
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 60;

/// Columns/fields every patient record must carry, in validation order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "doctor", "admitDate", "disease", "roomNo"];

/// JSON key under which the stable record identifier is exposed. Reserved in payloads.
pub const RECORD_ID_KEY: &str = "recordId";

/// Filename offered for CSV exports.
pub const EXPORT_FILENAME: &str = "patients_export.csv";

/// Length of the "new patients" window ending at the reference date, in days.
pub const NEW_PATIENT_WINDOW_DAYS: i64 = 30;

/// Percentage of all patients counted as outpatient-department visits.
pub const OPD_PERCENT: u64 = 70;

/// Percentage of all patients counted as operations.
pub const OPERATIONS_PERCENT: u64 = 10;

/// Visitors counted per patient.
pub const VISITORS_PER_PATIENT: u64 = 5;

/// Displayed when the derived value would be zero.
pub const DEFAULT_NEW_PATIENTS: u64 = 125;
pub const DEFAULT_OPD_PATIENTS: u64 = 218;
pub const DEFAULT_OPERATIONS: u64 = 25;
pub const DEFAULT_VISITORS: u64 = 2479;
