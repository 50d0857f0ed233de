//! # API Shared
//!
//! Shared request/response definitions for the Wardboard APIs.
//!
//! Contains:
//! - JSON bodies exchanged by the REST endpoints, documented with `utoipa`
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and available to any other front end over `wardboard-core`.

pub mod health;

pub use health::HealthService;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Service liveness plus a summary of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub patients_loaded: bool,
    pub patient_count: usize,
    pub source_url: String,
}

/// Documentation shape of a patient record.
///
/// Records are free-form JSON objects at runtime; only the required columns and the stable
/// identifier are described here. Any other key is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub name: Option<String>,
    pub doctor: Option<String>,
    pub admit_date: Option<String>,
    pub disease: Option<String>,
    pub room_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    #[schema(value_type = Vec<Patient>)]
    pub patients: Vec<Value>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub message: String,
    /// Position of the new record.
    pub id: usize,
    #[serde(rename = "recordId")]
    pub record_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Outcome of reloading the dataset from its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RefreshRes {
    pub message: String,
    /// One of `loaded-remote`, `fallback-empty`, `fallback-missing-columns`,
    /// `fallback-transport-error`, `fallback-parse-error`.
    pub outcome: String,
    pub patients_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateSheetsUrlReq {
    pub url: Option<String>,
}

/// Multipart form for a CSV upload; the file goes in the `file` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadCsvReq {
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    pub message: String,
    pub patients_count: usize,
}

/// Disease, doctor and monthly counts plus the KPI snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    #[schema(value_type = Object)]
    pub diseases: Value,
    #[schema(value_type = Object)]
    pub doctors: Value,
    #[schema(value_type = Object)]
    pub monthly: Value,
    #[schema(value_type = Object)]
    pub kpis: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardDataRes {
    #[schema(value_type = Object)]
    pub dashboard_stats: Value,
    #[schema(value_type = Object)]
    pub growth_metrics: Value,
}
