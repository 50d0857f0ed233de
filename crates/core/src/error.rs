#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Patient not found")]
    NotFound,
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },
    #[error("Missing columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("invalid dataset source: {0}")]
    InvalidSource(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write CSV: {0}")]
    CsvWrite(String),
    #[error("invalid text: {0}")]
    Text(#[from] wardboard_types::TextError),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
