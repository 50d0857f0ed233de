//! Stable record identifiers.
//!
//! Wardboard keeps patient records in an ordered in-memory sequence. Positions shift when a record
//! is removed, so every record also carries a [`RecordId`] that is allocated once, when the record
//! enters the store, and never changes afterwards.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the value `Uuid::new_v4().simple().to_string()` produces. Externally supplied
//! identifiers (path segments, CLI arguments) must already be canonical; hyphenated or uppercase
//! forms are rejected by [`RecordId::parse`].

mod id;

pub use id::RecordId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
