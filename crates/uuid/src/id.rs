use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Stable identifier of a patient record (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is always rendered in canonical form.
///
/// # Construction
/// - [`RecordId::new`] allocates a fresh identifier.
/// - [`RecordId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Allocates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "record id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RecordId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_canonical() {
        let id = RecordId::new();
        let rendered = id.to_string();
        assert!(RecordId::is_canonical(&rendered), "got {rendered}");
    }

    #[test]
    fn test_new_allocates_distinct_ids() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_parse_round_trips_display() {
        let id = RecordId::new();
        let parsed = RecordId::parse(&id.to_string()).expect("canonical id should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_hyphenated_and_uppercase() {
        let hyphenated = "550e8400-e29b-41d4-a716-446655440000";
        assert!(RecordId::parse(hyphenated).is_err());

        let upper = "550E8400E29B41D4A716446655440000";
        assert!(RecordId::parse(upper).is_err());

        assert!(RecordId::parse("3").is_err());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").expect("valid id");
        let json = serde_json::to_string(&id).expect("should serialize");
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let back: RecordId = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, id);
    }
}
