//! Patient record model.
//!
//! A record has five required fields and any number of schema-free extension fields. Required
//! fields are held as optional text: create validates them, but a later partial update may clear
//! one, and every reader has to cope with that.

use crate::constants::{RECORD_ID_KEY, REQUIRED_COLUMNS};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde_json::Value;
use wardboard_uuid::RecordId;

/// Loosely typed field payload, as received from a create or update request.
pub type PatientFields = serde_json::Map<String, Value>;

/// A single patient row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientRecord {
    pub name: Option<String>,
    pub doctor: Option<String>,
    pub admit_date: Option<String>,
    pub disease: Option<String>,
    pub room_no: Option<String>,
    /// Extension fields in first-insertion order.
    pub extra: IndexMap<String, Value>,
}

impl PatientRecord {
    /// Builds a record from a field payload without validating it.
    ///
    /// The reserved `recordId` key is ignored.
    pub fn from_fields(fields: &PatientFields) -> Self {
        let mut record = Self::default();
        record.merge(fields);
        record
    }

    /// Merges `fields` into this record. Keys not present in `fields` are untouched and a `null`
    /// value clears a required field.
    pub fn merge(&mut self, fields: &PatientFields) {
        for (key, value) in fields {
            self.set(key, value.clone());
        }
    }

    /// Sets one field by its column name. The reserved `recordId` key is ignored.
    pub fn set(&mut self, key: &str, value: Value) {
        if key == RECORD_ID_KEY {
            return;
        }
        match self.required_slot(key) {
            Some(slot) => *slot = value_to_text(&value),
            None => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Returns the value of a required column, if that column is set.
    pub fn required(&self, column: &str) -> Option<&str> {
        match column {
            "name" => self.name.as_deref(),
            "doctor" => self.doctor.as_deref(),
            "admitDate" => self.admit_date.as_deref(),
            "disease" => self.disease.as_deref(),
            "roomNo" => self.room_no.as_deref(),
            _ => None,
        }
    }

    fn required_slot(&mut self, column: &str) -> Option<&mut Option<String>> {
        match column {
            "name" => Some(&mut self.name),
            "doctor" => Some(&mut self.doctor),
            "admitDate" => Some(&mut self.admit_date),
            "disease" => Some(&mut self.disease),
            "roomNo" => Some(&mut self.room_no),
            _ => None,
        }
    }

    /// The admission date as a calendar date, when it parses.
    pub fn admit_date(&self) -> Option<NaiveDate> {
        self.admit_date.as_deref().and_then(parse_admit_date)
    }

    /// Returns a copy with `admitDate` rendered as `YYYY-MM-DD`.
    ///
    /// Unparseable dates are left as they are.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if let Some(date) = self.admit_date() {
            out.admit_date = Some(date.format("%Y-%m-%d").to_string());
        }
        out
    }

    /// Column names this record contributes to a CSV export: every required column, then its
    /// extension fields.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        let required: [&str; 5] = REQUIRED_COLUMNS;
        required
            .into_iter()
            .chain(self.extra.keys().map(String::as_str))
    }

    /// Renders one cell of a CSV export. Absent values become empty cells.
    pub fn cell(&self, column: &str) -> String {
        if REQUIRED_COLUMNS.contains(&column) {
            return self.required(column).unwrap_or_default().to_string();
        }
        match self.extra.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for column in REQUIRED_COLUMNS {
            map.serialize_entry(column, &self.required(column))?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        Ok(())
    }
}

impl serde::Serialize for PatientRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(REQUIRED_COLUMNS.len() + self.extra.len()))?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}

impl<'de> serde::Deserialize<'de> for PatientRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = PatientFields::deserialize(deserializer)?;
        Ok(Self::from_fields(&fields))
    }
}

/// A record together with the stable identifier it was given when it entered the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPatient {
    pub id: RecordId,
    pub record: PatientRecord,
}

impl serde::Serialize for StoredPatient {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = 1 + REQUIRED_COLUMNS.len() + self.record.extra.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(RECORD_ID_KEY, &self.id)?;
        self.record.serialize_entries(&mut map)?;
        map.end()
    }
}

/// Converts a JSON value to the text stored in a required field. `null` means absent.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses an admission date in any of the formats spreadsheets commonly emit.
pub fn parse_admit_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> PatientFields {
        value.as_object().cloned().expect("test payload must be an object")
    }

    #[test]
    fn test_from_fields_splits_required_and_extension() {
        let record = PatientRecord::from_fields(&fields(json!({
            "name": "Sue Woodger",
            "doctor": "Dr Sharma",
            "admitDate": "2016-05-17",
            "disease": "malaria",
            "roomNo": 108,
            "age": 38,
            "recordId": "ignored",
        })));

        assert_eq!(record.name.as_deref(), Some("Sue Woodger"));
        assert_eq!(record.room_no.as_deref(), Some("108"));
        assert_eq!(record.extra.get("age"), Some(&json!(38)));
        assert!(!record.extra.contains_key("recordId"));
    }

    #[test]
    fn test_merge_leaves_absent_keys_and_clears_nulls() {
        let mut record = PatientRecord::from_fields(&fields(json!({
            "name": "Mark Hay",
            "doctor": "Dr Mark",
            "roomNo": "105",
        })));

        record.merge(&fields(json!({ "doctor": "Dr Felix", "roomNo": null, "phone": "123" })));

        assert_eq!(record.name.as_deref(), Some("Mark Hay"));
        assert_eq!(record.doctor.as_deref(), Some("Dr Felix"));
        assert_eq!(record.room_no, None);
        assert_eq!(record.extra.get("phone"), Some(&json!("123")));
    }

    #[test]
    fn test_parse_admit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 5, 27).unwrap();
        for raw in [
            "2016-05-27",
            "2016-05-27T00:00:00",
            "2016-05-27 13:45:00",
            "2016-05-27T08:00:00+05:30",
            "2016/05/27",
            "05/27/2016",
        ] {
            assert_eq!(parse_admit_date(raw), Some(expected), "format {raw}");
        }
        assert_eq!(parse_admit_date("last tuesday"), None);
    }

    #[test]
    fn test_normalized_rewrites_parseable_dates_only() {
        let mut record = PatientRecord {
            admit_date: Some("2016-05-27 00:00:00".into()),
            ..Default::default()
        };
        assert_eq!(record.normalized().admit_date.as_deref(), Some("2016-05-27"));

        record.admit_date = Some("unknown".into());
        assert_eq!(record.normalized().admit_date.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_serialize_orders_required_then_extension() {
        let record = PatientRecord::from_fields(&fields(json!({
            "age": 45,
            "name": "Jena Brinsker",
        })));
        let json = serde_json::to_string(&record).expect("should serialize");
        assert_eq!(
            json,
            r#"{"name":"Jena Brinsker","doctor":null,"admitDate":null,"disease":null,"roomNo":null,"age":45}"#
        );
    }

    #[test]
    fn test_stored_patient_serializes_record_id_first() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let stored = StoredPatient {
            id,
            record: PatientRecord::default(),
        };
        let value = serde_json::to_value(&stored).expect("should serialize");
        assert_eq!(value["recordId"], json!("550e8400e29b41d4a716446655440000"));
        assert_eq!(value["name"], Value::Null);
    }

    #[test]
    fn test_cell_renders_extension_values() {
        let record = PatientRecord::from_fields(&fields(json!({
            "age": 45,
            "gender": "Female",
            "note": null,
        })));
        assert_eq!(record.cell("age"), "45");
        assert_eq!(record.cell("gender"), "Female");
        assert_eq!(record.cell("note"), "");
        assert_eq!(record.cell("roomNo"), "");
    }
}
