//! CSV reading and writing for patient datasets.
//!
//! Both directions use the same column conventions: the five required columns by name, and every
//! other column carried through as an extension field, cell text kept verbatim.

use crate::constants::{RECORD_ID_KEY, REQUIRED_COLUMNS};
use crate::record::PatientRecord;
use crate::validation::missing_required_columns;
use crate::{DashboardError, DashboardResult};
use indexmap::IndexSet;
use serde_json::Value;

/// The rows of a CSV document together with its header row.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub records: Vec<PatientRecord>,
}

impl ParsedCsv {
    /// Header order to keep for export. The reserved `recordId` column is dropped.
    pub fn columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| h.as_str() != RECORD_ID_KEY)
            .cloned()
            .collect()
    }

    /// Required columns absent from the header row.
    pub fn missing_columns(&self) -> Vec<String> {
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        missing_required_columns(&headers)
    }
}

/// Parses CSV text with a header row.
///
/// Empty cells in required columns become absent values and a `recordId` column is ignored. Rows with a different number of cells
/// than the header row are an error.
pub fn parse_csv(text: &str) -> Result<ParsedCsv, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = PatientRecord::default();
        for (column, cell) in headers.iter().zip(row.iter()) {
            let value = if cell.is_empty() && REQUIRED_COLUMNS.contains(&column.as_str()) {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            record.set(column, value);
        }
        records.push(record);
    }

    Ok(ParsedCsv { headers, records })
}

/// Serialises records to CSV text, header row first.
///
/// Columns appear in first-seen order across the records. With no records the header holds the
/// required columns only.
pub fn write_csv(records: &[PatientRecord]) -> DashboardResult<String> {
    write_csv_with_columns(&[], records)
}

/// Like [`write_csv`], but `columns` fixes the order of the leading columns, typically the header
/// row of the document the records were imported from. Columns the records add beyond it follow in
/// first-seen order. Every column in `columns` is written even when no record has a value for it.
pub fn write_csv_with_columns(
    columns: &[String],
    records: &[PatientRecord],
) -> DashboardResult<String> {
    let mut header: IndexSet<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != RECORD_ID_KEY)
        .collect();
    if header.is_empty() && records.is_empty() {
        header.extend(REQUIRED_COLUMNS);
    }
    for record in records {
        header.extend(record.columns());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|c| record.cell(c)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::CsvWrite(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::CsvWrite(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
name,doctor,admitDate,disease,roomNo,age,address
Jena Brinsker,Dr Kenny Josh,2016-05-27,influenza,101,45,\"Mumbai, Maharashtra\"
Mark Hay,Dr Mark,2017-05-26,asthma,,32,
";

    #[test]
    fn test_parse_csv_reads_required_and_extension_columns() {
        let parsed = parse_csv(SHEET).expect("sheet should parse");
        assert_eq!(parsed.headers.len(), 7);
        assert!(parsed.missing_columns().is_empty());
        assert_eq!(parsed.records.len(), 2);

        let first = &parsed.records[0];
        assert_eq!(first.room_no.as_deref(), Some("101"));
        assert_eq!(first.extra.get("address"), Some(&Value::String("Mumbai, Maharashtra".into())));

        let second = &parsed.records[1];
        assert_eq!(second.room_no, None, "empty required cell should be absent");
        assert_eq!(second.extra.get("address"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_parse_csv_reports_missing_columns() {
        let parsed = parse_csv("name,disease\nAlan Gilchrist,hepatitis\n").expect("should parse");
        assert_eq!(parsed.missing_columns(), vec!["doctor", "admitDate", "roomNo"]);
    }

    #[test]
    fn test_parse_csv_empty_input_has_no_headers() {
        let parsed = parse_csv("").expect("empty input should parse");
        assert!(parsed.headers.is_empty());
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_parse_csv_rejects_ragged_rows() {
        let result = parse_csv("name,doctor\nA,B,C\n");
        assert!(result.is_err(), "row longer than header should fail");
    }

    #[test]
    fn test_write_csv_round_trips_values() {
        let parsed = parse_csv(SHEET).expect("sheet should parse");
        let written = write_csv(&parsed.records).expect("should write");
        let reparsed = parse_csv(&written).expect("written CSV should parse");

        assert_eq!(reparsed.records, parsed.records);
        assert_eq!(
            written.lines().next(),
            Some("name,doctor,admitDate,disease,roomNo,age,address")
        );
    }

    #[test]
    fn test_write_csv_empty_has_required_header() {
        let written = write_csv(&[]).expect("should write");
        assert_eq!(written, "name,doctor,admitDate,disease,roomNo\n");
    }

    #[test]
    fn test_parse_csv_ignores_record_id_column() {
        let parsed = parse_csv(
            "name,doctor,admitDate,disease,roomNo,recordId\nA,Dr A,2024-01-02,flu,1,zzz\n",
        )
        .expect("should parse");

        assert!(!parsed.records[0].extra.contains_key(RECORD_ID_KEY));
        assert_eq!(parsed.columns(), vec!["name", "doctor", "admitDate", "disease", "roomNo"]);

        let written = write_csv_with_columns(&parsed.columns(), &parsed.records).expect("should write");
        assert_eq!(written, "name,doctor,admitDate,disease,roomNo\nA,Dr A,2024-01-02,flu,1\n");
    }

    #[test]
    fn test_write_csv_with_columns_keeps_header_order() {
        let text = "roomNo,name,doctor,admitDate,disease,age\n1,A,Dr A,2024-01-02,flu,3\n";
        let parsed = parse_csv(text).expect("should parse");

        let written = write_csv_with_columns(&parsed.columns(), &parsed.records).expect("should write");
        assert_eq!(written, text);
    }

    #[test]
    fn test_write_csv_with_columns_keeps_header_without_rows() {
        let text = "name,doctor,admitDate,disease,roomNo,age,ward\n";
        let parsed = parse_csv(text).expect("should parse");

        let written = write_csv_with_columns(&parsed.columns(), &parsed.records).expect("should write");
        assert_eq!(written, text);
    }

    #[test]
    fn test_write_csv_unions_columns_in_first_seen_order() {
        let a = parse_csv("name,doctor,admitDate,disease,roomNo,ward\nA,B,2020-01-01,flu,1,east\n")
            .expect("should parse");
        let b = parse_csv("name,doctor,admitDate,disease,roomNo,bed\nC,D,2020-01-02,flu,2,4\n")
            .expect("should parse");
        let records = vec![a.records[0].clone(), b.records[0].clone()];

        let written = write_csv(&records).expect("should write");
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("name,doctor,admitDate,disease,roomNo,ward,bed"));
        assert_eq!(lines.next(), Some("A,B,2020-01-01,flu,1,east,"));
        assert_eq!(lines.next(), Some("C,D,2020-01-02,flu,2,,4"));
    }
}
