//! Built-in sample dataset.
//!
//! Served whenever the remote sheet cannot be used, so the dashboard always has rows to show.

use crate::record::PatientRecord;
use serde_json::{json, Value};

/// (name, doctor, admitDate, disease, roomNo, age, gender, phone, address)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    &'static str,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const SAMPLE_ROWS: [SampleRow; 8] = [
    ("Jena Brinsker", "Dr Kenny Josh", "2016-05-27", "influenza", "101", 45, "Female", "9876543210", "Mumbai, Maharashtra"),
    ("Mark Hay", "Dr Mark", "2017-05-26", "asthma", "105", 32, "Male", "9876543211", "Delhi, Delhi"),
    ("Anthony Davie", "Dr Cinnabar", "2018-05-21", "diabetes", "106", 58, "Male", "9876543212", "Bangalore, Karnataka"),
    ("David Perry", "Dr Felix", "2016-04-20", "jaundice", "105", 28, "Male", "9876543213", "Chennai, Tamil Nadu"),
    ("Anthony Davie", "Dr Beryl", "2016-05-24", "malaria", "102", 35, "Male", "9876543214", "Hyderabad, Telangana"),
    ("Alan Gilchrist", "Dr Joshep", "2016-05-22", "hepatitis", "103", 42, "Male", "9876543215", "Pune, Maharashtra"),
    ("Mark Hay", "Dr Jayesh", "2016-06-18", "typhoid", "107", 29, "Male", "9876543216", "Kolkata, West Bengal"),
    ("Sue Woodger", "Dr Sharma", "2016-05-17", "malaria", "108", 38, "Female", "9876543217", "Jaipur, Rajasthan"),
];

/// Number of records [`sample_patients`] returns.
pub const SAMPLE_SIZE: usize = SAMPLE_ROWS.len();

/// Returns the fixed fallback dataset: eight fully populated records, always in the same order.
pub fn sample_patients() -> Vec<PatientRecord> {
    SAMPLE_ROWS
        .iter()
        .map(
            |&(name, doctor, admit_date, disease, room_no, age, gender, phone, address)| {
                let mut record = PatientRecord {
                    name: Some(name.into()),
                    doctor: Some(doctor.into()),
                    admit_date: Some(admit_date.into()),
                    disease: Some(disease.into()),
                    room_no: Some(room_no.into()),
                    ..Default::default()
                };
                record.extra.insert("age".into(), json!(age));
                record.extra.insert("gender".into(), Value::from(gender));
                record.extra.insert("phone".into(), Value::from(phone));
                record.extra.insert("address".into(), Value::from(address));
                record
            },
        )
        .collect()
}
