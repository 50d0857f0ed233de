//! Aggregate statistics over the patient collection.
//!
//! Everything here is a pure function of a record slice; callers take a snapshot of the store
//! first so no lock is held while counting.

use crate::constants::{
    DEFAULT_NEW_PATIENTS, DEFAULT_OPD_PATIENTS, DEFAULT_OPERATIONS, DEFAULT_VISITORS,
    NEW_PATIENT_WINDOW_DAYS, OPD_PERCENT, OPERATIONS_PERCENT, VISITORS_PER_PATIENT,
};
use crate::record::PatientRecord;
use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

/// Value -> number of records, in the order the counting function documents.
pub type Counts = IndexMap<String, u64>;

/// Counts by exact value, highest count first. Ties keep first-encountered order.
fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Counts {
    let mut counts = Counts::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    // IndexMap::sort_by is stable
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Patients per disease. Records without a disease are skipped.
pub fn disease_counts(records: &[PatientRecord]) -> Counts {
    ranked_counts(records.iter().filter_map(|r| r.disease.as_deref()))
}

/// Patients per doctor. Records without a doctor are skipped.
pub fn doctor_counts(records: &[PatientRecord]) -> Counts {
    ranked_counts(records.iter().filter_map(|r| r.doctor.as_deref()))
}

/// Admissions per calendar month (`YYYY-MM`), oldest month first.
///
/// Records whose admission date is missing or does not parse are left out.
pub fn monthly_counts(records: &[PatientRecord]) -> Counts {
    let mut counts = Counts::new();
    for date in records.iter().filter_map(PatientRecord::admit_date) {
        *counts.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1;
    }
    counts.sort_keys();
    counts
}

/// Headline dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub new_patients: u64,
    pub opd_patients: u64,
    pub operations: u64,
    pub visitors: u64,
    pub total_patients: u64,
}

fn or_default(value: u64, default: u64) -> u64 {
    if value == 0 {
        default
    } else {
        value
    }
}

/// Derives the KPI figures as of `today`.
///
/// `newPatients` counts admissions in the window `[today - 30 days, today]`. Each derived figure
/// falls back to its display default when it comes out as zero; `totalPatients` never does.
pub fn kpi_snapshot(records: &[PatientRecord], today: NaiveDate) -> KpiSnapshot {
    let total = records.len() as u64;
    let window_start = today - Duration::days(NEW_PATIENT_WINDOW_DAYS);

    let new_patients = records
        .iter()
        .filter_map(PatientRecord::admit_date)
        .filter(|d| *d >= window_start && *d <= today)
        .count() as u64;

    KpiSnapshot {
        new_patients: or_default(new_patients, DEFAULT_NEW_PATIENTS),
        opd_patients: or_default(total * OPD_PERCENT / 100, DEFAULT_OPD_PATIENTS),
        operations: or_default(total * OPERATIONS_PERCENT / 100, DEFAULT_OPERATIONS),
        visitors: or_default(total * VISITORS_PER_PATIENT, DEFAULT_VISITORS),
        total_patients: total,
    }
}

/// One summary card on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub value: u64,
    pub progress: u8,
    pub color: &'static str,
}

/// Metric name -> summary card.
pub type DashboardStats = IndexMap<&'static str, MetricCard>;

/// Builds the summary cards from derived KPI values. Progress and colour are fixed.
pub fn dashboard_stats(kpis: &KpiSnapshot) -> DashboardStats {
    let cards = [
        ("newPatients", kpis.new_patients, 75, "#2e9e5b"),
        ("opdPatients", kpis.opd_patients, 89, "#e74c3c"),
        ("operations", kpis.operations, 60, "#2e9e5b"),
        ("visitors", kpis.visitors, 85, "#f39c12"),
    ];

    cards
        .into_iter()
        .map(|(metric, value, progress, color)| {
            (
                metric,
                MetricCard {
                    value,
                    progress,
                    color,
                },
            )
        })
        .collect()
}

/// Static trend indicator shown next to a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthMetric {
    pub growth_text: &'static str,
    pub growth_type: &'static str,
    pub overall: &'static str,
    pub monthly: &'static str,
    pub day: &'static str,
}

/// Metric name -> trend indicator.
pub type GrowthMetrics = IndexMap<&'static str, GrowthMetric>;

/// The fixed growth indicator table.
pub fn growth_metrics() -> GrowthMetrics {
    let rows = [
        ("newPatient", "+12%", "positive", "75%", "52%", "12%"),
        ("heartSurgeries", "-5%", "negative", "78%", "8%", "1%"),
        ("medicalTreatment", "+8%", "positive", "92%", "15%", "3%"),
    ];

    rows.into_iter()
        .map(|(metric, growth_text, growth_type, overall, monthly, day)| {
            (
                metric,
                GrowthMetric {
                    growth_text,
                    growth_type,
                    overall,
                    monthly,
                    day,
                },
            )
        })
        .collect()
}

/// Every count plus the KPI snapshot, for the bulk statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub diseases: Counts,
    pub doctors: Counts,
    pub monthly: Counts,
    pub kpis: KpiSnapshot,
}

impl StatsReport {
    pub fn compute(records: &[PatientRecord], today: NaiveDate) -> Self {
        Self {
            diseases: disease_counts(records),
            doctors: doctor_counts(records),
            monthly: monthly_counts(records),
            kpis: kpi_snapshot(records, today),
        }
    }
}
