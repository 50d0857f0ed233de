//! Static chart configurations for the dashboard front end.
//!
//! Payloads are handed to the charting library verbatim; nothing here is derived from patient
//! data.

use indexmap::IndexMap;
use serde_json::{json, Value};

/// A chart the dashboard knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    NewPatients,
    OpdPatients,
    HospitalSurvey,
    Operations,
    Visitors,
    NewPatient,
    HeartSurgeries,
    MedicalTreatment,
}

impl Chart {
    pub const ALL: [Chart; 8] = [
        Chart::NewPatients,
        Chart::OpdPatients,
        Chart::HospitalSurvey,
        Chart::Operations,
        Chart::Visitors,
        Chart::NewPatient,
        Chart::HeartSurgeries,
        Chart::MedicalTreatment,
    ];

    /// URL path segment, e.g. `new-patients`.
    pub fn slug(&self) -> &'static str {
        match self {
            Chart::NewPatients => "new-patients",
            Chart::OpdPatients => "opd-patients",
            Chart::HospitalSurvey => "hospital-survey",
            Chart::Operations => "operations",
            Chart::Visitors => "visitors",
            Chart::NewPatient => "new-patient",
            Chart::HeartSurgeries => "heart-surgeries",
            Chart::MedicalTreatment => "medical-treatment",
        }
    }

    /// Key used in the combined payload, e.g. `newPatients`.
    pub fn key(&self) -> &'static str {
        match self {
            Chart::NewPatients => "newPatients",
            Chart::OpdPatients => "opdPatients",
            Chart::HospitalSurvey => "hospitalSurvey",
            Chart::Operations => "operations",
            Chart::Visitors => "visitors",
            Chart::NewPatient => "newPatient",
            Chart::HeartSurgeries => "heartSurgeries",
            Chart::MedicalTreatment => "medicalTreatment",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    /// The chart's configuration payload.
    pub fn config(&self) -> Value {
        match self {
            Chart::NewPatients => json!({
                "type": "doughnut",
                "data": {
                    "datasets": [{
                        "data": [85, 15],
                        "backgroundColor": ["#36a2eb", "#6c5ce7"],
                        "borderWidth": 0
                    }]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "cutout": "70%",
                    "plugins": {
                        "legend": {"display": false},
                        "tooltip": {"enabled": false}
                    }
                }
            }),
            Chart::OpdPatients => sparkline(
                "bar",
                json!({
                    "data": [50, 40, 45, 50, 55, 40, 35, 30, 45, 50, 55, 40],
                    "backgroundColor": "#36a2eb",
                    "barThickness": 4,
                    "borderRadius": 2
                }),
                12,
            ),
            Chart::HospitalSurvey => json!({
                "type": "line",
                "data": {
                    "labels": MONTHS,
                    "datasets": [{
                        "data": [50, 40, 30, 40, 50, 45, 35, 55, 25, 30, 22, 17],
                        "borderColor": "#6c5ce7",
                        "tension": 0.4,
                        "pointRadius": 0,
                        "borderWidth": 3
                    }]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "plugins": {"legend": {"display": false}},
                    "scales": {
                        "x": {"grid": {"display": false}},
                        "y": {"beginAtZero": true, "max": 60, "ticks": {"stepSize": 10}}
                    }
                }
            }),
            Chart::Operations => sparkline(
                "line",
                json!({
                    "data": [50, 25, 20, 30, 25, 35, 30],
                    "borderColor": "#8e44ad",
                    "tension": 0,
                    "pointRadius": 0,
                    "borderWidth": 2
                }),
                7,
            ),
            Chart::Visitors => sparkline(
                "line",
                json!({
                    "data": [60, 25, 30, 35, 40, 50, 40, 30, 25, 35, 50, 40],
                    "borderColor": "#6c5ce7",
                    "backgroundColor": "rgba(108, 92, 231, 0.2)",
                    "tension": 0.4,
                    "pointRadius": 0,
                    "borderWidth": 2,
                    "fill": true
                }),
                12,
            ),
            Chart::NewPatient => json!({
                "type": "line",
                "data": {
                    "labels": &MONTHS[..7],
                    "datasets": [
                        {
                            "label": "Current",
                            "data": [60, 25, 40, 30, 45, 35, 45],
                            "borderColor": "#4bc0c0",
                            "backgroundColor": "rgba(75, 192, 192, 0.2)",
                            "tension": 0.4,
                            "pointRadius": 0,
                            "borderWidth": 2,
                            "fill": true
                        },
                        {
                            "label": "Previous",
                            "data": [30, 35, 25, 45, 30, 40, 35],
                            "borderColor": "#aaa",
                            "backgroundColor": "rgba(170, 170, 170, 0.2)",
                            "tension": 0.4,
                            "pointRadius": 0,
                            "borderWidth": 2,
                            "fill": true
                        }
                    ]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "plugins": {"legend": {"display": false}},
                    "scales": {
                        "x": {"grid": {"display": false}},
                        "y": {"beginAtZero": true, "max": 100, "ticks": {"stepSize": 20}}
                    }
                }
            }),
            Chart::HeartSurgeries => json!({
                "type": "bar",
                "data": {
                    "labels": ["Jan '19", "Q2 Jan", "Q3 Jan", "Q4 Jan", "Q5 Jan", "Q6 Jan"],
                    "datasets": [
                        {"label": "Dataset 1", "data": [45, 55, 41, 67, 22, 43], "backgroundColor": "#36a2eb"},
                        {"label": "Dataset 2", "data": [71, 23, 20, 8, 13, 27], "backgroundColor": "#4bc0c0"},
                        {"label": "Dataset 3", "data": [11, 17, 15, 15, 21, 14], "backgroundColor": "#ff9f40"}
                    ]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "plugins": {"legend": {"display": false}},
                    "scales": {
                        "x": {"stacked": true, "grid": {"display": false}},
                        "y": {"stacked": true, "beginAtZero": true, "max": 100, "ticks": {"stepSize": 20}}
                    }
                }
            }),
            Chart::MedicalTreatment => json!({
                "type": "line",
                "data": {
                    "labels": &MONTHS[..8],
                    "datasets": [
                        {
                            "label": "Treatment A",
                            "data": [60, 40, 35, 50, 90, 40, 50, 40],
                            "borderColor": "#f59e0b",
                            "backgroundColor": "transparent",
                            "borderWidth": 2,
                            "tension": 0.4,
                            "borderDash": [5, 5]
                        },
                        {
                            "label": "Treatment B",
                            "data": [55, 35, 40, 20, 25, 30, 35, 40],
                            "borderColor": "#3b82f6",
                            "backgroundColor": "transparent",
                            "borderWidth": 2,
                            "tension": 0.4
                        },
                        {
                            "label": "Treatment C",
                            "data": [35, 45, 30, 25, 15, 40, 20, 30],
                            "borderColor": "#10b981",
                            "backgroundColor": "transparent",
                            "borderWidth": 2,
                            "tension": 0.4,
                            "borderDash": [3, 3]
                        }
                    ]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "plugins": {"legend": {"display": false}},
                    "scales": {
                        "x": {"grid": {"display": false}},
                        "y": {"min": 0, "max": 100}
                    }
                }
            }),
        }
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Axis-less single-series chart used by the small summary cards.
fn sparkline(kind: &str, dataset: Value, points: usize) -> Value {
    json!({
        "type": kind,
        "data": {
            "labels": vec![""; points],
            "datasets": [dataset]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {"display": false},
                "tooltip": {"enabled": false}
            },
            "scales": {
                "x": {"display": false},
                "y": {"display": false}
            }
        }
    })
}

/// Every chart keyed by its combined-payload key.
pub fn all_charts() -> IndexMap<&'static str, Value> {
    Chart::ALL.into_iter().map(|c| (c.key(), c.config())).collect()
}
