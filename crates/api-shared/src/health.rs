use crate::HealthRes;
use wardboard_core::DashboardService;

/// Health check shared by every front end over the dashboard service.
///
/// Reports liveness together with whether the dataset has been loaded yet, how many records it
/// holds and which source it was loaded from.
#[derive(Clone, Copy, Debug)]
pub struct HealthService;

impl HealthService {
    /// Never triggers a load; a service that has not loaded yet reports `patients_loaded: false`.
    pub fn check_health(service: &DashboardService) -> HealthRes {
        let store = service.store();
        HealthRes {
            status: "healthy".into(),
            patients_loaded: store.is_loaded(),
            patient_count: store.len(),
            source_url: service.source().url().to_string(),
        }
    }
}
