//! # API REST
//!
//! REST API implementation for Wardboard.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response bodies and `wardboard-core` for every data operation.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    CreatePatientRes, DashboardDataRes, ErrorRes, HealthRes, HealthService, ListPatientsRes,
    MessageRes, Patient, RefreshRes, StatsRes, UpdateSheetsUrlReq, UploadCsvReq, UploadRes,
};
use wardboard_core::{
    charts::{all_charts, Chart},
    constants::EXPORT_FILENAME,
    stats::{dashboard_stats, growth_metrics, DashboardStats, GrowthMetrics},
    DashboardError, DashboardService, PatientFields, RecordId, StoredPatient,
};

/// Application state shared across REST API handlers
///
/// Holds the dashboard service; clones share one patient store.
#[derive(Clone)]
pub struct AppState {
    pub service: DashboardService,
}

impl AppState {
    pub fn new(service: DashboardService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        get_patient,
        update_patient,
        delete_patient,
        get_record,
        update_record,
        delete_record,
        stats,
        dashboard_stats_snapshot,
        growth_metrics_snapshot,
        dashboard_data,
        refresh_data,
        upload_csv,
        export_csv,
        update_sheets_url,
        chart,
    ),
    components(schemas(
        HealthRes,
        Patient,
        ListPatientsRes,
        CreatePatientRes,
        MessageRes,
        ErrorRes,
        RefreshRes,
        UpdateSheetsUrlReq,
        UploadCsvReq,
        UploadRes,
        StatsRes,
        DashboardDataRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST application: API routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route(
            "/api/patients/:index",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route(
            "/api/records/:record_id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/api/stats", get(stats))
        .route("/api/dashboard-stats", get(dashboard_stats_snapshot))
        .route("/api/growth-metrics", get(growth_metrics_snapshot))
        .route("/api/dashboard-data", get(dashboard_data))
        .route("/api/refresh-data", post(refresh_data))
        .route("/api/upload-csv", post(upload_csv))
        .route("/api/export-csv", get(export_csv))
        .route("/api/update-sheets-url", post(update_sheets_url))
        .route("/api/charts/:slug", get(chart))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error returned by every handler, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    Dashboard(DashboardError),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self::Dashboard(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Dashboard(DashboardError::NotFound) => StatusCode::NOT_FOUND,
            Self::Dashboard(
                DashboardError::Validation { .. }
                | DashboardError::Schema { .. }
                | DashboardError::InvalidSource(_)
                | DashboardError::Csv(_),
            ) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Dashboard(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Dashboard(err) => err.to_string(),
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        }
        (status, Json(ErrorRes { error: self.message() })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Positional indexes that are not a number can never match a record.
fn parse_index(raw: &str) -> ApiResult<usize> {
    raw.parse().map_err(|_| DashboardError::NotFound.into())
}

fn parse_record_id(raw: &str) -> ApiResult<RecordId> {
    raw.parse::<RecordId>()
        .map_err(|_| DashboardError::NotFound.into())
}

fn to_json(patient: &StoredPatient) -> ApiResult<serde_json::Value> {
    serde_json::to_value(patient).map_err(|e| ApiError::Internal(e.to_string()))
}

fn refresh_res(message: &str, report: wardboard_core::RefreshReport) -> RefreshRes {
    RefreshRes {
        message: message.into(),
        outcome: report.outcome.as_str().into(),
        patients_count: report.patients_count,
    }
}

/// Loads the dataset on first use so reads and writes never run against an unloaded store.
async fn ensure_loaded(state: &AppState) {
    if let Some(report) = state.service.ensure_loaded().await {
        tracing::info!(
            "first load: {} patients ({})",
            report.patients_count,
            report.outcome
        );
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports liveness and a summary of the loaded dataset without triggering a load.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(&state.service))
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Every patient in order", body = ListPatientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients
///
/// Loads the dataset if this is the first request. Admission dates are normalized to
/// `YYYY-MM-DD` where they can be parsed.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<ListPatientsRes>> {
    ensure_loaded(&state).await;
    let patients = state
        .service
        .store()
        .list()
        .iter()
        .map(to_json)
        .collect::<ApiResult<Vec<_>>>()?;
    let total = patients.len();
    Ok(Json(ListPatientsRes { patients, total }))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created", body = CreatePatientRes),
        (status = 400, description = "A required field is missing", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// Every required column must be present and non-null; any other key is kept as an extension
/// column. The record is appended and its position and stable identifier returned.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatePatientRes>)> {
    let Json(fields) = payload?;
    ensure_loaded(&state).await;
    let (index, record_id) = state.service.store().insert(&fields)?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            message: "Patient added successfully".into(),
            id: index,
            record_id: record_id.to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/{index}",
    params(("index" = usize, Path, description = "Zero-based position of the record")),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    ensure_loaded(&state).await;
    let patient = state.service.store().get(parse_index(&index)?)?;
    Ok(Json(to_json(&patient)?))
}

#[utoipa::path(
    put,
    path = "/api/patients/{index}",
    params(("index" = usize, Path, description = "Zero-based position of the record")),
    request_body = Patient,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Merge fields into the record at a position
///
/// Only the supplied keys change; nothing is validated.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(index): Path<String>,
    payload: Result<Json<PatientFields>, JsonRejection>,
) -> ApiResult<Json<MessageRes>> {
    let Json(fields) = payload?;
    ensure_loaded(&state).await;
    state.service.store().update(parse_index(&index)?, &fields)?;
    Ok(Json(MessageRes::new("Patient updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{index}",
    params(("index" = usize, Path, description = "Zero-based position of the record")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Remove the record at a position
///
/// Later records shift down by one.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> ApiResult<Json<MessageRes>> {
    ensure_loaded(&state).await;
    state.service.store().remove(parse_index(&index)?)?;
    Ok(Json(MessageRes::new("Patient deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/records/{record_id}",
    params(("record_id" = String, Path, description = "Stable record identifier (32 hex chars)")),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    ensure_loaded(&state).await;
    let (_, patient) = state
        .service
        .store()
        .get_by_id(parse_record_id(&record_id)?)?;
    Ok(Json(to_json(&patient)?))
}

#[utoipa::path(
    put,
    path = "/api/records/{record_id}",
    params(("record_id" = String, Path, description = "Stable record identifier (32 hex chars)")),
    request_body = Patient,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<PatientFields>, JsonRejection>,
) -> ApiResult<Json<MessageRes>> {
    let Json(fields) = payload?;
    ensure_loaded(&state).await;
    state
        .service
        .store()
        .update_by_id(parse_record_id(&record_id)?, &fields)?;
    Ok(Json(MessageRes::new("Patient updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/records/{record_id}",
    params(("record_id" = String, Path, description = "Stable record identifier (32 hex chars)")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<MessageRes>> {
    ensure_loaded(&state).await;
    state
        .service
        .store()
        .remove_by_id(parse_record_id(&record_id)?)?;
    Ok(Json(MessageRes::new("Patient deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Counts and KPI snapshot", body = StatsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Disease, doctor and monthly admission counts plus the KPI snapshot
#[axum::debug_handler]
async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsRes>> {
    ensure_loaded(&state).await;
    let report = state.service.stats(today());
    let value = |v: serde_json::Result<serde_json::Value>| {
        v.map_err(|e| ApiError::Internal(e.to_string()))
    };
    Ok(Json(StatsRes {
        diseases: value(serde_json::to_value(&report.diseases))?,
        doctors: value(serde_json::to_value(&report.doctors))?,
        monthly: value(serde_json::to_value(&report.monthly))?,
        kpis: value(serde_json::to_value(&report.kpis))?,
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard-stats",
    responses(
        (status = 200, description = "Headline cards keyed by metric (value, progress, color)")
    )
)]
#[axum::debug_handler]
async fn dashboard_stats_snapshot(State(state): State<AppState>) -> Json<DashboardStats> {
    ensure_loaded(&state).await;
    Json(dashboard_stats(&state.service.kpis(today())))
}

#[utoipa::path(
    get,
    path = "/api/growth-metrics",
    responses(
        (status = 200, description = "Year-over-year growth table keyed by metric")
    )
)]
#[axum::debug_handler]
async fn growth_metrics_snapshot() -> Json<GrowthMetrics> {
    Json(growth_metrics())
}

#[utoipa::path(
    get,
    path = "/api/dashboard-data",
    responses(
        (status = 200, description = "Headline cards and growth table together", body = DashboardDataRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn dashboard_data(State(state): State<AppState>) -> ApiResult<Json<DashboardDataRes>> {
    ensure_loaded(&state).await;
    let cards = dashboard_stats(&state.service.kpis(today()));
    Ok(Json(DashboardDataRes {
        dashboard_stats: serde_json::to_value(&cards)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        growth_metrics: serde_json::to_value(growth_metrics())
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    }))
}

#[utoipa::path(
    post,
    path = "/api/refresh-data",
    responses(
        (status = 200, description = "Dataset reloaded from its source", body = RefreshRes)
    )
)]
/// Reload the dataset from the configured source
///
/// Always succeeds; `outcome` says whether the remote data or the sample fallback was used.
#[axum::debug_handler]
async fn refresh_data(State(state): State<AppState>) -> Json<RefreshRes> {
    let report = state.service.refresh().await;
    Json(refresh_res("Data refreshed successfully", report))
}

#[utoipa::path(
    post,
    path = "/api/upload-csv",
    request_body(content = UploadCsvReq, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Dataset replaced with the uploaded rows", body = UploadRes),
        (status = 400, description = "Missing file, wrong extension, missing columns or malformed CSV", body = ErrorRes)
    )
)]
/// Replace the dataset with an uploaded CSV file
///
/// The store is left untouched if the upload is rejected.
#[axum::debug_handler]
async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadRes>> {
    let mut multipart = multipart?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::BadRequest("No file selected".into()));
        }
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(ApiError::BadRequest(
                "Invalid file format. Please upload a CSV file.".into(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| ApiError::BadRequest("CSV file must be UTF-8 encoded".into()))?;

        let patients_count = state.service.store().import_csv(text)?;
        tracing::info!("imported {} patients from {}", patients_count, filename);
        return Ok(Json(UploadRes {
            message: "CSV uploaded successfully".into(),
            patients_count,
        }));
    }

    Err(ApiError::BadRequest("No file uploaded".into()))
}

#[utoipa::path(
    get,
    path = "/api/export-csv",
    responses(
        (status = 200, description = "Every record as a CSV attachment")
    )
)]
/// Download the dataset as CSV
///
/// An empty dataset exports as the header row only.
#[axum::debug_handler]
async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    ensure_loaded(&state).await;
    let body = state.service.store().export_csv()?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={EXPORT_FILENAME}"),
        ),
    ];
    Ok((headers, body).into_response())
}

#[utoipa::path(
    post,
    path = "/api/update-sheets-url",
    request_body = UpdateSheetsUrlReq,
    responses(
        (status = 200, description = "Source changed and dataset reloaded", body = RefreshRes),
        (status = 400, description = "URL missing or not a Google Sheets URL", body = ErrorRes)
    )
)]
/// Point the dashboard at another published spreadsheet and reload from it
#[axum::debug_handler]
async fn update_sheets_url(
    State(state): State<AppState>,
    payload: Result<Json<UpdateSheetsUrlReq>, JsonRejection>,
) -> ApiResult<Json<RefreshRes>> {
    let Json(req) = payload?;
    let url = req.url.unwrap_or_default();
    let report = state.service.set_source_url(&url).await?;
    Ok(Json(refresh_res(
        "Google Sheets URL updated successfully",
        report,
    )))
}

#[utoipa::path(
    get,
    path = "/api/charts/{slug}",
    params(("slug" = String, Path, description = "Chart name such as `new-patients`, or `all` for every chart")),
    responses(
        (status = 200, description = "Chart configuration"),
        (status = 404, description = "Unknown chart", body = ErrorRes)
    )
)]
/// Static chart configuration
///
/// `all` returns every chart keyed by its camelCase name.
#[axum::debug_handler]
async fn chart(Path(slug): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    if slug == "all" {
        return serde_json::to_value(all_charts())
            .map(Json)
            .map_err(|e| ApiError::Internal(e.to_string()));
    }
    match Chart::from_slug(&slug) {
        Some(chart) => Ok(Json(chart.config())),
        None => Err(ApiError::NotFound(format!("Unknown chart: {slug}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use wardboard_core::{sample::sample_patients, DatasetSource, NonEmptyText};

    /// A service over the sample data whose source is unreachable.
    fn loaded_state() -> AppState {
        let url = NonEmptyText::new("http://127.0.0.1:9/sheet.csv").expect("url");
        let service = DashboardService::with_source(DatasetSource::new(
            url,
            Duration::from_millis(200),
        ));
        service.store().replace_all(sample_patients());
        AppState::new(service)
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = router(state.clone())
            .oneshot(req)
            .await
            .expect("router should respond");
        let status = res.status();
        let body = res
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes()
            .to_vec();
        (status, body)
    }

    async fn send_json(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(state, req).await;
        let value = serde_json::from_slice(&body).expect("body should be JSON");
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request")
    }

    fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn multipart(filename: &str, content: &str) -> Request<Body> {
        let boundary = "wardboard-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{boundary}--\r\n"
        );
        Request::post("/api/upload-csv")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn test_health_reports_loaded_sample() {
        let state = loaded_state();
        let (status, body) = send_json(&state, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["patients_loaded"], true);
        assert_eq!(body["patient_count"], 8);
    }

    #[tokio::test]
    async fn test_list_patients_returns_total_and_record_ids() {
        let state = loaded_state();
        let (status, body) = send_json(&state, get("/api/patients")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 8);
        let first = &body["patients"][0];
        assert_eq!(first["name"], "Jena Brinsker");
        assert_eq!(first["recordId"].as_str().map(str::len), Some(32));
    }

    #[tokio::test]
    async fn test_list_patients_loads_fallback_on_first_use() {
        let url = NonEmptyText::new("http://127.0.0.1:9/sheet.csv").expect("url");
        let service = DashboardService::with_source(DatasetSource::new(
            url,
            Duration::from_millis(200),
        ));
        let state = AppState::new(service);

        let (status, body) = send_json(&state, get("/api/patients")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 8);
        assert!(state.service.store().is_loaded());
    }

    #[tokio::test]
    async fn test_create_patient_then_fetch_by_index_and_id() {
        let state = loaded_state();
        let payload = json!({
            "name": "Ada Lovelace",
            "doctor": "Dr Babbage",
            "admitDate": "2024-03-01",
            "disease": "fever",
            "roomNo": "7",
            "ward": "B"
        });
        let (status, created) =
            send_json(&state, with_json("POST", "/api/patients", payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["message"], "Patient added successfully");
        assert_eq!(created["id"], 8);

        let (status, by_index) = send_json(&state, get("/api/patients/8")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_index["name"], "Ada Lovelace");
        assert_eq!(by_index["ward"], "B");

        let record_id = created["recordId"].as_str().expect("recordId");
        let (status, by_id) =
            send_json(&state, get(&format!("/api/records/{record_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_id["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_create_patient_missing_field_is_bad_request() {
        let state = loaded_state();
        let payload = json!({"name": "No Doctor", "admitDate": "2024-03-01", "disease": "flu", "roomNo": "1"});
        let (status, body) = send_json(&state, with_json("POST", "/api/patients", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: doctor");
        assert_eq!(state.service.store().len(), 8);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_errors() {
        let state = loaded_state();

        let (status, body) =
            send_json(&state, with_json("POST", "/api/patients", json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

        let broken = Request::post("/api/update-sheets-url")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"url\":"))
            .expect("request");
        let (status, body) = send_json(&state, broken).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let not_multipart = Request::post("/api/upload-csv")
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from("name\n"))
            .expect("request");
        let (status, body) = send_json(&state, not_multipart).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        assert_eq!(state.service.store().len(), 8);
    }

    #[tokio::test]
    async fn test_unknown_index_and_id_are_not_found() {
        let state = loaded_state();
        for uri in [
            "/api/patients/99",
            "/api/patients/abc",
            "/api/records/0123456789abcdef0123456789abcdef",
            "/api/records/not-an-id",
        ] {
            let (status, body) = send_json(&state, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "Patient not found");
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_by_index() {
        let state = loaded_state();
        let (status, body) = send_json(
            &state,
            with_json("PUT", "/api/patients/0", json!({"roomNo": "999"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient updated successfully");
        let (_, patient) = send_json(&state, get("/api/patients/0")).await;
        assert_eq!(patient["roomNo"], "999");
        assert_eq!(patient["name"], "Jena Brinsker");

        let delete = Request::delete("/api/patients/0")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send_json(&state, delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient deleted successfully");
        assert_eq!(state.service.store().len(), 7);
    }

    #[tokio::test]
    async fn test_record_id_survives_earlier_deletion() {
        let state = loaded_state();
        let (_, listed) = send_json(&state, get("/api/patients")).await;
        let third = listed["patients"][2]["recordId"]
            .as_str()
            .expect("recordId")
            .to_string();

        let delete = Request::delete("/api/patients/0")
            .body(Body::empty())
            .expect("request");
        let (status, _) = send(&state, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, patient) = send_json(&state, get(&format!("/api/records/{third}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patient["name"], listed["patients"][2]["name"]);

        let delete = Request::delete(format!("/api/records/{third}"))
            .body(Body::empty())
            .expect("request");
        let (status, _) = send(&state, delete).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, get(&format!("/api/records/{third}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_shape() {
        let state = loaded_state();
        let (status, body) = send_json(&state, get("/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        for key in ["diseases", "doctors", "monthly", "kpis"] {
            assert!(body[key].is_object(), "{key}");
        }
        let diseases = body["diseases"].as_object().expect("object");
        let total: u64 = diseases.values().filter_map(Value::as_u64).sum();
        assert_eq!(total, 8);
        assert!(body["kpis"]["newPatients"].is_u64());
    }

    #[tokio::test]
    async fn test_dashboard_data_and_growth_metrics() {
        let state = loaded_state();
        let (status, body) = send_json(&state, get("/api/dashboard-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dashboard_stats"]["newPatients"]["progress"], 75);
        assert!(body["growth_metrics"].is_object());

        let (status, cards) = send_json(&state, get("/api/dashboard-stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cards["operations"]["color"], "#2e9e5b");

        let (status, growth) = send_json(&state, get("/api/growth-metrics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(growth, body["growth_metrics"]);
    }

    #[tokio::test]
    async fn test_refresh_falls_back_to_sample_when_source_unreachable() {
        let state = loaded_state();
        state.service.store().replace_all(Vec::new());
        let req = Request::post("/api/refresh-data")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send_json(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Data refreshed successfully");
        assert_eq!(body["outcome"], "fallback-transport-error");
        assert_eq!(body["patients_count"], 8);
    }

    #[tokio::test]
    async fn test_upload_csv_replaces_dataset() {
        let state = loaded_state();
        let csv = "name,doctor,admitDate,disease,roomNo\nA,Dr X,2024-01-02,flu,1\nB,Dr Y,2024-01-03,cold,2\n";
        let (status, body) = send_json(&state, multipart("patients.csv", csv)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "CSV uploaded successfully");
        assert_eq!(body["patients_count"], 2);
        assert_eq!(state.service.store().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_csv_rejections_leave_store_untouched() {
        let state = loaded_state();

        let (status, body) = send_json(&state, multipart("patients.txt", "name\nA\n")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid file format. Please upload a CSV file.");

        let (status, body) =
            send_json(&state, multipart("patients.csv", "name,doctor\nA,Dr X\n")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing columns: admitDate, disease, roomNo"
        );

        assert_eq!(state.service.store().len(), 8);
    }

    #[tokio::test]
    async fn test_export_csv_headers_and_body() {
        let state = loaded_state();
        let res = router(state.clone())
            .oneshot(get("/api/export-csv"))
            .await
            .expect("router should respond");
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content-disposition header");
        assert_eq!(disposition, "attachment; filename=patients_export.csv");
        let body = res
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let text = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(text.starts_with("name,doctor,admitDate,disease,roomNo"));
        assert_eq!(text.lines().count(), 9);
        assert!(!text.contains("recordId"));
    }

    #[tokio::test]
    async fn test_update_sheets_url_validation() {
        let state = loaded_state();

        let (status, body) = send_json(
            &state,
            with_json("POST", "/api/update-sheets-url", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid dataset source: URL is required");

        let (status, body) = send_json(
            &state,
            with_json(
                "POST",
                "/api/update-sheets-url",
                json!({"url": "https://example.com/data.csv"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "invalid dataset source: Invalid Google Sheets URL"
        );
        assert_eq!(
            state.service.source().url().as_str(),
            "http://127.0.0.1:9/sheet.csv"
        );
    }

    #[tokio::test]
    async fn test_charts_by_slug_and_all() {
        let state = loaded_state();
        let (status, chart) = send_json(&state, get("/api/charts/new-patients")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(chart.is_object());

        let (status, all) = send_json(&state, get("/api/charts/all")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_object().map(|m| m.len()), Some(Chart::ALL.len()));

        let (status, body) = send_json(&state, get("/api/charts/pie-in-the-sky")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown chart: pie-in-the-sky");
    }
}
