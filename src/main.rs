use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use wardboard_core::{CoreConfig, DashboardService};

/// Main entry point for the Wardboard application
///
/// Loads the patient dataset from the configured spreadsheet (falling back to the built-in
/// sample) and then serves the REST API with its Swagger UI.
///
/// # Environment Variables
/// - `WARDBOARD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `WARDBOARD_SHEETS_URL`: Published spreadsheet CSV URL (default: the demo sheet)
/// - `WARDBOARD_FETCH_TIMEOUT_SECS`: Timeout for fetching the sheet, 1-60 (default: 5)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wardboard_run=info".parse()?)
                .add_directive("wardboard_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("WARDBOARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::from_env_values(
        std::env::var("WARDBOARD_SHEETS_URL").ok(),
        std::env::var("WARDBOARD_FETCH_TIMEOUT_SECS").ok(),
    )?;
    tracing::info!("++ Dataset source {}", cfg.sheets_url());

    let service = DashboardService::new(&cfg);
    let report = service.refresh().await;
    if report.outcome.is_fallback() {
        tracing::warn!(
            "++ Using sample data ({}): {} patients",
            report.outcome,
            report.patients_count
        );
    } else {
        tracing::info!("++ Loaded {} patients", report.patients_count);
    }

    tracing::info!("++ Starting Wardboard REST on {}", rest_addr);

    let rest_app = router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}
