//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP layer. The workspace's main `wardboard-run`
//! binary serves the same router with the same configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use wardboard_core::{CoreConfig, DashboardService};

/// Main entry point for the Wardboard REST API server
///
/// # Environment Variables
/// - `WARDBOARD_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `WARDBOARD_SHEETS_URL`: Published spreadsheet CSV URL (default: the demo sheet)
/// - `WARDBOARD_FETCH_TIMEOUT_SECS`: Timeout for fetching the sheet (default: 5)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("wardboard_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("WARDBOARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::from_env_values(
        std::env::var("WARDBOARD_SHEETS_URL").ok(),
        std::env::var("WARDBOARD_FETCH_TIMEOUT_SECS").ok(),
    )?;
    let service = DashboardService::new(&cfg);
    let report = service.refresh().await;
    tracing::info!(
        "-- Loaded {} patients ({})",
        report.patients_count,
        report.outcome
    );

    tracing::info!("-- Starting Wardboard REST API on {}", addr);

    let app = router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
