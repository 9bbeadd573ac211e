use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use records_core::{data_file_from_env_value, CoreConfig};

const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Main entry point for the patient records service
///
/// Serves the REST API over the JSON data file.
///
/// # Environment Variables
/// - `RECORDS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_FILE`: JSON file holding the patient collection (default: "patients.json")
/// - `RUST_LOG`: extra tracing directives
///
/// The data file must already exist; create it with `records init`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("records_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("records_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("RECORDS_REST_ADDR")
        .unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
        .parse()?;

    let cfg = CoreConfig::new(data_file_from_env_value(
        std::env::var("PATIENT_DATA_FILE").ok(),
    ));
    if !cfg.patient_data_file().is_file() {
        anyhow::bail!(
            "Patient data file does not exist: {} (run `records init` to create it)",
            cfg.patient_data_file().display()
        );
    }

    tracing::info!("++ Using patient data file {}", cfg.patient_data_file().display());
    tracing::info!("++ Starting records REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(cfg.file_store()));
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
