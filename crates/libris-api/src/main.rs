//! libris-api server binary.

use tracing::info;

use libris_api::{build_router, startup, telemetry, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = telemetry::init_tracing("libris_api=debug,libris_db=info,tower_http=debug");

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    info!(
        subsystem = "api",
        backend = %config.backend,
        seed_file = %config.seed_file.display(),
        "Configuration loaded"
    );

    // The catalog is fully built before the listener accepts requests.
    let store = startup::build_store(&config).await?;
    let app = build_router(AppState::new(store));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
