//! Contacts service: multi-user contact book over HTTP with JWT authentication.

use contacts_service::{Config, build_app};
use contacts_telemetry::{init_metrics, setup_telemetry};
use tokio::signal;
use tracing::{info, warn};

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;
    setup_telemetry(&config.telemetry())?;

    let metrics_handle = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "Metrics recorder unavailable, /metrics disabled");
            None
        }
    };

    info!(
        version = VERSION,
        address = %config.http_address,
        store = ?config.store,
        pid = std::process::id(),
        "Starting contacts-service"
    );

    let (app, addr, database) = build_app(&config, metrics_handle).await?;

    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
