//! Route table and health check handlers.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::services::{auth, contacts};
use crate::startup::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// All HTTP routes bound to the given application state.
///
/// `/metrics` is only mounted when the state carries a recorder handle.
pub fn app_routes(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .merge(auth::routes())
        .merge(contacts::routes());

    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn readiness_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.db.backend_name();
    let healthy = state.db.health_check().await;

    let database = CheckResult {
        status: if healthy { "healthy" } else { "unhealthy" },
        backend,
        message: (!healthy).then(|| "Database connection failed".to_string()),
    };

    Json(HealthResponse {
        status: database.status,
        version: VERSION,
        checks: HealthChecks { database },
    })
}
