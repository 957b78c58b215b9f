//! Server startup and wiring.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use contacts_core::JwtValidator;
use contacts_db::Database;
use contacts_telemetry::PrometheusHandle;
use http::{HeaderName, Request};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::config::{Config, StoreKind};
use crate::middleware::{AuthLayer, MetricsLayer};
use crate::routes::app_routes;
use crate::services::{AuthService, ContactService};

/// Request timeout duration.
const REQUEST_TIMEOUT_SECS: u64 = 30;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub contacts: ContactService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds the services over one database context.
    #[must_use]
    pub fn new(db: Database, jwt: JwtValidator, access_token_ttl_minutes: u64) -> Self {
        Self {
            auth: AuthService::new(db.clone(), jwt, access_token_ttl_minutes),
            contacts: ContactService::new(db.clone()),
            db,
            metrics: None,
        }
    }

    /// Expose `/metrics` using this recorder handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Build and configure the complete application.
///
/// Returns the router, the listen address and the database context so the
/// caller can close it after shutdown.
pub async fn build_app(
    config: &Config,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<(Router, SocketAddr, Database)> {
    let jwt_validator = JwtValidator::new(&config.jwt_secret_key);

    let database = match config.store {
        StoreKind::Postgres => {
            let db_config = config
                .db_config()
                .ok_or_else(|| anyhow::anyhow!("DB_URL is required when STORE=postgres"))?;
            Database::connect(&db_config).await?
        }
        StoreKind::Memory => Database::in_memory(),
    };
    info!(store = database.backend_name(), "Storage ready");

    let addr: SocketAddr = config.http_address.parse()?;

    let mut state = AppState::new(
        database.clone(),
        jwt_validator,
        config.access_token_ttl_minutes,
    );
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let cors = build_cors(config.cors_allow_origins.as_deref());
    let app = build_router(state, cors);

    Ok((app, addr, database))
}

/// Routes plus the full middleware stack.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let auth_layer = AuthLayer::new(state.auth.clone());

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            REQUEST_ID_HEADER.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let request_id = req
                        .headers()
                        .get(&REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(MetricsLayer::new())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(cors)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()))
        .layer(auth_layer);

    app_routes(state).layer(middleware)
}

/// CORS policy from a comma-separated origin list; `*` or unset allows any.
pub fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::permissive(),
        Some(o) => {
            let origins: Vec<_> = o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::permissive(),
    };

    cors.allow_headers(Any)
        .expose_headers([REQUEST_ID_HEADER.clone()])
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
