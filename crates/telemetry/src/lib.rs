//! Telemetry setup: structured logging and Prometheus metrics.
//!
//! - **Logging**: `tracing` subscriber with env filter, JSON or compact output
//! - **Metrics**: Prometheus recorder whose handle renders the `/metrics` body
//!
//! # Features
//! - `prometheus` (default): Prometheus metrics exporter

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "prometheus")]
pub use metrics_exporter_prometheus::{BuildError, PrometheusHandle};

/// Noisy dependency targets capped regardless of the configured level.
const QUIET_TARGETS: &[&str] = &["sqlx::query=warn", "tower=info", "hyper=info", "h2=info"];

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    /// Use JSON log format
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: true,
        }
    }
}

/// Parse a log level name; unknown values fall back to INFO.
#[must_use]
pub fn parse_level(name: &str) -> Level {
    match name.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn env_filter(level: Level) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(
            EnvFilter::from_default_env().add_directive(level.into()),
            EnvFilter::add_directive,
        )
}

/// Initialize Prometheus metrics recorder and return the handle for the /metrics endpoint.
///
/// # Errors
/// Returns an error if a global recorder is already installed.
#[cfg(feature = "prometheus")]
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
}

/// Setup the logging stack (JSON or human-readable console output).
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn setup_telemetry(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let filter = env_filter(parse_level(&config.log_level));

    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
