//! Request metrics middleware.
//!
//! Records request count and duration using the `metrics` crate (rendered by
//! the Prometheus exporter at `/metrics`).
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `http_requests_total` | Counter | `method`, `path`, `status` |
//! | `http_request_duration_seconds` | Histogram | `method`, `path`, `status` |
//!
//! `path` is the route template, never the raw URI: contact ids collapse to
//! `/contacts/{id}` and unknown paths to `/*`, keeping label cardinality bounded.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use tower::{Layer, Service};

/// Fixed routes reported verbatim.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
    "/auth/register",
    "/auth/login",
    "/contacts",
];

/// Tower layer for request metrics collection.
#[derive(Clone, Copy, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Metrics middleware service.
#[derive(Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = route_label(req.uri().path());
        let start = Instant::now();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;

            let labels = [
                ("method", method),
                ("path", path.to_string()),
                ("status", response.status().as_u16().to_string()),
            ];

            metrics::counter!("http_requests_total", &labels).increment(1);
            metrics::histogram!("http_request_duration_seconds", &labels)
                .record(start.elapsed().as_secs_f64());

            Ok(response)
        })
    }
}

/// Map a request path to its bounded route label.
fn route_label(path: &str) -> &'static str {
    if let Some(known) = KNOWN_PATHS.iter().find(|known| **known == path) {
        return known;
    }

    match path.strip_prefix("/contacts/") {
        Some(id) if !id.is_empty() && !id.contains('/') => "/contacts/{id}",
        _ => "/*",
    }
}
