//! Tower middleware for the HTTP API.
//!
//! # Middleware Order
//! Layers added through one `ServiceBuilder` run top-to-bottom on the request:
//! 1. Request id - set `x-request-id` (generated when absent)
//! 2. Trace - request span carrying the request id and, later, the user id
//! 3. Metrics - request count and latency
//! 4. Timeout - 408 for hung requests
//! 5. CORS - answer preflight before auth
//! 6. Propagate request id onto the response
//! 7. Auth - JWT validation (skips public routes)

pub mod auth;
pub mod metrics;

pub use auth::AuthLayer;
pub use metrics::MetricsLayer;
