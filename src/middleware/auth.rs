//! JWT authentication middleware.
//!
//! Validates Bearer tokens and injects `AuthInfo` into request extensions.
//! Requests to protected routes without a valid token never reach a handler.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use contacts_core::{AppError, AuthInfo, JwtError};
use http::{Request, Response};
use phf::phf_set;
use tower::{Layer, Service};
use tracing::{Span, debug, warn};

use crate::services::AuthService;

/// Public routes that bypass authentication.
/// Uses compile-time perfect hash function for O(1) lookup with zero runtime initialization.
static PUBLIC_ROUTES: phf::Set<&'static str> = phf_set! {
    "/auth/register",
    "/auth/login",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
    "/",
};

/// Tower layer for JWT authentication.
#[derive(Clone)]
pub struct AuthLayer {
    auth: AuthService,
}

impl AuthLayer {
    #[must_use]
    pub const fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            auth: self.auth.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    auth: AuthService,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Allow CORS preflight
        if req.method() == http::Method::OPTIONS {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        let path = req.uri().path();

        if is_public_route(path) {
            debug!(path, "Public route - skipping auth");
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        match self.authenticate(&req) {
            Ok(auth_info) => {
                Span::current().record("user_id", auth_info.user_id.to_string());
                debug!(user_id = %auth_info.user_id, "Authenticated");
                req.extensions_mut().insert(auth_info);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                warn!(path = req.uri().path(), error = %err, "Rejected unauthenticated request");
                let response = err.into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

impl<S> AuthMiddleware<S> {
    fn authenticate<T>(&self, req: &Request<T>) -> Result<AuthInfo, AppError> {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(JwtError::MissingHeader)?;

        let token = bearer_token(header).ok_or(JwtError::InvalidFormat)?;

        self.auth.verify(token)
    }
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Check if path is public.
fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(path)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::body::to_bytes;
    use contacts_core::JwtValidator;
    use contacts_db::Database;
    use http::StatusCode;
    use secrecy::SecretString;
    use tower::util::BoxCloneService;
    use tower::{ServiceExt, service_fn};

    use super::*;

    #[test]
    fn public_routes_identified_correctly() {
        assert!(is_public_route("/auth/register"));
        assert!(is_public_route("/auth/login"));
        assert!(is_public_route("/health"));
        assert!(is_public_route("/health/ready"));
        assert!(is_public_route("/metrics"));
        assert!(is_public_route("/"));
        // Protected routes
        assert!(!is_public_route("/contacts"));
        assert!(!is_public_route("/contacts/8d3f1c8e-0000-0000-0000-000000000000"));
        assert!(!is_public_route("/auth/register/extra"));
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    fn auth_service() -> AuthService {
        let jwt = JwtValidator::new(&SecretString::from("test_secret_32_chars_minimum!!!!"));
        AuthService::new(Database::in_memory(), jwt, 60)
    }

    fn echo_user_id() -> BoxCloneService<Request<Body>, Response<Body>, Infallible> {
        BoxCloneService::new(service_fn(|req: Request<Body>| async move {
            let body = req
                .extensions()
                .get::<AuthInfo>()
                .map(|auth| auth.user_id.to_string())
                .unwrap_or_default();
            Ok::<_, Infallible>(Response::new(Body::from(body)))
        }))
    }

    fn get(path: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_before_the_handler() {
        let service = AuthLayer::new(auth_service()).layer(echo_user_id());

        let response = service
            .clone()
            .oneshot(get("/contacts", Some("Bearer invalid.token.here")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = service.oneshot(get("/contacts", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn verified_identity_reaches_the_handler() {
        let auth = auth_service();
        let user_id = auth.register("mw@test.com", "password1").await.unwrap();
        let token = auth.login("mw@test.com", "password1").await.unwrap();
        let service = AuthLayer::new(auth).layer(echo_user_id());

        let response = service
            .oneshot(get("/contacts", Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn public_route_skips_authentication() {
        let service = AuthLayer::new(auth_service()).layer(echo_user_id());

        let response = service.oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
