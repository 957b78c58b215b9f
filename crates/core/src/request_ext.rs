//! Authenticated context extraction for axum handlers.
//!
//! The auth middleware validates the bearer token and inserts `AuthInfo` into
//! the request extensions. Protected handlers take `AuthInfo` as an argument:
//!
//! ```ignore
//! async fn list(State(state): State<AppState>, auth: AuthInfo) -> Result<Json<..>, AppError> {
//!     state.contacts.list(&auth).await.map(Json)
//! }
//! ```
//!
//! A handler that declares `AuthInfo` can never run without one.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::{AppError, AuthInfo};

impl<S> FromRequestParts<S> for AuthInfo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;
    use uuid::Uuid;

    #[tokio::test]
    async fn extracts_auth_info_when_present() {
        let auth = AuthInfo {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        let mut req = Request::new(());
        req.extensions_mut().insert(auth.clone());
        let (mut parts, ()) = req.into_parts();

        let extracted = AuthInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, auth);
    }

    #[tokio::test]
    async fn rejects_when_not_authenticated() {
        let (mut parts, ()) = Request::new(()).into_parts();

        let err = AuthInfo::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
