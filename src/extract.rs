//! Request extractors with JSON error rejections.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use contacts_core::AppError;

/// `Json<T>` whose rejection is an `AppError::InvalidArgument`, so malformed
/// bodies get the same `{"message": ...}` shape as every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidArgument(rejection.body_text()))?;
        Ok(Self(value))
    }
}
