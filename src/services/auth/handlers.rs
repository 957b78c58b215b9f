//! Axum handlers for `/auth/register` and `/auth/login`.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use contacts_core::AppError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::extract::JsonBody;
use crate::startup::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state.auth.register(&req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
