//! Axum handlers for `/contacts`.
//!
//! Each handler takes `AuthInfo` as an argument, so it cannot run for an
//! unauthenticated request.

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use contacts_core::{AppError, AuthInfo};
use contacts_db::Contact;
use http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use super::{ContactPatch, NewContact, parse_contact_id};
use crate::extract::JsonBody;
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedContactResponse {
    pub message: String,
    pub contact: Contact,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedContactResponse {
    pub update_contact: Contact,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedContactResponse {
    pub message: String,
    pub delete_contact: Contact,
}

/// Protected contact routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", patch(update_contact).delete(delete_contact))
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
async fn list_contacts(
    State(state): State<AppState>,
    auth: AuthInfo,
) -> Result<Json<Vec<Contact>>, AppError> {
    state.contacts.list(&auth).await.map(Json)
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
async fn create_contact(
    State(state): State<AppState>,
    auth: AuthInfo,
    JsonBody(input): JsonBody<NewContact>,
) -> Result<(StatusCode, Json<CreatedContactResponse>), AppError> {
    let contact = state.contacts.create(&auth, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedContactResponse {
            message: format!("Contact {} saved", contact.first_name),
            contact,
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %auth.user_id, contact_id = %id))]
async fn update_contact(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ContactPatch>,
) -> Result<Json<UpdatedContactResponse>, AppError> {
    let id = parse_contact_id(&id)?;
    let update_contact = state.contacts.update(&auth, id, &patch).await?;
    Ok(Json(UpdatedContactResponse { update_contact }))
}

#[instrument(skip_all, fields(user_id = %auth.user_id, contact_id = %id))]
async fn delete_contact(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(id): Path<String>,
) -> Result<Json<DeletedContactResponse>, AppError> {
    let id = parse_contact_id(&id)?;
    let delete_contact = state.contacts.delete(&auth, id).await?;

    Ok(Json(DeletedContactResponse {
        message: "Contact deleted".to_string(),
        delete_contact,
    }))
}
