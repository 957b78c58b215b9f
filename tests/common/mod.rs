#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use contacts_core::JwtValidator;
use contacts_db::Database;
use contacts_service::{AppState, build_cors, build_router};
use http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration_test_secret_key_32_chars!";

/// Full router over a fresh in-memory store.
pub fn app() -> Router {
    let jwt = JwtValidator::new(&SecretString::from(SECRET));
    let state = AppState::new(Database::in_memory(), jwt, 60);
    build_router(state, build_cors(None))
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// Register then log in, returning the access token.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let credentials = json!({ "email": email, "password": "secret123" });

    let (status, _) = send(app, "POST", "/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
