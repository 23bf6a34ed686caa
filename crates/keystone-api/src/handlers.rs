//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use keystone_auth::{CreateUserCommand, CreateUserResult, LoginRequest, LoginResponse};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::{ApiError, AppState};

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Dropping the request future (client gone) cancels the use case.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = state.login.execute(&request, &cancel).await?;
    tracing::info!(username = %request.username, "login succeeded");
    Ok(Json(response))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(command): Json<CreateUserCommand>,
) -> Result<(StatusCode, Json<CreateUserResult>), ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let created = state.create_user.execute(&command, &cancel).await?;
    tracing::info!(user_id = %created.id, "user created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
