use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task;
use tracing::info;

use crate::db::UserSummary;
use crate::error::ApiError;
use crate::password;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /register -> 201 on success, 400 when the email is already taken.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_owned();
    let email = req.email.trim().to_owned();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidRequest(
            "username, email and password are required".to_string(),
        ));
    }

    // Argon2 is memory-hard; keep it off the async workers.
    let password_hash = task::spawn_blocking(move || password::hash(&req.password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;

    let id = state.storage.create_user(&username, &email, &password_hash).await?;
    info!(user = id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully"})),
    ))
}

/// POST /login -> 200 with a user summary on success.
///
/// An unknown email and a wrong password produce identical 401 responses so
/// the endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = state.storage.user_by_email(req.email.trim()).await? else {
        return Err(ApiError::InvalidCredentials);
    };

    let stored = user.password_hash.clone();
    let matches = task::spawn_blocking(move || password::verify(&req.password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))??;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    info!(user = user.id, "login successful");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: user.into(),
    }))
}
