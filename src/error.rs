use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("note owner does not exist")]
    UnknownUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Pool or server unreachable, as opposed to a statement that executed
    /// and failed.
    fn is_unavailable(err: &SqlxError) -> bool {
        matches!(
            err,
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) | SqlxError::Tls(_)
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid credentials".to_string(),
                },
            ),
            ApiError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "DUPLICATE_EMAIL".to_string(),
                    message: "email already registered".to_string(),
                },
            ),
            ApiError::UnknownUser => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "UNKNOWN_USER".to_string(),
                    message: "note owner does not exist".to_string(),
                },
            ),
            ApiError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_REQUEST".to_string(),
                    message: msg.clone(),
                },
            ),
            ApiError::Database(e) if Self::is_unavailable(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    code: "DB_UNAVAILABLE".to_string(),
                    message: "database is unavailable".to_string(),
                },
            ),
            ApiError::Database(_) | ApiError::Internal(_) | ApiError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
