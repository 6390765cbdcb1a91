use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{NewNote, Note};
use crate::error::ApiError;
use crate::router::AppState;

pub const DEFAULT_COLOR: &str = "#fff";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Note creation payload. Every field except the owner is optional and falls
/// back to its column default.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub pinned: bool,
}

impl From<CreateNoteRequest> for NewNote {
    fn from(req: CreateNoteRequest) -> Self {
        Self {
            user_id: req.user_id,
            title: req.title,
            content: req.content,
            color: req.color,
            pinned: req.pinned,
        }
    }
}

/// POST /notes -> 201.
pub async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.storage.create_note(req.into()).await?;
    Ok((StatusCode::CREATED, Json(json!({"message": "Note added"}))))
}

/// GET /notes/{user_id} -> pinned notes first, then newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.storage.notes_for_user(user_id).await?))
}

/// DELETE /notes/{note_id} -> 200 whether or not the note existed.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.storage.delete_note(note_id).await?;
    Ok(Json(json!({"message": "Note deleted"})))
}
