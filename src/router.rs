use axum::{
    Router,
    routing::{get, post},
};

use crate::db::NotesStorage;
use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub storage: NotesStorage,
}

impl AppState {
    pub fn new(storage: NotesStorage) -> Self {
        Self { storage }
    }
}

pub fn noteboard_router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/notes", post(handlers::notes::create_note))
        // The path parameter is a user id for GET and a note id for DELETE.
        .route(
            "/notes/{id}",
            get(handlers::notes::list_notes).delete(handlers::notes::delete_note),
        )
        .with_state(state)
}
