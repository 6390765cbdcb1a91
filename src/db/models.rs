use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row. Deliberately not `Serialize`: the password hash must never
/// be able to reach a response body.
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Client-safe projection of a user, returned from login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<DbUser> for UserSummary {
    fn from(u: DbUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a note; field defaults are applied at the HTTP layer.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
}
