use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Connection, MySql, MySqlConnection, Pool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::db::models::{DbUser, NewNote, Note};
use crate::db::schema;
use crate::error::ApiError;

pub type MySqlPool = Pool<MySql>;

/// Owns the connection pool and all queries against it. Constructed once in
/// `main` and handed to the router through state; there is no global pool.
#[derive(Clone)]
pub struct NotesStorage {
    pool: MySqlPool,
}

impl NotesStorage {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Bring storage up: ensure the database exists, build the bounded pool,
    /// then apply the schema. Runs before the HTTP listener binds; failure to
    /// reach the server here is fatal to startup.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ApiError> {
        ensure_database(cfg).await?;
        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(cfg.pool_options()?)
            .await?;
        let storage = Self::new(pool);
        storage.apply_schema().await;
        Ok(storage)
    }

    /// Execute each schema statement independently. A failing statement is
    /// logged and skipped rather than aborting initialization; the statements
    /// themselves are idempotent, so re-runs leave existing data untouched.
    pub async fn apply_schema(&self) {
        for stmt in schema::statements() {
            if let Err(e) = sqlx::query(stmt).execute(&self.pool).await {
                warn!(
                    error = %e,
                    statement = stmt.lines().next().unwrap_or(stmt),
                    "schema statement failed, skipping"
                );
            }
        }
        info!("schema applied");
    }

    /// Insert a user. A unique-key violation (email already taken) maps to
    /// `DuplicateEmail` instead of leaking driver error text to the client.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, ApiError> {
        let res = sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateEmail,
                _ => ApiError::Database(e),
            })?;
        Ok(res.last_insert_id() as i64)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<DbUser>, ApiError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn create_note(&self, note: NewNote) -> Result<i64, ApiError> {
        let res = sqlx::query(
            "INSERT INTO notes (user_id, title, content, color, pinned) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.color)
        .bind(note.pinned)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => ApiError::UnknownUser,
            _ => ApiError::Database(e),
        })?;
        Ok(res.last_insert_id() as i64)
    }

    /// All notes owned by a user, pinned first, then newest first. The `id`
    /// tiebreak keeps ordering stable for rows created within the same
    /// TIMESTAMP second.
    pub async fn notes_for_user(&self, user_id: i64) -> Result<Vec<Note>, ApiError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, content, color, pinned, created_at \
             FROM notes WHERE user_id = ? \
             ORDER BY pinned DESC, created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    /// Delete by id. Not existence-checked: zero rows affected is still
    /// success.
    pub async fn delete_note(&self, note_id: i64) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Connect to the server with no database selected and create the target
/// database if absent, with a fixed character set. The connection is closed
/// explicitly once the database exists; the pool reconnects with the database
/// selected.
async fn ensure_database(cfg: &DatabaseConfig) -> Result<(), ApiError> {
    let mut conn = MySqlConnection::connect_with(&cfg.server_options()?).await?;
    // cfg.name is validated as a bare identifier at config load.
    let ddl = format!(
        "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
        cfg.name
    );
    sqlx::query(&ddl).execute(&mut conn).await?;
    conn.close().await?;
    info!(database = %cfg.name, "database ensured");
    Ok(())
}
