//! Database module: connection pool, schema bootstrap, and queries.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and client projections
//! - `schema.rs`: embedded SQL DDL and statement splitting
//! - `mysql.rs`: `NotesStorage` — pool lifecycle and all queries

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::{DbUser, NewNote, Note, UserSummary};
pub use mysql::{MySqlPool, NotesStorage};
