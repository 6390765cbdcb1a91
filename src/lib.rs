pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod password;
pub mod router;

pub use error::ApiError;
