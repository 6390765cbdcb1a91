use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;

use crate::error::ApiError;

/// Runtime configuration, sourced from defaults overlaid with `NOTES_*`
/// environment variables (nested fields use `__`, e.g.
/// `NOTES_DATABASE__PASSWORD`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ApiError> {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("NOTES_").split("__"))
            .extract()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ApiError> {
        self.database.password()?;
        if !is_bare_identifier(&self.database.name) {
            return Err(ApiError::Configuration(format!(
                "database name {:?} must contain only ascii letters, digits and underscores",
                self.database.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// The only secret; deliberately has no default. Startup fails fast when
    /// it is unset.
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "notes".to_string(),
            password: None,
            name: "notes_app".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 3,
        }
    }
}

impl DatabaseConfig {
    pub fn password(&self) -> Result<&str, ApiError> {
        self.password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ApiError::Configuration(
                    "database password is not set (NOTES_DATABASE__PASSWORD)".to_string(),
                )
            })
    }

    /// Options for talking to the server before the target database exists;
    /// no database is selected. Charset is pinned to utf8mb4 so client and
    /// stored data never disagree on collation.
    pub fn server_options(&self) -> Result<MySqlConnectOptions, ApiError> {
        Ok(MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password()?)
            .charset("utf8mb4"))
    }

    /// Options for pooled connections against the target database.
    pub fn pool_options(&self) -> Result<MySqlConnectOptions, ApiError> {
        Ok(self.server_options()?.database(&self.name))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn is_bare_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NOTES_DATABASE__PASSWORD", "secret");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.loglevel, "info");
            assert_eq!(cfg.server.host, "0.0.0.0");
            assert_eq!(cfg.server.port, 5000);
            assert_eq!(cfg.database.host, "127.0.0.1");
            assert_eq!(cfg.database.port, 3306);
            assert_eq!(cfg.database.user, "notes");
            assert_eq!(cfg.database.name, "notes_app");
            assert_eq!(cfg.database.max_connections, 10);
            assert_eq!(cfg.database.acquire_timeout_secs, 3);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_nested_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NOTES_DATABASE__PASSWORD", "secret");
            jail.set_env("NOTES_DATABASE__HOST", "db.internal");
            jail.set_env("NOTES_DATABASE__PORT", "3307");
            jail.set_env("NOTES_SERVER__PORT", "8080");
            jail.set_env("NOTES_LOGLEVEL", "debug");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.database.host, "db.internal");
            assert_eq!(cfg.database.port, 3307);
            assert_eq!(cfg.server.port, 8080);
            assert_eq!(cfg.loglevel, "debug");
            Ok(())
        });
    }

    #[test]
    fn missing_password_fails_fast() {
        figment::Jail::expect_with(|jail| {
            // Empty counts as missing, and shadows any value in the outer
            // environment.
            jail.set_env("NOTES_DATABASE__PASSWORD", "");
            let err = Config::load().expect_err("load should fail without a password");
            assert!(matches!(err, ApiError::Configuration(_)));
            Ok(())
        });
    }

    #[test]
    fn database_name_must_be_a_bare_identifier() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NOTES_DATABASE__PASSWORD", "secret");
            jail.set_env("NOTES_DATABASE__NAME", "notes;DROP DATABASE x");
            let err = Config::load().expect_err("load should reject the name");
            assert!(matches!(err, ApiError::Configuration(_)));
            Ok(())
        });
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let cfg = DatabaseConfig {
            password: Some(String::new()),
            ..DatabaseConfig::default()
        };
        assert!(cfg.password().is_err());
    }
}
