//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an optional `config/{env}.toml` overlay, and
//! `DOCSPACE__*` environment variables. Each sub-module represents a
//! logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, PasswordHashingConfig, PasswordPolicyConfig};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::session::{SessionCleanupConfig, SessionConfig};

use crate::error::AppError;

/// Minimum signing key length accepted outside development.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Root application configuration.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session management settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml`, and environment
    /// variables prefixed with `DOCSPACE__` (e.g. `DOCSPACE__AUTH__JWT_SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCSPACE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate(env)?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self, env: &str) -> Result<(), AppError> {
        let relaxed = matches!(env, "development" | "test");

        if !relaxed && self.auth.jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_BYTES} bytes in '{env}'"
            )));
        }

        if self.session.ttl_seconds == 0 {
            return Err(AppError::configuration(
                "session.ttl_seconds must be greater than zero",
            ));
        }

        if self.database.provider == DatabaseProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres provider",
            ));
        }

        if self.auth.password_policy.min_score > 4 {
            return Err(AppError::configuration(
                "auth.password_policy.min_score must be between 0 and 4",
            ));
        }

        Ok(())
    }
}
