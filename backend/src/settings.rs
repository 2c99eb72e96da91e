//! Process configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then configuration file, then `CARS_*`
//! environment variables, then command-line flags. [`AppSettings::validate`]
//! turns the raw layer into [`RuntimeConfig`] and is the single place that
//! decides whether the process may start.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;
use crate::outbound::security::SigningSecret;

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
/// Upload directory used when none is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Raw settings as loaded; see [`AppSettings::validate`].
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARS")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Secret used to sign bearer tokens.
    pub jwt_secret: Option<String>,
    /// Socket address to listen on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// Directory receiving uploaded images.
    #[ortho_config(default = PathBuf::from(DEFAULT_UPLOAD_DIR))]
    pub upload_dir: PathBuf,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url.as_ref().map(|_| ".."))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| ".."))
            .field("bind_addr", &self.bind_addr)
            .field("upload_dir", &self.upload_dir)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

/// Reasons the process refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("CARS_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("CARS_JWT_SECRET must be set")]
    MissingJwtSecret,
    #[error("CARS_BIND_ADDR `{value}` is not a socket address: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("CARS_DB_MAX_CONNECTIONS must be at least 1")]
    InvalidMaxConnections,
}

/// Validated configuration the server is built from.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_url: String,
    pub signing_secret: SigningSecret,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub db_max_connections: u32,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl AppSettings {
    /// Check required values and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the database URL or JWT secret is
    /// missing or blank, the bind address does not parse, or the connection
    /// limit is zero.
    pub fn validate(self) -> Result<RuntimeConfig, SettingsError> {
        let database_url =
            non_blank(self.database_url).ok_or(SettingsError::MissingDatabaseUrl)?;
        let signing_secret = non_blank(self.jwt_secret)
            .as_deref()
            .map(SigningSecret::new)
            .and_then(Result::ok)
            .ok_or(SettingsError::MissingJwtSecret)?;
        let bind_addr = self
            .bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                message: err.to_string(),
            })?;
        let db_max_connections = match self.db_max_connections {
            Some(0) => return Err(SettingsError::InvalidMaxConnections),
            Some(limit) => limit,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(RuntimeConfig {
            database_url,
            signing_secret,
            bind_addr,
            upload_dir: self.upload_dir,
            db_max_connections,
        })
    }
}
