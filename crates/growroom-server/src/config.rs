//! Server configuration, read from environment variables.
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `DB_CONNECTION_STRING` | No | `growroom.db` | SQLite path or `:memory:` |
//! | `HOST` | No | `0.0.0.0` | Bind address |
//! | `PORT` | No | 3000 | HTTP server port |
//! | `JWT_SECRET` | Yes | - | HMAC secret for bearer tokens |
//! | `TOKEN_TTL_MINUTES` | No | 30 | Bearer token lifetime |
//!
//! `DB_CONNECTION_STRING` may carry a `sqlite://` prefix.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use growroom_api::accounts::DEFAULT_TOKEN_TTL_MINUTES;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DB_PATH: &str = "growroom.db";

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "secret", "dev-secret-change-me"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbLocation,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so parsing can be tested without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = parse_db_location(lookup("DB_CONNECTION_STRING").as_deref());
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                var: "PORT",
                message: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar("JWT_SECRET"))?;
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            return Err(ConfigError::InvalidValue {
                var: "JWT_SECRET",
                message: "still set to a placeholder".into(),
            });
        }

        let token_ttl_minutes = match lookup("TOKEN_TTL_MINUTES") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "TOKEN_TTL_MINUTES",
                        message: format!("expected a positive number of minutes, got '{raw}'"),
                    });
                }
            },
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        Ok(Self {
            db,
            host,
            port,
            jwt_secret,
            token_ttl_minutes,
        })
    }
}

fn parse_db_location(raw: Option<&str>) -> DbLocation {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DB_PATH);
    let path = raw.strip_prefix("sqlite://").unwrap_or(raw);
    if path == ":memory:" {
        DbLocation::Memory
    } else {
        DbLocation::File(PathBuf::from(path))
    }
}
