//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub schema: String,
    pub bind_addr: SocketAddr,
    pub db_min_connections: u32,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub db_acquire_timeout: Duration,
    pub db_statement_timeout: Duration,
    /// Drop and recreate the schema on startup.
    pub db_reset: bool,
    /// Insert reference data (roles, categories, skills, job tags) on startup.
    pub db_seed: bool,
    pub request_body_limit: usize,
}

impl Settings {
    pub const DEFAULT_DATABASE_URL: &'static str = "postgres://localhost/jobboard";
    pub const DEFAULT_SCHEMA: &'static str = "jobboard";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let schema = get("JOBBOARD_SCHEMA").unwrap_or_else(|| Self::DEFAULT_SCHEMA.into());
        validate_schema(&schema)?;

        let settings = Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.into()),
            schema,
            bind_addr: parse(&get, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_min_connections: parse(&get, "DB_MIN_CONNECTIONS", 2)?,
            db_max_connections: parse(&get, "DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: Duration::from_secs(parse(&get, "DB_CONNECT_TIMEOUT_SECS", 30)?),
            db_acquire_timeout: Duration::from_secs(parse(&get, "DB_ACQUIRE_TIMEOUT_SECS", 60)?),
            db_statement_timeout: Duration::from_secs(parse(&get, "DB_STATEMENT_TIMEOUT_SECS", 60)?),
            db_reset: parse_bool(&get, "DB_RESET", false)?,
            db_seed: parse_bool(&get, "DB_SEED", true)?,
            request_body_limit: parse(&get, "REQUEST_BODY_LIMIT", 1024 * 1024)?,
        };
        if settings.db_max_connections == 0 || settings.db_min_connections > settings.db_max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                reason: format!(
                    "must be at least 1 and not below DB_MIN_CONNECTIONS ({})",
                    settings.db_min_connections
                ),
            });
        }
        Ok(settings)
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: format!("{:?}: {}", raw, e),
        }),
    }
}

fn parse_bool<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::InvalidValue {
            key,
            reason: format!("{:?} is not a boolean", v),
        }),
    }
}

/// Schema names are interpolated into DDL, so only plain identifiers are accepted.
fn validate_schema(name: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").map_err(|e| ConfigError::InvalidSchema(e.to_string()))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSchema(name.to_string()))
    }
}
