//! Configuration management for the intake Lambda.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database port
    pub db_port: u16,
    /// Database user
    pub db_user: String,
    /// Database password
    pub db_password: String,
    /// Database name
    pub db_name: String,
    /// Upper bound on connecting and on running the insert
    pub db_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Config(format!("{} not set", key)))
        };
        let non_empty = |key: &str| {
            required(key).and_then(|value| {
                if value.trim().is_empty() {
                    Err(Error::Config(format!("{} is empty", key)))
                } else {
                    Ok(value)
                }
            })
        };

        let db_port = match lookup("DB_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid DB_PORT {:?}: {}", port, e)))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("DB_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid DB_TIMEOUT_SECS {:?}: {}", secs, e)))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(Error::Config("DB_TIMEOUT_SECS must be positive".to_string()));
        }

        Ok(Self {
            db_host: non_empty("DB_HOST")?,
            db_port,
            db_user: non_empty("DB_USER")?,
            // An empty password is a legitimate MySQL setting.
            db_password: required("DB_PASSWORD")?,
            db_name: non_empty("DB_NAME")?,
            db_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("db_timeout", &self.db_timeout)
            .finish()
    }
}
