//! Startup settings read from the process environment.
//!
//! These are the inputs the pipeline needs before it can load anything:
//! where the configuration file lives, the bind port handed through to the
//! embedding service, and the debounce interval for reloads.

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Environment key holding the watched configuration file path.
pub const CONFIG_FILE_KEY: &str = "CONFIG_FILE_ADDR";

/// Environment key holding the bind port string.
pub const BIND_PORT_KEY: &str = "GRPC_BIND_PORT";

/// Environment key holding the update interval in whole seconds.
pub const UPDATE_INTERVAL_KEY: &str = "UPDATE_INTERVAL";

/// Errors raised while resolving startup settings.
#[derive(Error, Debug, PartialEq)]
pub enum StartupConfigError {
    /// A required key is absent or empty
    #[error("required environment variable '{key}' is not defined")]
    Missing {
        /// The key that was looked up
        key: String,
    },

    /// The update interval is not a non-negative whole number of seconds
    #[error("invalid update interval '{value}': {details}")]
    InvalidInterval {
        /// The raw value found in the environment
        value: String,
        /// Parse error details
        details: String,
    },
}

/// Resolved startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Path of the configuration file to load and watch.
    pub config_file: PathBuf,
    /// Bind port for the embedding service. Passed through untouched.
    pub bind_port: String,
    /// Debounce interval between reloads.
    pub update_interval: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// Returns `StartupConfigError` if any key is missing or the interval is malformed.
    pub fn from_env() -> Result<Self, StartupConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    ///
    /// # Errors
    /// Returns `StartupConfigError` if any key is missing or the interval is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| StartupConfigError::Missing {
                    key: key.to_string(),
                })
        };

        let config_file = PathBuf::from(required(CONFIG_FILE_KEY)?);
        let bind_port = required(BIND_PORT_KEY)?;
        let update_interval = parse_interval(&required(UPDATE_INTERVAL_KEY)?)?;

        Ok(Self {
            config_file,
            bind_port,
            update_interval,
        })
    }
}

fn parse_interval(raw: &str) -> Result<Duration, StartupConfigError> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| StartupConfigError::InvalidInterval {
            value: raw.to_string(),
            details: e.to_string(),
        })
}
