use std::{fmt, path::Path};

use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, instrument};

use crate::reload::ReloadError;

/// Serialization format of the watched configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// TOML document
    #[default]
    Toml,
    /// JSON document
    Json,
}

impl ConfigFormat {
    /// Picks a format from the file extension, falling back to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    /// Parses `content` into a fully populated value.
    ///
    /// `path` is only used for error context.
    ///
    /// # Errors
    /// Returns `ReloadError::Parse` if the content is not a valid document of
    /// this format or does not match the shape of `C`.
    pub fn parse<C>(&self, content: &str, path: &Path) -> Result<C, ReloadError>
    where
        C: DeserializeOwned,
    {
        let parsed = match self {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|details| ReloadError::Parse {
            path: path.to_path_buf(),
            format: *self,
            details,
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Toml => write!(f, "toml"),
            ConfigFormat::Json => write!(f, "json"),
        }
    }
}

/// Reads and parses the configuration file at `path`.
///
/// # Errors
/// Returns `ReloadError::Read` if the file cannot be read and
/// `ReloadError::Parse` if its content cannot be deserialized.
#[instrument(skip_all, fields(path = %path.display(), format = %format))]
pub async fn load_config<C>(path: &Path, format: ConfigFormat) -> Result<C, ReloadError>
where
    C: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ReloadError::Read {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    debug!(bytes = content.len(), "Read configuration file");

    format.parse(&content, path)
}
