//! Configuration value definitions and parsing.
//!
//! The pipeline is generic over any deserializable value type. `AppConfig` is
//! the value type the bundled binary serves, and `ConfigFormat` selects the
//! deserializer applied to the raw file contents.

mod loading;

#[cfg(test)]
mod tests;

pub use loading::{ConfigFormat, load_config};

use serde::Deserialize;

/// Configuration served by the `hotconf` binary.
///
/// Every field is required so a document missing one fails to parse instead of
/// publishing a partially populated value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Message exposed to readers of the configuration.
    pub message: String,
}
