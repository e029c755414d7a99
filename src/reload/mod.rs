//! Re-reading the watched file into the store.
//!
//! The `Reloader` is the callback bound into the watcher. What happens when a
//! reload fails is governed by `ReloadPolicy`; the previous value always stays
//! in the store because a failed parse never reaches `set`.

#[cfg(test)]
mod tests;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::{
    config::{ConfigFormat, load_config},
    config_store::{SharedStore, StoreError},
};

/// Errors raised while reloading the configuration file.
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The file could not be read
    #[error("failed to read config file '{path}': {details}")]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// The file content could not be deserialized
    #[error("failed to parse {format} config '{path}': {details}")]
    Parse {
        /// Path of the configuration file
        path: PathBuf,
        /// Format the content was parsed as
        format: ConfigFormat,
        /// Deserializer error details
        details: String,
    },

    /// The parsed value could not be published
    #[error("failed to publish reloaded config: {0}")]
    Store(#[from] StoreError),

    /// The watch loop ended while the pipeline was still running
    #[error("configuration watcher stopped unexpectedly")]
    WatcherStopped,
}

/// What to do when a live reload fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReloadPolicy {
    /// Report the error as fatal; the process is expected to exit
    #[default]
    Fatal,
    /// Log the error and keep serving the previous value
    KeepStale,
}

impl fmt::Display for ReloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadPolicy::Fatal => write!(f, "fatal"),
            ReloadPolicy::KeepStale => write!(f, "keep-stale"),
        }
    }
}

/// Reloads the configuration file into a store.
pub struct Reloader<C> {
    path: PathBuf,
    format: ConfigFormat,
    store: SharedStore<C>,
    policy: ReloadPolicy,
    fatal_tx: mpsc::UnboundedSender<ReloadError>,
}

impl<C> Reloader<C>
where
    C: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a reloader and the receiver on which fatal errors are reported.
    pub fn new(
        path: impl Into<PathBuf>,
        format: ConfigFormat,
        store: SharedStore<C>,
        policy: ReloadPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ReloadError>) {
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

        let reloader = Self {
            path: path.into(),
            format,
            store,
            policy,
            fatal_tx,
        };

        (reloader, fatal_rx)
    }

    /// Returns the path this reloader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the policy applied on failure.
    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    /// Reads, parses and publishes the file once.
    ///
    /// # Errors
    /// Returns `ReloadError` if any step fails. The store is left untouched
    /// unless the value parsed completely.
    pub async fn reload(&self) -> Result<(), ReloadError> {
        let value: C = load_config(&self.path, self.format).await?;
        self.store.set(Arc::new(value)).await?;
        Ok(())
    }

    /// Runs one reload and applies the failure policy.
    ///
    /// This is the watcher callback.
    #[instrument(skip(self), fields(path = %self.path.display(), policy = %self.policy))]
    pub async fn on_change(&self) {
        let Err(e) = self.reload().await else {
            info!("Configuration reloaded");
            return;
        };

        match self.policy {
            ReloadPolicy::Fatal => {
                error!(error = %e, "Configuration reload failed");
                if self.fatal_tx.send(e).is_err() {
                    warn!("No listener for fatal reload errors");
                }
            }

            ReloadPolicy::KeepStale => {
                warn!(error = %e, "Configuration reload failed, keeping previous value");
            }
        }
    }
}
