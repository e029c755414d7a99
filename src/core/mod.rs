use std::result;

use thiserror::Error;

use crate::{
    config_store::StoreError, reload::ReloadError, settings::StartupConfigError,
    watcher::WatchError,
};

/// Top-level error type for hotconf.
///
/// Each variant wraps the error of one pipeline stage so callers at the
/// application root can decide how to report it.
#[derive(Error, Debug)]
pub enum HotconfError {
    /// A required startup input is missing or malformed
    #[error(transparent)]
    Startup(#[from] StartupConfigError),

    /// The file watcher could not be created or could not register the path
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The configuration file could not be read or parsed
    #[error(transparent)]
    Reload(#[from] ReloadError),

    /// The configuration store rejected an operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A specialized `Result` type for hotconf operations.
pub type Result<T> = result::Result<T, HotconfError>;
