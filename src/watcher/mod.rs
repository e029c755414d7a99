//! Debounced watching of a single configuration file.
//!
//! `ConfigWatcher` listens to an `EventSource` for the watched path and runs a
//! change callback at most once per interval. It survives the path being
//! replaced rather than edited: a removal re-registers the path with the
//! source so the watch follows the replacement file.

mod session;
mod source;


pub use session::ConfigWatcher;
pub use source::{EventSource, FileEvent, FileEventKind, NotifySource};

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up or maintaining a watch.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The underlying event source could not be created
    #[error("failed to initialize file watcher: {details}")]
    Init {
        /// Event source error details
        details: String,
    },

    /// The path could not be registered with the event source
    #[error("failed to watch '{path}': {details}")]
    Register {
        /// Path being registered
        path: PathBuf,
        /// Event source error details
        details: String,
    },

    /// The path could not be removed from the event source
    #[error("failed to stop watching '{path}': {details}")]
    Unregister {
        /// Path being unregistered
        path: PathBuf,
        /// Event source error details
        details: String,
    },
}
