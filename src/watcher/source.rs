use std::path::{Path, PathBuf};

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind,
    recommended_watcher,
};
use tokio::sync::mpsc;
use tracing::trace;

use super::WatchError;

/// Represents a file system event for the watched file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEvent {
    /// The path the event was reported for
    pub path: PathBuf,
    /// The type of change that occurred
    pub kind: FileEventKind,
}

/// The type of file system change that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    /// File content was written
    Modified,
    /// File was created
    Created,
    /// File was removed, or moved away from the watched path
    Removed,
    /// Anything else (metadata, access)
    Other,
}

impl FileEvent {
    /// Creates an event for `path`.
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Source of raw file system events for registered paths.
///
/// The watch loop owns its source exclusively; events are delivered on the
/// channel handed out when the source was created.
pub trait EventSource: Send + 'static {
    /// Starts delivering events for `path`.
    ///
    /// # Errors
    /// Returns `WatchError::Register` if the path cannot be watched.
    fn watch(&mut self, path: &Path) -> Result<(), WatchError>;

    /// Stops delivering events for `path`.
    ///
    /// # Errors
    /// Returns `WatchError::Unregister` if the path was not being watched.
    fn unwatch(&mut self, path: &Path) -> Result<(), WatchError>;
}

/// Event source backed by the platform's native notification API.
///
/// Paths are registered as given, not canonicalized. A watched symlink is
/// resolved by the kernel at registration time, so re-registering the same
/// path after a swap picks up the new target.
pub struct NotifySource {
    watcher: RecommendedWatcher,
}

impl NotifySource {
    /// Creates a new source and returns it with its event receiver.
    ///
    /// Uses an unbounded channel since file events are typically infrequent but bursty.
    ///
    /// # Errors
    /// Returns `WatchError::Init` if the platform watcher cannot be initialized.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>), WatchError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            let kind = classify(&event.kind);
            trace!(?event, ?kind, "Raw file event");

            for path in event.paths {
                let _ = event_tx.send(FileEvent::new(path, kind));
            }
        })
        .map_err(|e| WatchError::Init {
            details: e.to_string(),
        })?;

        Ok((Self { watcher }, event_rx))
    }
}

impl EventSource for NotifySource {
    fn watch(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Register {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .unwatch(path)
            .map_err(|e| WatchError::Unregister {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
    }
}

/// Maps a notify event kind onto the kinds the watch loop acts on.
///
/// A rename of the watched file means the path no longer refers to the
/// watched inode, so it is reported as a removal.
pub(super) fn classify(kind: &EventKind) -> FileEventKind {
    match kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Remove(_) => FileEventKind::Removed,
        EventKind::Modify(ModifyKind::Name(_)) => FileEventKind::Removed,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => FileEventKind::Modified,
        _ => FileEventKind::Other,
    }
}
