use std::{
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, instrument, warn};

use super::{EventSource, FileEvent, FileEventKind, NotifySource, WatchError};

const MIN_INTERVAL: Duration = Duration::from_millis(1);
const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A live watch on one configuration file.
///
/// The watch loop runs on its own task and owns the event source. Raw events
/// only mark a change as pending; the callback runs on the next interval tick,
/// so any burst of events within one interval produces a single callback.
pub struct ConfigWatcher {
    path: PathBuf,
    interval: Duration,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ConfigWatcher {
    /// Starts watching `path` with the platform's native event source.
    ///
    /// `on_change` is awaited inside the watch loop, at most once per
    /// `interval`. It must not block indefinitely or further events stall.
    ///
    /// # Errors
    /// Returns `WatchError` if the event source cannot be created or the path
    /// cannot be registered.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn watch_file<F, Fut>(
        path: impl Into<PathBuf>,
        interval: Duration,
        on_change: F,
    ) -> Result<Self, WatchError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (source, events) = NotifySource::new()?;
        Self::with_source(source, events, path, interval, on_change)
    }

    /// Starts watching `path` with a caller-provided event source.
    ///
    /// Every event delivered on `events` is treated as concerning `path`.
    ///
    /// # Errors
    /// Returns `WatchError` if the path cannot be registered with `source`.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn with_source<S, F, Fut>(
        mut source: S,
        events: mpsc::UnboundedReceiver<FileEvent>,
        path: impl Into<PathBuf>,
        interval: Duration,
        on_change: F,
    ) -> Result<Self, WatchError>
    where
        S: EventSource,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let path = path.into();
        source.watch(&path)?;

        let interval = if interval < MIN_INTERVAL {
            warn!(?interval, minimum = ?MIN_INTERVAL, "Watch interval too small, clamping");
            MIN_INTERVAL
        } else if interval > MAX_INTERVAL {
            warn!(?interval, maximum = ?MAX_INTERVAL, "Watch interval too large, clamping");
            MAX_INTERVAL
        } else {
            interval
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let watch_loop = WatchLoop {
            source,
            events,
            path: path.clone(),
            registered: true,
            pending: false,
        };

        let handle = tokio::spawn(watch_loop.run(interval, shutdown_rx, on_change));

        info!(path = %path.display(), ?interval, "Watching configuration file");

        Ok(Self {
            path,
            interval,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Returns the watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the effective debounce interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true while the watch loop is still running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signals the watch loop to stop. Safe to call more than once.
    ///
    /// A callback already in progress is not cancelled.
    pub fn close(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
            debug!(path = %self.path.display(), "Watcher close requested");
        }
    }

    /// Stops the watch loop and waits for it to exit.
    ///
    /// Once this returns no callback is running and the event source has been
    /// released.
    pub async fn shutdown(mut self) {
        self.close();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Watch loop ended abnormally");
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

/// State owned by the watch loop task.
struct WatchLoop<S> {
    source: S,
    events: mpsc::UnboundedReceiver<FileEvent>,
    path: PathBuf,
    /// False while the path is missing after a removal.
    registered: bool,
    pending: bool,
}

impl<S: EventSource> WatchLoop<S> {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn run<F, Fut>(
        mut self,
        period: Duration,
        mut shutdown_rx: oneshot::Receiver<()>,
        mut on_change: F,
    ) where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let now = Instant::now();
        let start = now.checked_add(period).unwrap_or(now + MAX_INTERVAL);
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown_rx => {
                    debug!("Shutdown requested");
                    break;
                }

                // Polled before events: a steady event stream must not delay the tick.
                _ = ticker.tick() => {
                    if !self.registered && !self.register() {
                        continue;
                    }

                    if self.pending {
                        self.pending = false;
                        info!("Configuration file changed");
                        on_change().await;
                    }
                }

                event = self.events.recv() => {
                    let Some(event) = event else {
                        warn!("Event source closed, stopping watcher");
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }

        debug!("Watch loop stopped");
    }

    fn handle_event(&mut self, event: FileEvent) {
        match event.kind {
            FileEventKind::Removed => {
                debug!(event_path = %event.path.display(), "Watched file removed, re-registering");

                // The watch is usually gone already along with the old file.
                if let Err(e) = self.source.unwatch(&self.path) {
                    debug!(error = %e, "Unwatch after removal failed");
                }

                self.register();
                self.pending = true;
            }

            FileEventKind::Modified => {
                self.pending = true;
            }

            FileEventKind::Created | FileEventKind::Other => {}
        }
    }

    /// Registers the path with the source, recording whether it succeeded.
    ///
    /// A successful registration after a failed one marks a change pending,
    /// since the file has come back with unknown content.
    fn register(&mut self) -> bool {
        match self.source.watch(&self.path) {
            Ok(()) => {
                if !self.registered {
                    debug!("Watched file is back, registration restored");
                    self.pending = true;
                }
                self.registered = true;
            }
            Err(e) => {
                if self.registered {
                    warn!(error = %e, "Watched file missing, retrying every interval");
                }
                self.registered = false;
            }
        }
        self.registered
    }
}
