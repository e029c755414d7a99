//! Application root wiring the store, reloader and watcher together.


use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{info, instrument};

use crate::{
    Result,
    config::{ConfigFormat, load_config},
    config_store::{SharedStore, StoreError, StoreKind},
    reload::{ReloadError, ReloadPolicy, Reloader},
    settings::Settings,
    watcher::ConfigWatcher,
};

/// Choices that shape a pipeline beyond its startup settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Store strategy holding the value
    pub store: StoreKind,
    /// What to do when a live reload fails
    pub policy: ReloadPolicy,
    /// Payload format; picked from the file extension when `None`
    pub format: Option<ConfigFormat>,
}

/// One configuration distribution pipeline: store, reloader and watcher.
///
/// Built once in the application root; readers receive `SharedStore`
/// handles rather than reaching for process-wide state.
pub struct Pipeline<C> {
    settings: Settings,
    store: SharedStore<C>,
    watcher: ConfigWatcher,
    fatal_rx: mpsc::UnboundedReceiver<ReloadError>,
}

impl<C> Pipeline<C>
where
    C: DeserializeOwned + Send + Sync + 'static,
{
    /// Loads the configuration file, publishes it and starts watching.
    ///
    /// # Errors
    /// Returns `HotconfError::Reload` if the initial load fails and
    /// `HotconfError::Watch` if the file cannot be watched.
    #[instrument(skip_all, fields(path = %settings.config_file.display(), store = %options.store))]
    pub async fn start(settings: Settings, options: PipelineOptions) -> Result<Self> {
        let format = options
            .format
            .unwrap_or_else(|| ConfigFormat::from_path(&settings.config_file));

        let initial: C = load_config(&settings.config_file, format).await?;
        let store = options.store.build(Arc::new(initial));

        let (reloader, fatal_rx) = Reloader::new(
            &settings.config_file,
            format,
            Arc::clone(&store),
            options.policy,
        );
        let reloader = Arc::new(reloader);

        let watcher = ConfigWatcher::watch_file(
            &settings.config_file,
            settings.update_interval,
            move || {
                let reloader = Arc::clone(&reloader);
                async move { reloader.on_change().await }
            },
        );

        let watcher = match watcher {
            Ok(watcher) => watcher,
            Err(e) => {
                store.close().await;
                return Err(e.into());
            }
        };

        info!(
            bind_port = %settings.bind_port,
            %format,
            policy = %options.policy,
            "Configuration pipeline started"
        );

        Ok(Self {
            settings,
            store,
            watcher,
            fatal_rx,
        })
    }

    /// Returns the settings the pipeline was started with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a handle to the store for readers.
    pub fn store(&self) -> SharedStore<C> {
        Arc::clone(&self.store)
    }

    /// Returns the current configuration value.
    ///
    /// # Errors
    /// Returns `StoreError::Closed` if the store has been closed.
    pub async fn get(&self) -> std::result::Result<Arc<C>, StoreError> {
        self.store.get().await
    }

    /// Waits for an error the pipeline cannot recover from.
    ///
    /// Resolves with a reload failure reported under `ReloadPolicy::Fatal`, or
    /// with `ReloadError::WatcherStopped` if the watch loop ends on its own.
    pub async fn fatal_error(&mut self) -> ReloadError {
        self.fatal_rx
            .recv()
            .await
            .unwrap_or(ReloadError::WatcherStopped)
    }

    /// Tears the pipeline down.
    ///
    /// The watcher is stopped first and any in-flight reload is allowed to
    /// finish, so no reload can reach a closed store.
    pub async fn clean_up(self) {
        let path = self.watcher.path().to_path_buf();

        self.watcher.shutdown().await;
        self.store.close().await;

        info!(path = %path.display(), "Configuration pipeline stopped");
    }
}
