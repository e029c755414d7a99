use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use clap::ValueEnum;
use thiserror::Error;
use tokio::time;

use super::{ChannelStore, LockStore};

/// Errors returned by configuration stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store was closed before or while the request was serviced
    #[error("configuration store is closed")]
    Closed,

    /// The store did not answer within the caller's deadline
    #[error("configuration store did not respond within {deadline:?}")]
    Timeout {
        /// The deadline that elapsed
        deadline: Duration,
    },
}

/// Capability set shared by every store strategy.
///
/// After `set(v)` returns, any later `get` issued by the same caller returns
/// `v` or a newer value. Concurrent `set` calls are last-writer-wins.
#[async_trait]
pub trait ConfigStore<C>: Send + Sync
where
    C: Send + Sync + 'static,
{
    /// Publishes a new value, replacing the current one wholesale.
    ///
    /// # Errors
    /// Returns `StoreError::Closed` once the store has been closed.
    async fn set(&self, value: Arc<C>) -> Result<(), StoreError>;

    /// Returns the current value.
    ///
    /// # Errors
    /// Returns `StoreError::Closed` once the store has been closed.
    async fn get(&self) -> Result<Arc<C>, StoreError>;

    /// Closes the store. Safe to call more than once.
    async fn close(&self);

    /// Returns the current value, giving up after `deadline`.
    ///
    /// # Errors
    /// Returns `StoreError::Timeout` if the store does not answer in time and
    /// `StoreError::Closed` once the store has been closed.
    async fn get_within(&self, deadline: Duration) -> Result<Arc<C>, StoreError> {
        time::timeout(deadline, self.get())
            .await
            .map_err(|_| StoreError::Timeout { deadline })?
    }
}

/// Store handle shared between the reload path and readers.
pub type SharedStore<C> = Arc<dyn ConfigStore<C>>;

/// Selects which store strategy backs a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// Exclusive lock around the value
    #[default]
    Lock,
    /// Dedicated task owning the value, driven by request channels
    Channel,
}

impl StoreKind {
    /// Builds a store of this kind holding `initial`.
    ///
    /// # Panics
    /// `StoreKind::Channel` spawns a task and panics outside a Tokio runtime.
    pub fn build<C>(self, initial: Arc<C>) -> SharedStore<C>
    where
        C: Send + Sync + 'static,
    {
        match self {
            StoreKind::Lock => Arc::new(LockStore::new(initial)),
            StoreKind::Channel => Arc::new(ChannelStore::new(initial)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Lock => write!(f, "lock"),
            StoreKind::Channel => write!(f, "channel"),
        }
    }
}
