use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tracing::debug;

use super::{ConfigStore, StoreError};

/// Store that serializes every read and write on a single mutex.
///
/// Holds no background resources; `close` only flips the store into its
/// closed state so later calls fail the same way `ChannelStore` does.
pub struct LockStore<C> {
    value: Mutex<Arc<C>>,
    closed: AtomicBool,
}

impl<C> LockStore<C> {
    /// Creates a store holding `initial`.
    pub fn new(initial: Arc<C>) -> Self {
        Self {
            value: Mutex::new(initial),
            closed: AtomicBool::new(false),
        }
    }

    /// Locks the slot, recovering from a poisoned lock.
    ///
    /// The slot only ever holds a fully built `Arc`, so a panic in another
    /// holder cannot leave it half written.
    fn slot(&self) -> MutexGuard<'_, Arc<C>> {
        match self.value.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl<C> ConfigStore<C> for LockStore<C>
where
    C: Send + Sync + 'static,
{
    async fn set(&self, value: Arc<C>) -> Result<(), StoreError> {
        self.ensure_open()?;
        *self.slot() = value;
        Ok(())
    }

    async fn get(&self) -> Result<Arc<C>, StoreError> {
        self.ensure_open()?;
        Ok(Arc::clone(&self.slot()))
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Lock store closed");
        }
    }
}
