use std::sync::Arc;

use async_trait::async_trait;
use tokio::{
    sync::{
        mpsc::{self, Receiver, Sender},
        oneshot,
    },
    task::JoinHandle,
};
use tracing::debug;

use super::{ConfigStore, StoreError};

/// Requests serviced by the store task
enum StoreCommand<C> {
    /// Hand the current value back to a reader
    Get { reply: oneshot::Sender<Arc<C>> },
    /// Replace the current value and acknowledge once stored
    Set {
        value: Arc<C>,
        reply: oneshot::Sender<()>,
    },
    /// Stop the task
    Close,
}

/// Store whose value is owned by one dedicated task.
///
/// Readers and writers never touch the value directly. They send a request
/// and wait for the task's reply, and the task services exactly one request
/// per iteration. Requests still queued when the task stops resolve to
/// `StoreError::Closed`.
pub struct ChannelStore<C> {
    command_tx: Sender<StoreCommand<C>>,
    _handle: JoinHandle<()>,
}

impl<C> ChannelStore<C>
where
    C: Send + Sync + 'static,
{
    /// Creates a store holding `initial` and spawns its task.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn new(initial: Arc<C>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            store_loop(initial, command_rx).await;
        });

        Self {
            command_tx,
            _handle: handle,
        }
    }

    async fn request(&self, command: StoreCommand<C>) -> Result<(), StoreError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| StoreError::Closed)
    }
}

#[async_trait]
impl<C> ConfigStore<C> for ChannelStore<C>
where
    C: Send + Sync + 'static,
{
    async fn set(&self, value: Arc<C>) -> Result<(), StoreError> {
        let (reply, ack) = oneshot::channel();
        self.request(StoreCommand::Set { value, reply }).await?;
        ack.await.map_err(|_| StoreError::Closed)
    }

    async fn get(&self) -> Result<Arc<C>, StoreError> {
        let (reply, value) = oneshot::channel();
        self.request(StoreCommand::Get { reply }).await?;
        value.await.map_err(|_| StoreError::Closed)
    }

    async fn close(&self) {
        // A failed send means the task already stopped.
        let _ = self.request(StoreCommand::Close).await;
    }
}

/// Owns the value and services requests until closed or abandoned.
async fn store_loop<C>(mut value: Arc<C>, mut command_rx: Receiver<StoreCommand<C>>) {
    while let Some(command) = command_rx.recv().await {
        match command {
            StoreCommand::Get { reply } => {
                let _ = reply.send(Arc::clone(&value));
            }

            StoreCommand::Set { value: next, reply } => {
                value = next;
                let _ = reply.send(());
            }

            StoreCommand::Close => {
                debug!("Channel store closed");
                break;
            }
        }
    }
}
