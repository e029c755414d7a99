//! Concurrency-safe configuration holders.
//!
//! A store keeps exactly one published configuration value and hands out
//! shared snapshots of it. Two strategies implement the same `ConfigStore`
//! capability set: `LockStore` serializes access on a mutex, `ChannelStore`
//! gives the value to a dedicated task that services one request at a time.

mod channel;
mod lock;
mod store;


pub use channel::ChannelStore;
pub use lock::LockStore;
pub use store::{ConfigStore, SharedStore, StoreError, StoreKind};
