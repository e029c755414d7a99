//! hotconf - Hot-reloaded configuration for mounted config files.
//!
//! hotconf keeps an in-process configuration value fresh when the file backing
//! it is replaced on disk, the way orchestrators swap mounted config data:
//!
//! - Debounced file watching that survives atomic symlink swaps
//! - Interchangeable lock-based and channel-based configuration stores
//! - A reload orchestrator with a configurable failure policy
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hotconf::{
//!     config::AppConfig,
//!     pipeline::{Pipeline, PipelineOptions},
//!     settings::Settings,
//! };
//!
//! # async fn run() -> hotconf::Result<()> {
//! let settings = Settings::from_env()?;
//! let pipeline = Pipeline::<AppConfig>::start(settings, PipelineOptions::default()).await?;
//!
//! let config = pipeline.get().await?;
//! println!("Config loaded: {}", config.message);
//!
//! pipeline.clean_up().await;
//! # Ok(())
//! # }
//! ```

/// Configuration value definitions and parsing.
pub mod config;

/// Concurrency-safe configuration stores.
pub mod config_store;

/// Core error types and result aliases.
pub mod core;

/// Application-root wiring of store, reloader and watcher.
pub mod pipeline;

/// Reload orchestration and failure policy.
pub mod reload;

/// Startup settings read from the environment.
pub mod settings;

/// Logging setup.
pub mod tracing_config;

/// Debounced file watching.
pub mod watcher;

/// Re-exported core types for convenience.
pub use crate::core::{HotconfError, Result};
