//! hotconf daemon - serves a hot-reloaded configuration file.
//!
//! Startup inputs come from the environment (`CONFIG_FILE_ADDR`,
//! `GRPC_BIND_PORT`, `UPDATE_INTERVAL`); runtime choices come from flags.
//! Startup failures and fatal reload errors, including the watcher stopping
//! on its own, exit with status 1.

use std::{error::Error, process};

use clap::Parser;
use tracing::{Level, error, info, instrument, span};

use hotconf::{
    config::AppConfig,
    config_store::StoreKind,
    pipeline::{Pipeline, PipelineOptions},
    reload::ReloadPolicy,
    settings::Settings,
    tracing_config,
};

/// Keeps a mounted configuration file loaded and fresh.
#[derive(Debug, Parser)]
#[command(name = "hotconf", version)]
struct Cli {
    /// Store strategy holding the configuration value
    #[arg(long, value_enum, default_value_t = StoreKind::Lock)]
    store: StoreKind,

    /// What to do when a live reload fails
    #[arg(long, value_enum, default_value_t = ReloadPolicy::Fatal)]
    on_reload_error: ReloadPolicy,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_config::init()?;
    {
        let _span = span!(Level::INFO, "hotconf_main").entered();
        info!(store = %cli.store, policy = %cli.on_reload_error, "Starting hotconf");
    }

    serve(cli).await;

    Ok(())
}

/// Runs the pipeline until Ctrl-C or a failure it cannot recover from.
#[instrument(name = "hotconf_serve", skip_all)]
async fn serve(cli: Cli) {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid startup configuration");
            process::exit(1);
        }
    };

    let options = PipelineOptions {
        store: cli.store,
        policy: cli.on_reload_error,
        format: None,
    };

    let mut pipeline = match Pipeline::<AppConfig>::start(settings, options).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "Failed to start configuration pipeline");
            process::exit(1);
        }
    };

    match pipeline.get().await {
        Ok(config) => info!(message = %config.message, "Configuration loaded"),
        Err(e) => error!(error = %e, "Configuration store unavailable"),
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        }

        fatal = pipeline.fatal_error() => {
            error!(error = %fatal, "Fatal configuration error");
            process::exit(1);
        }
    }

    info!("Shutting down");
    pipeline.clean_up().await;
}
