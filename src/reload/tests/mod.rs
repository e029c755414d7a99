//! Unit tests for the reload orchestrator.

#![allow(clippy::unwrap_used)]

use std::{fs, path::PathBuf, sync::Arc};

use tempfile::TempDir;

use crate::{
    config::{AppConfig, ConfigFormat},
    config_store::{SharedStore, StoreError, StoreKind},
    reload::{ReloadError, ReloadPolicy, Reloader},
};

fn initial() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        message: "initial".to_string(),
    })
}

fn setup(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[tokio::test]
async fn reload_publishes_new_value() {
    let (_dir, path) = setup("message = \"updated\"\n");

    for kind in [StoreKind::Lock, StoreKind::Channel] {
        let store: SharedStore<AppConfig> = kind.build(initial());
        let (reloader, _fatal) =
            Reloader::new(&path, ConfigFormat::Toml, Arc::clone(&store), ReloadPolicy::Fatal);

        reloader.reload().await.unwrap();

        assert_eq!(reloader.path(), path.as_path());
        assert_eq!(reloader.policy(), ReloadPolicy::Fatal);
        assert_eq!(store.get().await.unwrap().message, "updated", "{kind}");
    }
}

#[tokio::test]
async fn parse_failure_leaves_store_untouched() {
    let (_dir, path) = setup("message = [not toml");
    let store: SharedStore<AppConfig> = StoreKind::Lock.build(initial());
    let (reloader, _fatal) =
        Reloader::new(&path, ConfigFormat::Toml, Arc::clone(&store), ReloadPolicy::Fatal);

    let result = reloader.reload().await;

    assert!(matches!(result, Err(ReloadError::Parse { .. })));
    assert_eq!(store.get().await.unwrap().message, "initial");
}

#[tokio::test]
async fn fatal_policy_reports_parse_failure() {
    let (_dir, path) = setup("unexpected = true\n");
    let store: SharedStore<AppConfig> = StoreKind::Lock.build(initial());
    let (reloader, mut fatal) =
        Reloader::new(&path, ConfigFormat::Toml, Arc::clone(&store), ReloadPolicy::Fatal);

    reloader.on_change().await;

    let error = fatal.try_recv().unwrap();
    assert!(matches!(error, ReloadError::Parse { path: p, .. } if p == path));
    assert_eq!(store.get().await.unwrap().message, "initial");
}

#[tokio::test]
async fn keep_stale_policy_swallows_failure() {
    let (_dir, path) = setup("message = ");
    let store: SharedStore<AppConfig> = StoreKind::Channel.build(initial());
    let (reloader, mut fatal) = Reloader::new(
        &path,
        ConfigFormat::Toml,
        Arc::clone(&store),
        ReloadPolicy::KeepStale,
    );

    reloader.on_change().await;

    assert!(fatal.try_recv().is_err());
    assert_eq!(store.get().await.unwrap().message, "initial");
}

#[tokio::test]
async fn successful_change_reports_nothing() {
    let (_dir, path) = setup("message = \"fresh\"\n");
    let store: SharedStore<AppConfig> = StoreKind::Lock.build(initial());
    let (reloader, mut fatal) =
        Reloader::new(&path, ConfigFormat::Toml, Arc::clone(&store), ReloadPolicy::Fatal);

    reloader.on_change().await;

    assert!(fatal.try_recv().is_err());
    assert_eq!(store.get().await.unwrap().message, "fresh");
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.toml");
    let store: SharedStore<AppConfig> = StoreKind::Lock.build(initial());
    let (reloader, _fatal) =
        Reloader::new(&path, ConfigFormat::Toml, store, ReloadPolicy::Fatal);

    let result = reloader.reload().await;

    assert!(matches!(result, Err(ReloadError::Read { .. })));
}

#[tokio::test]
async fn closed_store_is_a_store_error() {
    let (_dir, path) = setup("message = \"late\"\n");
    let store: SharedStore<AppConfig> = StoreKind::Channel.build(initial());
    store.close().await;
    let (reloader, _fatal) =
        Reloader::new(&path, ConfigFormat::Toml, store, ReloadPolicy::Fatal);

    let result = reloader.reload().await;

    assert!(matches!(result, Err(ReloadError::Store(StoreError::Closed))));
}

#[test]
fn policy_defaults_to_fatal() {
    assert_eq!(ReloadPolicy::default(), ReloadPolicy::Fatal);
    assert_eq!(ReloadPolicy::KeepStale.to_string(), "keep-stale");
}
