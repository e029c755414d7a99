//! Unit tests for config module
//!
//! Tests format selection and parsing of the bundled value type.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use tempfile::TempDir;

use crate::{
    config::{AppConfig, ConfigFormat, load_config},
    reload::ReloadError,
};

#[test]
fn format_from_extension() {
    assert_eq!(
        ConfigFormat::from_path(Path::new("/etc/app/config.toml")),
        ConfigFormat::Toml
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("settings.JSON")),
        ConfigFormat::Json
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("..data/config")),
        ConfigFormat::Toml
    );
}

#[test]
fn parses_toml_document() {
    let config: AppConfig = ConfigFormat::Toml
        .parse(r#"message = "hello""#, Path::new("config.toml"))
        .unwrap();

    assert_eq!(config.message, "hello");
}

#[test]
fn parses_json_document() {
    let config: AppConfig = ConfigFormat::Json
        .parse(r#"{"message": "hello"}"#, Path::new("config.json"))
        .unwrap();

    assert_eq!(config.message, "hello");
}

#[test]
fn missing_field_is_a_parse_error() {
    let result: Result<AppConfig, _> =
        ConfigFormat::Toml.parse("other = 1", Path::new("config.toml"));

    assert!(matches!(
        result,
        Err(ReloadError::Parse {
            format: ConfigFormat::Toml,
            ..
        })
    ));
}

#[test]
fn malformed_document_is_a_parse_error() {
    let result: Result<AppConfig, _> =
        ConfigFormat::Toml.parse("message = \"unterminated", Path::new("config.toml"));

    assert!(matches!(result, Err(ReloadError::Parse { .. })));
}

#[tokio::test]
async fn load_config_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "message = \"from disk\"\n").unwrap();

    let config: AppConfig = load_config(&path, ConfigFormat::Toml).await.unwrap();

    assert_eq!(config.message, "from disk");
}

#[tokio::test]
async fn load_config_missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result: Result<AppConfig, _> = load_config(&path, ConfigFormat::Toml).await;

    assert!(matches!(result, Err(ReloadError::Read { path: p, .. }) if p == path));
}
