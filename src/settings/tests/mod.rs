//! Unit tests for settings resolution.
//! Uses an in-memory lookup instead of the process environment.

#![allow(clippy::unwrap_used)]

use std::{collections::HashMap, path::PathBuf, time::Duration};

use crate::settings::{
    BIND_PORT_KEY, CONFIG_FILE_KEY, Settings, StartupConfigError, UPDATE_INTERVAL_KEY,
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn resolves_all_keys() {
    let settings = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, "/etc/app/config.toml"),
        (BIND_PORT_KEY, "9090"),
        (UPDATE_INTERVAL_KEY, "5"),
    ]))
    .unwrap();

    assert_eq!(settings.config_file, PathBuf::from("/etc/app/config.toml"));
    assert_eq!(settings.bind_port, "9090");
    assert_eq!(settings.update_interval, Duration::from_secs(5));
}

#[test]
fn zero_interval_is_accepted() {
    let settings = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, "config.toml"),
        (BIND_PORT_KEY, "9090"),
        (UPDATE_INTERVAL_KEY, "0"),
    ]))
    .unwrap();

    assert_eq!(settings.update_interval, Duration::ZERO);
}

#[test]
fn missing_key_is_reported_by_name() {
    let err = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, "config.toml"),
        (UPDATE_INTERVAL_KEY, "5"),
    ]))
    .unwrap_err();

    assert_eq!(
        err,
        StartupConfigError::Missing {
            key: BIND_PORT_KEY.to_string()
        }
    );
}

#[test]
fn empty_value_counts_as_missing() {
    let err = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, ""),
        (BIND_PORT_KEY, "9090"),
        (UPDATE_INTERVAL_KEY, "5"),
    ]))
    .unwrap_err();

    assert!(matches!(err, StartupConfigError::Missing { key } if key == CONFIG_FILE_KEY));
}

#[test]
fn non_numeric_interval_is_rejected() {
    let err = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, "config.toml"),
        (BIND_PORT_KEY, "9090"),
        (UPDATE_INTERVAL_KEY, "5s"),
    ]))
    .unwrap_err();

    assert!(matches!(err, StartupConfigError::InvalidInterval { value, .. } if value == "5s"));
}

#[test]
fn negative_interval_is_rejected() {
    let err = Settings::from_lookup(lookup_from(&[
        (CONFIG_FILE_KEY, "config.toml"),
        (BIND_PORT_KEY, "9090"),
        (UPDATE_INTERVAL_KEY, "-1"),
    ]))
    .unwrap_err();

    assert!(matches!(err, StartupConfigError::InvalidInterval { .. }));
}
