//! Config lifecycle tests.
//!
//! A settings file is bootstrapped from defaults, edited by hand, then read
//! by a newer build whose settings type has gained and lost fields.

use std::fs;

use ntest::timeout;
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

use stash_core::{load_config, save_json, StashError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SettingsV1 {
    port: u16,
    host: String,
    legacy_flag: bool,
}

impl Default for SettingsV1 {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            legacy_flag: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SettingsV2 {
    port: u16,
    host: String,
    log_level: String,
}

impl Default for SettingsV2 {
    fn default() -> Self {
        Self {
            port: 9000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[timeout(1000)]
#[test]
fn test_bootstrap_edit_and_reload() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("settings.json");

    let mut v1 = SettingsV1::default();
    load_config(&path, &mut v1).unwrap();
    assert_eq!(v1, SettingsV1::default());

    // Operator edits the port by hand
    let edited = fs::read_to_string(&path)
        .unwrap()
        .replace("8080", "8443");
    fs::write(&path, edited).unwrap();

    let mut reloaded = SettingsV1::default();
    load_config(&path, &mut reloaded).unwrap();
    assert_eq!(reloaded.port, 8443);

    // A newer build: shared fields come from the file, new fields keep defaults
    let mut v2 = SettingsV2::default();
    load_config(&path, &mut v2).unwrap();
    assert_eq!(
        v2,
        SettingsV2 {
            port: 8443,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
        }
    );

    // Saving from the new shape drops the legacy field
    save_json(&path, &v2).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("legacy_flag"));
    assert!(text.contains("log_level"));
}

#[timeout(1000)]
#[test]
fn test_corrupt_config_is_never_overwritten() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, b"\x00\x01garbage").unwrap();

    for _ in 0..2 {
        let mut settings = SettingsV1::default();
        let err = load_config(&path, &mut settings).unwrap_err();
        assert!(matches!(err, StashError::ConfigCorrupt { .. }));
        assert_eq!(settings, SettingsV1::default());
    }
    assert_eq!(fs::read(&path).unwrap(), b"\x00\x01garbage");
}

#[timeout(1000)]
#[test]
fn test_out_of_range_value_is_corrupt() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, r#"{"port": 70000}"#).unwrap();

    let mut settings = SettingsV1::default();
    let err = load_config(&path, &mut settings).unwrap_err();
    assert!(matches!(err, StashError::ConfigCorrupt { .. }));
}
