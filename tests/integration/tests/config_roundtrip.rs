//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use foodchat_core::config::{Config, DEFAULT_KDF_ITERATIONS};
use foodchat_core::Locale;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foodchat.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.locale, Locale::De);
    assert_eq!(loaded.vault.kdf_iterations, DEFAULT_KDF_ITERATIONS);
    assert!(loaded.vault.data_dir.is_none());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foodchat.json5");

    let mut config = Config::default();
    config.locale = Locale::En;
    config.vault.kdf_iterations = 300_000;
    config.vault.data_dir = Some(PathBuf::from("/srv/foodchat"));
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.locale, Locale::En);
    assert_eq!(loaded.vault.kdf_iterations, 300_000);
    assert_eq!(loaded.vault.data_dir, Some(PathBuf::from("/srv/foodchat")));
    assert_eq!(loaded.data_dir().unwrap(), PathBuf::from("/srv/foodchat"));
}

#[test]
fn test_config_hand_written_json5() {
    let config = Config::parse(
        r#"{
            // comments and trailing commas are fine
            locale: 'en',
            vault: { kdf_iterations: 150000, },
        }"#,
    )
    .unwrap();
    assert_eq!(config.locale, Locale::En);
    assert_eq!(config.vault.kdf_iterations, 150_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/foodchat.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
