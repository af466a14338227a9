//! Integration-level tests for the SettingsEngine public API.
//!
//! These exercise default loading, persistence of single values and reset.

use tabkeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabkeeper::types::errors::SettingsError;
use tabkeeper::types::settings::{ExtensionSettings, LogFormat};
use tempfile::TempDir;

/// SettingsEngine backed by a temp directory the caller keeps alive.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, ExtensionSettings::default());
    assert!(settings.observer.enabled, "observer is on by default");
    assert_eq!(settings.logging.level, "info");
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("observer.enabled", serde_json::Value::Bool(false))
            .unwrap();
    }

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert!(!settings.observer.enabled);
}

#[test]
fn test_reset_restores_defaults_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("logging.format", serde_json::json!("json"))
        .unwrap();
    assert_eq!(engine.get_settings().logging.format, LogFormat::Json);

    engine.reset().unwrap();

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), ExtensionSettings::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let result = engine.set_value("observer.coalesce", serde_json::Value::Bool(true));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_partial_file_fills_missing_sections() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"observer": {"enabled": false}}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert!(!settings.observer.enabled);
    assert_eq!(settings.logging, Default::default());
}
