//! Property-based test: any settings value survives save and load unchanged.

use proptest::prelude::*;
use tabkeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabkeeper::types::settings::{ExtensionSettings, LogFormat, LoggingSettings, ObserverSettings};
use tempfile::TempDir;

fn arb_settings() -> impl Strategy<Value = ExtensionSettings> {
    (
        any::<bool>(),
        prop_oneof![
            Just("trace"),
            Just("debug"),
            Just("info"),
            Just("warn"),
            Just("error")
        ],
        prop_oneof![Just(LogFormat::Pretty), Just(LogFormat::Json)],
    )
        .prop_map(|(enabled, level, format)| ExtensionSettings {
            observer: ObserverSettings { enabled },
            logging: LoggingSettings {
                level: level.to_string(),
                format,
            },
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn settings_survive_disk_roundtrip(settings in arb_settings()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().unwrap();
        engine.set_value("observer.enabled", serde_json::json!(settings.observer.enabled)).unwrap();
        engine.set_value("logging.level", serde_json::json!(settings.logging.level)).unwrap();
        engine.set_value("logging.format", serde_json::to_value(settings.logging.format).unwrap()).unwrap();

        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().unwrap(), settings);
    }
}
