// tabkeeper Settings Engine
// Loads, saves and updates extension settings stored as a JSON file.
// Values are addressed with dot-separated keys such as "observer.enabled".

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ExtensionSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ExtensionSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ExtensionSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ExtensionSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, otherwise the platform settings path.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::default_settings_path()
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: ExtensionSettings::default(),
        }
    }

    /// Walks every segment but the last and returns the object holding the leaf.
    fn parent_object<'a>(
        root: &'a mut Value,
        key: &str,
        segments: &[&str],
    ) -> Result<&'a mut Map<String, Value>, SettingsError> {
        let mut current = root;
        for segment in segments {
            current = current
                .get_mut(*segment)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        }
        current.as_object_mut().ok_or_else(|| {
            SettingsError::InvalidKey(format!(
                "Cannot navigate to key '{}': intermediate value is not an object",
                key
            ))
        })
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the config file, falling back to defaults when the
    /// file does not exist. A malformed file is a serialization error.
    fn load(&mut self) -> Result<ExtensionSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ExtensionSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    /// Writes the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &ExtensionSettings {
        &self.settings
    }

    /// Updates one setting by dot-notation key and persists the result.
    ///
    /// The new value is validated by deserializing the whole tree back into
    /// `ExtensionSettings`; on failure nothing changes.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let segments: Vec<&str> = key.split('.').collect();
        if key.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(SettingsError::InvalidKey(format!("Malformed key '{}'", key)));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (leaf, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(SettingsError::InvalidKey(key.to_string())),
        };
        let parent = Self::parent_object(&mut tree, key, parents)?;
        if !parent.contains_key(*leaf) {
            return Err(SettingsError::InvalidKey(format!(
                "Key '{}' not found in settings",
                key
            )));
        }
        parent.insert(leaf.to_string(), value);

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.save()
    }

    /// Restores defaults and saves them.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ExtensionSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
