// tabkeeper platform paths
// Resolves where the settings file lives on each supported OS.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "tabkeeper";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabkeeper`, else `~/.config/tabkeeper`
/// - **macOS**: `~/Library/Application Support/tabkeeper`
/// - **Windows**: `%APPDATA%/tabkeeper`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        match env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join(APP_DIR),
            Err(_) => home_dir().join("AppData").join("Roaming").join(APP_DIR),
        }
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
            _ => home_dir().join(".config").join(APP_DIR),
        }
    }
}

/// Default location of the settings file.
pub fn default_settings_path() -> PathBuf {
    get_config_dir().join("settings.json")
}
