use serde::{Deserialize, Serialize};

/// Top-level extension settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExtensionSettings {
    #[serde(default)]
    pub observer: ObserverSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Settings for the neighbor-tab activation observer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObserverSettings {
    /// Feature toggle deciding whether the observer is enabled at startup.
    pub enabled: bool,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Level filter (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}
