//! App Core for tabkeeper.
//!
//! Wires the tab host, the activation observer, the metadata probe and the
//! settings engine together and decides from settings whether the observer
//! should run.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::warn;

use crate::host::TabHost;
use crate::managers::activation_observer::{ActivationObserver, ActivationObserverTrait};
use crate::managers::tab_manager::TabManager;
use crate::services::metadata_probe::MetadataProbe;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::SettingsError;

/// Central application struct.
pub struct App {
    pub host: Arc<TabManager>,
    pub observer: ActivationObserver,
    pub probe: MetadataProbe,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Creates the app around a fresh in-memory tab host. Observation tasks
    /// run on `runtime`.
    pub fn new(settings_path: Option<String>, runtime: Handle) -> Self {
        let host = Arc::new(TabManager::new());
        let observer = ActivationObserver::new(Arc::clone(&host) as Arc<dyn TabHost>, runtime);
        Self {
            host,
            observer,
            probe: MetadataProbe::new(),
            settings_engine: SettingsEngine::new(settings_path),
        }
    }

    /// Loads settings and applies them. A broken settings file still leaves the
    /// app running on defaults; the load error is returned to the caller.
    pub fn startup(&mut self) -> Result<(), SettingsError> {
        let loaded = self.settings_engine.load();
        if let Err(ref err) = loaded {
            warn!(error = %err, "falling back to default settings");
        }
        self.apply_settings();
        loaded.map(|_| ())
    }

    /// Enables or disables the observer according to `observer.enabled`.
    pub fn apply_settings(&self) {
        if self.settings_engine.get_settings().observer.enabled {
            self.observer.enable();
        } else {
            self.observer.disable();
        }
    }
}
