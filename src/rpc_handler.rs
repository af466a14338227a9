//! RPC method handler for the tabkeeper JSON protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdio. Each
//! method maps onto the in-memory tab host, the observer lifecycle, the
//! metadata probe or the settings engine held by [`App`].

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::activation_observer::ActivationObserverTrait;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::metadata_probe::{MetadataProbeTrait, PageState};
use crate::services::settings_engine::SettingsEngineTrait;

fn param_u32(params: &Value, name: &str) -> Result<u32, String> {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| format!("missing {}", name))
}

fn observer_status(app: &App) -> Value {
    json!({
        "enabled": app.observer.is_enabled(),
        "generation": app.observer.generation(),
        "pending": app.observer.pending(),
    })
}

/// Dispatch one request. Returns the `result` payload or an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    let mut app = app.lock().map_err(|e| e.to_string())?;

    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Observer ───
        "observer.enable" => {
            app.observer.enable();
            Ok(observer_status(&app))
        }
        "observer.disable" => {
            app.observer.disable();
            Ok(observer_status(&app))
        }
        "observer.status" => Ok(observer_status(&app)),

        // ─── Windows ───
        "window.open" => {
            let window_id = app.host.open_window();
            Ok(json!({"window_id": window_id}))
        }
        "window.focus" => {
            let window_id = param_u32(params, "window_id")?;
            app.host.focus_window(window_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Tabs ───
        "tabs.create" => {
            let window_id = param_u32(params, "window_id")?;
            let url = params.get("url").and_then(Value::as_str);
            let active = params.get("active").and_then(Value::as_bool).unwrap_or(false);
            let tab_id = app
                .host
                .create_tab(window_id, url, active)
                .map_err(|e| e.to_string())?;
            Ok(json!({"tab_id": tab_id}))
        }
        "tabs.activate" => {
            let tab_id = param_u32(params, "tab_id")?;
            app.host.switch_tab(tab_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tabs.discard" => {
            let tab_id = param_u32(params, "tab_id")?;
            app.host.discard_tab(tab_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tabs.close" => {
            let tab_id = param_u32(params, "tab_id")?;
            app.host.close_tab(tab_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tabs.list" => {
            let window_id = match params.get("window_id") {
                Some(_) => param_u32(params, "window_id")?,
                None => app.host.focused_window().ok_or("no focused window")?,
            };
            Ok(json!({"items": app.host.tabs_in_window(window_id)}))
        }
        "tabs.reloads" => Ok(json!({"items": app.host.reload_history()})),

        // ─── Probe ───
        "probe.sample" => {
            let state: PageState = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid page state: {}", e))?;
            Ok(app.probe.collect(&state))
        }

        // ─── Settings ───
        "settings.get" => {
            serde_json::to_value(app.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(Value::as_str).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            app.apply_settings();
            serde_json::to_value(app.settings_engine.get_settings()).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
