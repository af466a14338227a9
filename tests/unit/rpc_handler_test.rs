use std::sync::Mutex;

use serde_json::{json, Value};
use tempfile::TempDir;

use tabkeeper::app::App;
use tabkeeper::managers::activation_observer::ActivationObserverTrait;
use tabkeeper::rpc_handler::handle_method;

fn app_in(dir: &TempDir) -> Mutex<App> {
    let path = dir.path().join("settings.json");
    let mut app = App::new(
        Some(path.to_string_lossy().into_owned()),
        tokio::runtime::Handle::current(),
    );
    app.startup().unwrap();
    Mutex::new(app)
}

fn call(app: &Mutex<App>, method: &str, params: Value) -> Value {
    handle_method(app, method, &params).unwrap()
}

async fn settle(app: &Mutex<App>) {
    let guard = app.lock().unwrap();
    let _ = guard.observer.settle().await;
}

#[tokio::test]
async fn test_ping() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    assert_eq!(call(&app, "ping", json!({})), json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    assert_eq!(
        handle_method(&app, "tabs.teleport", &json!({})),
        Err("unknown method: tabs.teleport".to_string())
    );
}

#[tokio::test]
async fn test_missing_params_are_reported() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    assert_eq!(
        handle_method(&app, "tabs.activate", &json!({})),
        Err("missing tab_id".to_string())
    );
    assert_eq!(
        handle_method(&app, "settings.set", &json!({"value": 1})),
        Err("missing key".to_string())
    );
}

#[tokio::test]
async fn test_observer_enabled_after_startup() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    let status = call(&app, "observer.status", json!({}));
    assert_eq!(status["enabled"], json!(true));
}

#[tokio::test]
async fn test_activation_reloads_discarded_neighbor() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);

    let window = call(&app, "window.open", json!({}))["window_id"].clone();
    let first = call(&app, "tabs.create", json!({"window_id": window}))["tab_id"].clone();
    let second = call(&app, "tabs.create", json!({"window_id": window}))["tab_id"].clone();
    settle(&app).await;

    call(&app, "tabs.discard", json!({"tab_id": second}));
    call(&app, "tabs.activate", json!({"tab_id": first}));
    settle(&app).await;

    assert_eq!(call(&app, "tabs.reloads", json!({})), json!({"items": [second]}));

    let listed = call(&app, "tabs.list", json!({}));
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["discarded"], json!(false));
}

#[tokio::test]
async fn test_disabled_observer_leaves_tabs_discarded() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);

    let window = call(&app, "window.open", json!({}))["window_id"].clone();
    let first = call(&app, "tabs.create", json!({"window_id": window}))["tab_id"].clone();
    let second = call(&app, "tabs.create", json!({"window_id": window}))["tab_id"].clone();
    settle(&app).await;

    let status = call(&app, "observer.disable", json!({}));
    assert_eq!(status["enabled"], json!(false));

    call(&app, "tabs.discard", json!({"tab_id": second}));
    call(&app, "tabs.activate", json!({"tab_id": first}));
    settle(&app).await;

    assert_eq!(call(&app, "tabs.reloads", json!({})), json!({"items": []}));
}

#[tokio::test]
async fn test_settings_set_applies_observer_toggle() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);

    let settings = call(
        &app,
        "settings.set",
        json!({"key": "observer.enabled", "value": false}),
    );
    assert_eq!(settings["observer"]["enabled"], json!(false));
    assert!(!app.lock().unwrap().observer.is_enabled());

    call(&app, "settings.set", json!({"key": "observer.enabled", "value": true}));
    assert!(app.lock().unwrap().observer.is_enabled());
}

#[tokio::test]
async fn test_settings_set_rejects_bad_value() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    let result = handle_method(
        &app,
        "settings.set",
        &json!({"key": "observer.enabled", "value": "sometimes"}),
    );
    assert!(result.is_err());
    assert_eq!(call(&app, "settings.get", json!({}))["observer"]["enabled"], json!(true));
}

#[tokio::test]
async fn test_probe_sample_by_frame_role() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);

    let top = call(
        &app,
        "probe.sample",
        json!({"frame_id": 0, "top_frame_id": 0, "ready_state": "complete", "heap_size": 4096}),
    );
    assert_eq!(
        top,
        json!({
            "time": false,
            "audible": false,
            "permission": false,
            "ready": true,
            "memory": 4096,
            "forms": false
        })
    );

    let embedded = call(
        &app,
        "probe.sample",
        json!({"frame_id": 7, "top_frame_id": 0, "form_input": true}),
    );
    assert_eq!(embedded, json!({"audible": false, "forms": true}));
}

#[tokio::test]
async fn test_tabs_list_without_window_fails() {
    let dir = TempDir::new().unwrap();
    let app = app_in(&dir);
    assert_eq!(
        handle_method(&app, "tabs.list", &json!({})),
        Err("no focused window".to_string())
    );
}
