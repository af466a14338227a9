//! tabkeeper RPC Server — JSON over stdin/stdout.
//!
//! Protocol: one JSON object per line.
//! Request:  {"id":1, "method":"tabs.activate", "params":{"tab_id":3}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Observation tasks run on a background tokio runtime while requests are
//! read on the main thread.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::{error, warn};

use tabkeeper::app::App;
use tabkeeper::rpc_handler::handle_method;
use tabkeeper::services::logging::init_logging;
use tabkeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn respond(out: &mut impl Write, response: &Value) -> io::Result<()> {
    writeln!(out, "{}", response)?;
    out.flush()
}

fn main() {
    let settings_path = std::env::var("TABKEEPER_SETTINGS").ok();
    let logging = SettingsEngine::new(settings_path.clone())
        .load()
        .map(|s| s.logging)
        .unwrap_or_default();
    if let Err(err) = init_logging(&logging) {
        eprintln!("logging disabled: {}", err);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            error!(error = %err, "failed to start tokio runtime");
            std::process::exit(1);
        }
    };

    let mut app = App::new(settings_path, runtime.handle().clone());
    if let Err(err) = app.startup() {
        warn!(error = %err, "settings not loaded");
    }
    let app = Mutex::new(app);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if respond(&mut out, &ready).is_err() {
        return;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                let method = req.get("method").and_then(Value::as_str).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or_else(|| json!({}));
                match handle_method(&app, method, &params) {
                    Ok(result) => json!({"id": id, "result": result}),
                    Err(err) => json!({"id": id, "error": err}),
                }
            }
            Err(err) => json!({"id": null, "error": format!("parse error: {}", err)}),
        };

        if respond(&mut out, &response).is_err() {
            break;
        }
    }
}
