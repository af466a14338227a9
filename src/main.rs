//! tabkeeper — console demo.
//!
//! Walks through the neighbor-reload scenario on the in-memory tab host and
//! samples both probe schemas.

use std::sync::Arc;

use tabkeeper::app::App;
use tabkeeper::host::TabHost;
use tabkeeper::managers::activation_observer::{ActivationObserver, ActivationObserverTrait};
use tabkeeper::managers::tab_manager::{TabManager, TabManagerTrait};
use tabkeeper::services::logging::init_logging;
use tabkeeper::services::metadata_probe::{MetadataProbe, MetadataProbeTrait, PageState};
use tabkeeper::types::errors::TabError;
use tabkeeper::types::metadata::{PermissionState, ReadyState};
use tabkeeper::types::settings::LoggingSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = init_logging(&LoggingSettings::default()) {
        eprintln!("logging disabled: {}", err);
    }

    println!();
    println!("tabkeeper v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    report("Activation Observer", demo_neighbor_reload().await);
    report("Disable Race", demo_disable().await);
    demo_probe();
    demo_app().await;
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_strip(host: &TabManager, window_id: u32) {
    for tab in host.tabs_in_window(window_id) {
        println!(
            "    [{}] tab {} active={} discarded={}",
            tab.index, tab.id, tab.active, tab.discarded
        );
    }
}

fn report(demo: &str, result: Result<(), TabError>) {
    if let Err(err) = result {
        println!("  {} failed: {}", demo, err);
        println!();
    }
}

async fn demo_neighbor_reload() -> Result<(), TabError> {
    section("Activation Observer");

    let host = Arc::new(TabManager::new());
    let window = host.open_window();
    let ids = ["https://a.test", "https://b.test", "https://c.test", "https://d.test"]
        .into_iter()
        .map(|url| host.create_tab(window, Some(url), false))
        .collect::<Result<Vec<_>, _>>()?;
    host.discard_tab(ids[2])?;
    println!("  Window {} before activation:", window);
    print_strip(&host, window);

    let observer = ActivationObserver::new(
        Arc::clone(&host) as Arc<dyn TabHost>,
        tokio::runtime::Handle::current(),
    );
    observer.enable();
    println!("  Initial pass: {:?}", observer.settle().await);

    host.switch_tab(ids[1])?;
    println!("  Activated tab {}: {:?}", ids[1], observer.settle().await);
    print_strip(&host, window);
    println!("  Reloads issued: {:?}", host.reload_history());
    println!();
    Ok(())
}

async fn demo_disable() -> Result<(), TabError> {
    section("Disable Race");

    let host = Arc::new(TabManager::new());
    let window = host.open_window();
    let first = host.create_tab(window, None, true)?;
    let second = host.create_tab(window, None, false)?;
    let observer = ActivationObserver::new(
        Arc::clone(&host) as Arc<dyn TabHost>,
        tokio::runtime::Handle::current(),
    );
    observer.enable();
    println!("  Initial pass: {:?}", observer.settle().await);

    host.discard_tab(second)?;
    host.switch_tab(first)?;
    observer.disable();
    println!("  Disabled with a pass in flight: {:?}", observer.settle().await);
    println!("  Reloads issued: {:?}", host.reload_history());
    println!();
    Ok(())
}

fn demo_probe() {
    section("Metadata Probe");

    let probe = MetadataProbe::new();
    let top = PageState {
        frame_id: 1,
        top_frame_id: 1,
        load_start: Some(1_700_000_000_000.0),
        picture_in_picture: Some(false),
        notification_permission: Some(PermissionState::Granted),
        ready_state: Some(ReadyState::Complete),
        heap_size: None,
        form_input: Some(true),
    };
    println!("  Top frame:      {}", probe.collect(&top));
    println!("  Embedded frame: {}", probe.collect(&PageState::embedded(7, 1)));
    println!();
}

async fn demo_app() {
    section("App Core");

    let dir = std::env::temp_dir().join("tabkeeper-demo");
    let path = dir.join("settings.json").to_string_lossy().to_string();
    let mut app = App::new(Some(path), tokio::runtime::Handle::current());
    if let Err(err) = app.startup() {
        println!("  Settings fell back to defaults: {}", err);
    }
    println!("  Observer enabled from settings: {}", app.observer.is_enabled());
    println!("  Initial pass: {:?}", app.observer.settle().await);
    if dir.exists() {
        if let Err(err) = std::fs::remove_dir_all(&dir) {
            println!("  Could not remove demo settings: {}", err);
        }
    }
    println!();
}
