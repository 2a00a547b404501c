//! Mirrordeck GUI - Tauri Application Entry Point
//!
//! The native shell around the mirror control panel: it exposes the IPC
//! commands the webview invokes and runs the background device poller.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

mod commands;
mod state;

use commands::{
    adb_connect, adb_disconnect, default_options, list_devices, load_settings, mirror_status,
    preview_command, reset_settings, save_settings, select_device, selected_device, start_mirror,
    stop_mirror,
};
use mirrordeck_core::{
    adb::AdbClient,
    notice_for_event,
    tracker::{DeviceWatcher, POLL_INTERVAL},
};
use state::AppState;
use std::sync::Arc;
use tauri::Manager;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    let app_state = AppState::new().expect("failed to initialize application state");

    tauri::Builder::default()
        .manage(app_state)
        .setup(|app| {
            // Background device poller; the webview receives a
            // `device-update` per poll and a `notice` per connection event.
            let handle = app.handle();
            let state = app.state::<AppState>();
            let client = AdbClient::new(&state.toolchain);
            let tracker = Arc::clone(&state.tracker);

            tauri::async_runtime::spawn(async move {
                let (mut rx, _poller) = DeviceWatcher::spawn(client, POLL_INTERVAL, tracker);
                while let Some(update) = rx.recv().await {
                    for event in &update.events {
                        let _ = handle.emit_all("notice", &notice_for_event(event));
                    }
                    let _ = handle.emit_all("device-update", &update);
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            list_devices,
            select_device,
            selected_device,
            adb_connect,
            adb_disconnect,
            preview_command,
            default_options,
            start_mirror,
            stop_mirror,
            mirror_status,
            load_settings,
            save_settings,
            reset_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
