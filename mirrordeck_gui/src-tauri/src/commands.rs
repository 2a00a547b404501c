//! Tauri commands for the GUI
//!
//! The IPC surface the webview invokes: device listing and wifi bridging,
//! mirror start/stop, command preview, and settings persistence. Events
//! flow the other way on the `device-update`, `notice`, `mirror-log` and
//! `mirror-status` channels.

use mirrordeck_core::{
    classify_line, notice_for_event,
    adb::{AdbClient, Device},
    options::MirrorOptions,
    session::SessionEvent,
    settings::Settings,
    DEFAULT_WIFI_PORT,
};
use serde::{Deserialize, Serialize};
use tauri::{State, Window};

use crate::state::AppState;

/// Device row for the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub serial: String,
    pub state: String,
    pub label: String,
    pub ready: bool,
    pub selected: bool,
}

impl DeviceInfo {
    pub fn from_device(device: &Device, selected: Option<&str>) -> Self {
        Self {
            serial: device.serial.clone(),
            state: device.state.to_string(),
            label: device.state.label().to_string(),
            ready: device.state.is_ready(),
            selected: selected == Some(device.serial.as_str()),
        }
    }
}

/// Poll the bridge once and return the refreshed device list.
///
/// Also feeds the shared tracker, so a manual refresh raises the same
/// connect/disconnect notices as the background poller.
#[tauri::command]
pub async fn list_devices(
    window: Window,
    state: State<'_, AppState>,
) -> Result<Vec<DeviceInfo>, String> {
    let client = AdbClient::new(&state.toolchain);
    let polled = client.devices().await.map_err(|e| e.to_string())?;

    let (devices, selected, events) = {
        let mut tracker = state.tracker.lock().unwrap();
        let events = tracker.observe(polled);
        (
            tracker.devices().to_vec(),
            tracker.selected().map(str::to_string),
            events,
        )
    };

    for event in &events {
        let _ = window.emit("notice", &notice_for_event(event));
    }

    Ok(devices
        .iter()
        .map(|d| DeviceInfo::from_device(d, selected.as_deref()))
        .collect())
}

/// Select the device that mirror launches default to
#[tauri::command]
pub fn select_device(serial: String, state: State<'_, AppState>) -> Result<(), String> {
    state
        .tracker
        .lock()
        .unwrap()
        .select(&serial)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn selected_device(state: State<'_, AppState>) -> Option<String> {
    state.tracker.lock().unwrap().selected().map(str::to_string)
}

/// Bridge to a device over wifi
#[tauri::command]
pub async fn adb_connect(
    ip: String,
    port: Option<u16>,
    state: State<'_, AppState>,
) -> Result<String, String> {
    let client = AdbClient::new(&state.toolchain);
    client
        .connect(ip.trim(), port.unwrap_or(DEFAULT_WIFI_PORT))
        .await
        .map_err(|e| e.to_string())
}

/// Drop a wifi bridge
#[tauri::command]
pub async fn adb_disconnect(
    ip: String,
    port: Option<u16>,
    state: State<'_, AppState>,
) -> Result<String, String> {
    let client = AdbClient::new(&state.toolchain);
    client
        .disconnect(ip.trim(), port.unwrap_or(DEFAULT_WIFI_PORT))
        .await
        .map_err(|e| e.to_string())
}

/// The command line the current form state would launch
#[tauri::command]
pub fn preview_command(options: MirrorOptions) -> String {
    options.preview()
}

/// Fresh defaults for the reset button
#[tauri::command]
pub fn default_options() -> MirrorOptions {
    MirrorOptions::default()
}

/// Start mirroring with the given options.
///
/// An empty serial falls back to the selected device. Any running mirror
/// instance is replaced. Process output streams back to the window as
/// `mirror-log` events until `mirror-status` reports `stopped`.
#[tauri::command]
pub async fn start_mirror(
    mut options: MirrorOptions,
    window: Window,
    state: State<'_, AppState>,
) -> Result<(), String> {
    if options.serial.trim().is_empty() {
        if let Some(serial) = state.tracker.lock().unwrap().selected() {
            options.serial = serial.to_string();
        }
    }
    options.validate().map_err(|e| e.to_string())?;

    for notice in options.warnings() {
        let _ = window.emit("notice", &notice);
    }

    let mut rx = state
        .manager
        .lock()
        .await
        .start(&state.toolchain, &options.to_args())
        .map_err(|e| e.to_string())?;

    let _ = window.emit("mirror-status", "running");

    tauri::async_runtime::spawn(async move {
        while let Some(event) = rx.recv().await {
            match &event {
                SessionEvent::Log { line, .. } => {
                    if let Some(notice) = classify_line(line) {
                        let _ = window.emit("notice", &notice);
                    }
                    let _ = window.emit("mirror-log", &event);
                }
                SessionEvent::Exited { .. } => {
                    let _ = window.emit("mirror-log", &event);
                    let _ = window.emit("mirror-status", "stopped");
                }
            }
        }
    });

    Ok(())
}

/// Stop the running mirror; returns whether one was running
#[tauri::command]
pub async fn stop_mirror(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.manager.lock().await.stop())
}

#[tauri::command]
pub async fn mirror_status(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.manager.lock().await.is_running())
}

/// Load the persisted settings map
#[tauri::command]
pub fn load_settings(state: State<'_, AppState>) -> Result<Settings, String> {
    state.store.load().map_err(|e| e.to_string())
}

/// Queue the settings map for a debounced write (last write wins)
#[tauri::command]
pub async fn save_settings(
    settings: Settings,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state.submit_settings(settings).await;
    Ok(())
}

/// Truncate the settings file back to defaults
#[tauri::command]
pub fn reset_settings(state: State<'_, AppState>) -> Result<(), String> {
    state.store.reset().map_err(|e| e.to_string())
}
