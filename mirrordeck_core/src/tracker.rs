//! Device-state polling and snapshot diffing
//!
//! The bridge tool has no push channel, so connection state comes from
//! polling `adb devices` on a fixed interval and diffing consecutive
//! snapshots. [`DeviceTracker`] is the deterministic diff; [`DeviceWatcher`]
//! is the poll loop that forwards updates over an mpsc channel.

use crate::adb::{AdbClient, Device};
use crate::error::{MirrordeckError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Fixed polling interval for the device bridge
pub const POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// Events produced by diffing two device snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A new serial appeared in the `device` state
    Connected(Device),
    /// A new serial appeared unauthorized
    AuthorizationRequired(Device),
    /// A new serial appeared offline
    WentOffline(Device),
    /// A previously seen serial disappeared
    Disconnected { serial: String },
}

/// One poll result: the full snapshot plus what changed since the last one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub devices: Vec<Device>,
    pub events: Vec<DeviceEvent>,
}

/// Holds the previous snapshot and the user's device selection
#[derive(Debug, Default)]
pub struct DeviceTracker {
    devices: Vec<Device>,
    selected: Option<String>,
}

impl DeviceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a device for mirroring; only authorized devices qualify
    pub fn select(&mut self, serial: &str) -> Result<()> {
        match self.devices.iter().find(|d| d.serial == serial) {
            Some(device) if device.state.is_ready() => {
                self.selected = Some(serial.to_string());
                Ok(())
            }
            Some(_) => Err(MirrordeckError::DeviceNotReady(serial.to_string())),
            None => Err(MirrordeckError::DeviceNotFound(serial.to_string())),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Absorb a new snapshot and report what changed.
    ///
    /// Arrivals are reported before departures. A departing serial that was
    /// selected clears the selection.
    pub fn observe(&mut self, new_devices: Vec<Device>) -> Vec<DeviceEvent> {
        let mut events = Vec::new();

        for device in &new_devices {
            if self.devices.iter().any(|p| p.serial == device.serial) {
                continue;
            }
            match device.state {
                crate::adb::DeviceState::Ready => {
                    events.push(DeviceEvent::Connected(device.clone()))
                }
                crate::adb::DeviceState::Unauthorized => {
                    events.push(DeviceEvent::AuthorizationRequired(device.clone()))
                }
                crate::adb::DeviceState::Offline => {
                    events.push(DeviceEvent::WentOffline(device.clone()))
                }
                crate::adb::DeviceState::Other(_) => {}
            }
        }

        for prev in &self.devices {
            if new_devices.iter().any(|d| d.serial == prev.serial) {
                continue;
            }
            if self.selected.as_deref() == Some(prev.serial.as_str()) {
                self.selected = None;
            }
            events.push(DeviceEvent::Disconnected {
                serial: prev.serial.clone(),
            });
        }

        self.devices = new_devices;
        events
    }
}

/// Periodic poller that feeds a shared [`DeviceTracker`]
pub struct DeviceWatcher;

impl DeviceWatcher {
    /// Start polling; every tick sends a [`DeviceUpdate`] until the receiver
    /// is dropped. Poll failures keep the previous snapshot.
    pub fn spawn(
        client: AdbClient,
        poll_interval: Duration,
        tracker: Arc<Mutex<DeviceTracker>>,
    ) -> (mpsc::Receiver<DeviceUpdate>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;

                let devices = match client.devices().await {
                    Ok(devices) => devices,
                    Err(e) => {
                        warn!("Device poll failed: {}", e);
                        continue;
                    }
                };

                let update = {
                    let mut tracker = tracker.lock().unwrap();
                    let events = tracker.observe(devices);
                    DeviceUpdate {
                        devices: tracker.devices().to_vec(),
                        events,
                    }
                };

                if !update.events.is_empty() {
                    debug!("Device events: {:?}", update.events);
                }
                if tx.send(update).await.is_err() {
                    break;
                }
            }
        });

        (rx, handle)
    }
}
