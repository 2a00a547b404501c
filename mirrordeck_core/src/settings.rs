//! Persisted user settings
//!
//! On disk the settings are the original shell's flat mapping from control
//! identifiers to scalar values, loaded once at startup and overwritten on
//! every debounced change (last write wins, single writer). The typed
//! bridge to [`MirrorOptions`] keeps Rust call sites out of stringly-typed
//! territory. Unknown keys are preserved across load/save cycles.

use crate::error::{MirrordeckError, Result};
use crate::options::{CropRegion, MirrorOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// How long a burst of changes may settle before it is written out
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// A scalar settings value (the only shapes the form produces)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<u32> for SettingValue {
    fn from(v: u32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Flat control-id → scalar map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn set(&mut self, id: &str, value: impl Into<SettingValue>) {
        self.values.insert(id.to_string(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&SettingValue> {
        self.values.get(id)
    }

    pub fn flag(&self, id: &str, default: bool) -> bool {
        match self.values.get(id) {
            Some(SettingValue::Flag(v)) => *v,
            _ => default,
        }
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        match self.values.get(id) {
            Some(SettingValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.values.get(id) {
            Some(SettingValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    fn number_or(&self, id: &str, default: u32) -> u32 {
        self.number(id).map(|n| n as u32).unwrap_or(default)
    }

    fn text_owned(&self, id: &str, default: &str) -> String {
        self.text(id).unwrap_or(default).to_string()
    }

    /// Snapshot the typed options into the flat map
    pub fn from_options(options: &MirrorOptions) -> Self {
        let mut s = Self::new();
        let o = options;

        s.set("serial", o.serial.as_str());
        s.set("display-id", o.display_id);

        s.set("max-size", o.video.max_size);
        s.set("bit-rate", o.video.bit_rate_mbps);
        s.set("max-fps", o.video.max_fps);
        s.set("display-buffer", o.video.display_buffer_ms);
        s.set("video-codec", o.video.codec.as_str());
        s.set("render-driver", o.video.render_driver.as_str());
        if let Some(orientation) = o.video.lock_orientation {
            s.set("lock-orientation", orientation as u32);
        }
        s.set("codec-options", o.video.codec_options.as_str());
        s.set("crop-enable", o.video.crop.is_some());
        if let Some(crop) = o.video.crop {
            s.set("crop-w", crop.width);
            s.set("crop-h", crop.height);
            s.set("crop-x", crop.x);
            s.set("crop-y", crop.y);
        }
        s.set("no-video", o.video.disabled);

        s.set("audio-enable", o.audio.enabled);
        s.set("audio-bit-rate", o.audio.bit_rate_kbps);
        s.set("audio-buffer", o.audio.buffer_ms);
        s.set("audio-codec", o.audio.codec.as_str());
        s.set("audio-source", o.audio.source.as_str());

        s.set("fullscreen", o.window.fullscreen);
        s.set("always-on-top", o.window.always_on_top);
        s.set("borderless", o.window.borderless);
        s.set("window-title", o.window.title.as_str());
        s.set("window-width", o.window.width);
        s.set("window-height", o.window.height);
        if let Some(x) = o.window.x {
            s.set("window-x", x);
        }
        if let Some(y) = o.window.y {
            s.set("window-y", y);
        }

        s.set("no-control", o.control.disabled);
        s.set("show-touches", o.control.show_touches);
        s.set("stay-awake", o.control.stay_awake);
        s.set("turn-screen-off", o.control.turn_screen_off);
        s.set("forward-all-clicks", o.control.forward_all_clicks);
        s.set("prefer-text", o.control.prefer_text);
        s.set("hid-keyboard", o.control.hid_keyboard);
        s.set("hid-mouse", o.control.hid_mouse);
        s.set("shortcut-mod", o.control.shortcut_mod.as_str());

        s.set("record-enable", o.recording.enabled);
        s.set("record-file", o.recording.file.as_str());
        s.set("record-format", o.recording.format.as_str());
        s.set("no-display", o.recording.no_display);

        s.set("tunnel-host", o.advanced.tunnel_host.as_str());
        if let Some(port) = o.advanced.tunnel_port {
            s.set("tunnel-port", port as u32);
        }
        s.set("force-adb-forward", o.advanced.force_adb_forward);
        s.set("log-level", o.advanced.log_level.as_str());
        s.set("push-target", o.advanced.push_target.as_str());
        s.set("disable-screensaver", o.advanced.disable_screensaver);
        s.set("no-legacy-clipboard", o.advanced.no_legacy_clipboard);

        s
    }

    /// Rebuild typed options from the flat map; missing keys fall back to
    /// the option defaults
    pub fn to_options(&self) -> MirrorOptions {
        let mut o = MirrorOptions::default();

        o.serial = self.text_owned("serial", &o.serial);
        o.display_id = self.number_or("display-id", o.display_id);

        o.video.max_size = self.number_or("max-size", o.video.max_size);
        o.video.bit_rate_mbps = self.number_or("bit-rate", o.video.bit_rate_mbps);
        o.video.max_fps = self.number_or("max-fps", o.video.max_fps);
        o.video.display_buffer_ms = self.number_or("display-buffer", o.video.display_buffer_ms);
        o.video.codec = self.text_owned("video-codec", &o.video.codec);
        o.video.render_driver = self.text_owned("render-driver", &o.video.render_driver);
        o.video.lock_orientation = self.number("lock-orientation").map(|n| n as u8);
        o.video.codec_options = self.text_owned("codec-options", &o.video.codec_options);
        if self.flag("crop-enable", false) {
            o.video.crop = Some(CropRegion {
                width: self.number_or("crop-w", 0),
                height: self.number_or("crop-h", 0),
                x: self.number_or("crop-x", 0),
                y: self.number_or("crop-y", 0),
            });
        }
        o.video.disabled = self.flag("no-video", o.video.disabled);

        o.audio.enabled = self.flag("audio-enable", o.audio.enabled);
        o.audio.bit_rate_kbps = self.number_or("audio-bit-rate", o.audio.bit_rate_kbps);
        o.audio.buffer_ms = self.number_or("audio-buffer", o.audio.buffer_ms);
        o.audio.codec = self.text_owned("audio-codec", &o.audio.codec);
        o.audio.source = self.text_owned("audio-source", &o.audio.source);

        o.window.fullscreen = self.flag("fullscreen", o.window.fullscreen);
        o.window.always_on_top = self.flag("always-on-top", o.window.always_on_top);
        o.window.borderless = self.flag("borderless", o.window.borderless);
        o.window.title = self.text_owned("window-title", &o.window.title);
        o.window.width = self.number_or("window-width", o.window.width);
        o.window.height = self.number_or("window-height", o.window.height);
        o.window.x = self.number("window-x").map(|n| n as i32);
        o.window.y = self.number("window-y").map(|n| n as i32);

        o.control.disabled = self.flag("no-control", o.control.disabled);
        o.control.show_touches = self.flag("show-touches", o.control.show_touches);
        o.control.stay_awake = self.flag("stay-awake", o.control.stay_awake);
        o.control.turn_screen_off = self.flag("turn-screen-off", o.control.turn_screen_off);
        o.control.forward_all_clicks =
            self.flag("forward-all-clicks", o.control.forward_all_clicks);
        o.control.prefer_text = self.flag("prefer-text", o.control.prefer_text);
        o.control.hid_keyboard = self.flag("hid-keyboard", o.control.hid_keyboard);
        o.control.hid_mouse = self.flag("hid-mouse", o.control.hid_mouse);
        o.control.shortcut_mod = self.text_owned("shortcut-mod", &o.control.shortcut_mod);

        o.recording.enabled = self.flag("record-enable", o.recording.enabled);
        o.recording.file = self.text_owned("record-file", &o.recording.file);
        o.recording.format = self.text_owned("record-format", &o.recording.format);
        o.recording.no_display = self.flag("no-display", o.recording.no_display);

        o.advanced.tunnel_host = self.text_owned("tunnel-host", &o.advanced.tunnel_host);
        o.advanced.tunnel_port = self.number("tunnel-port").map(|n| n as u16);
        o.advanced.force_adb_forward =
            self.flag("force-adb-forward", o.advanced.force_adb_forward);
        o.advanced.log_level = self.text_owned("log-level", &o.advanced.log_level);
        o.advanced.push_target = self.text_owned("push-target", &o.advanced.push_target);
        o.advanced.disable_screensaver =
            self.flag("disable-screensaver", o.advanced.disable_screensaver);
        o.advanced.no_legacy_clipboard =
            self.flag("no-legacy-clipboard", o.advanced.no_legacy_clipboard);

        o
    }
}

/// JSON settings file under the platform config directory
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The platform-default settings file location
    pub fn default_location() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "mirrordeck", "mirrordeck").ok_or_else(|| {
            MirrordeckError::Settings("Could not determine config directory".to_string())
        })?;
        Ok(Self::new(proj_dirs.config_dir().join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, or the empty map if the file does not exist yet
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite the settings file, creating parent directories as needed
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Truncate back to the empty map
    pub fn reset(&self) -> Result<()> {
        self.save(&Settings::default())
    }
}

/// Single writer that coalesces bursts of changes into one save
pub struct DebouncedSaver {
    tx: mpsc::Sender<Settings>,
}

impl DebouncedSaver {
    /// Spawn the writer task. Each submitted snapshot restarts the debounce
    /// window; when it elapses, only the most recent snapshot is written.
    pub fn spawn(store: SettingsStore, window: Duration) -> Self {
        let (tx, mut rx) = mpsc::channel::<Settings>(16);

        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut latest = first;
                loop {
                    match tokio::time::timeout(window, rx.recv()).await {
                        Ok(Some(next)) => latest = next,
                        Ok(None) => {
                            // Channel closed; flush and stop
                            if let Err(e) = store.save(&latest) {
                                warn!("Failed to persist settings: {}", e);
                            }
                            return;
                        }
                        Err(_) => {
                            if let Err(e) = store.save(&latest) {
                                warn!("Failed to persist settings: {}", e);
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    /// Queue a snapshot for writing
    pub async fn submit(&self, settings: Settings) {
        let _ = self.tx.send(settings).await;
    }
}
