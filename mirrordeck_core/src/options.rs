//! Mirror options and the scrcpy argument builder
//!
//! [`MirrorOptions`] is the typed form state of the shell. [`MirrorOptions::to_args`]
//! is a pure mapping from that state to the scrcpy flag list: values equal to
//! scrcpy's own defaults emit no flag, so the generated command line stays
//! minimal and readable.

use crate::error::{MirrordeckError, Result};
use crate::notice::{Notice, Severity};
use serde::{Deserialize, Serialize};

/// scrcpy's default max size; the builder skips the flag at this value
pub const DEFAULT_MAX_SIZE: u32 = 1080;
/// Default video bit rate in Mbps
pub const DEFAULT_VIDEO_BIT_RATE_MBPS: u32 = 8;
/// Default frame cap
pub const DEFAULT_MAX_FPS: u32 = 60;
/// Default audio bit rate in Kbps
pub const DEFAULT_AUDIO_BIT_RATE_KBPS: u32 = 128;
/// Default tunnel host; the flag is suppressed at this value
pub const DEFAULT_TUNNEL_HOST: &str = "localhost";
/// Buffer sizes at or above this many milliseconds trigger a latency warning
pub const BUFFER_WARN_MS: u32 = 300;

/// Complete form state for a mirror launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorOptions {
    /// Target device serial; empty means "let scrcpy pick"
    pub serial: String,
    /// Display id on the device; 0 is the main display and emits no flag
    pub display_id: u32,
    pub video: VideoOptions,
    pub audio: AudioOptions,
    pub window: WindowOptions,
    pub control: ControlOptions,
    pub recording: RecordingOptions,
    pub advanced: AdvancedOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub max_size: u32,
    pub bit_rate_mbps: u32,
    pub max_fps: u32,
    pub display_buffer_ms: u32,
    pub codec: String,
    pub render_driver: String,
    /// 0..=3; `Some(0)` still emits the flag (explicit natural orientation)
    pub lock_orientation: Option<u8>,
    pub codec_options: String,
    pub crop: Option<CropRegion>,
    /// `--no-video` (audio-only mirroring)
    pub disabled: bool,
}

/// Crop rectangle in device coordinates, rendered as `W:H:X:Y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRegion {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    /// Disabled audio emits `--no-audio` and suppresses every other audio flag
    pub enabled: bool,
    pub bit_rate_kbps: u32,
    pub buffer_ms: u32,
    pub codec: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub fullscreen: bool,
    pub always_on_top: bool,
    pub borderless: bool,
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Window position; `Some(0)` is a real position and emits the flag
    pub x: Option<i32>,
    pub y: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlOptions {
    /// `--no-control` (view-only mirroring)
    pub disabled: bool,
    pub show_touches: bool,
    pub stay_awake: bool,
    pub turn_screen_off: bool,
    pub forward_all_clicks: bool,
    pub prefer_text: bool,
    pub hid_keyboard: bool,
    pub hid_mouse: bool,
    pub shortcut_mod: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingOptions {
    pub enabled: bool,
    pub file: String,
    pub format: String,
    /// Record without showing the mirror window; independent of `enabled`
    pub no_display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedOptions {
    pub tunnel_host: String,
    pub tunnel_port: Option<u16>,
    pub force_adb_forward: bool,
    pub log_level: String,
    pub push_target: String,
    pub disable_screensaver: bool,
    pub no_legacy_clipboard: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            serial: String::new(),
            display_id: 0,
            video: VideoOptions::default(),
            audio: AudioOptions::default(),
            window: WindowOptions::default(),
            control: ControlOptions::default(),
            recording: RecordingOptions::default(),
            advanced: AdvancedOptions::default(),
        }
    }
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            bit_rate_mbps: DEFAULT_VIDEO_BIT_RATE_MBPS,
            max_fps: DEFAULT_MAX_FPS,
            display_buffer_ms: 0,
            codec: String::new(),
            render_driver: String::new(),
            lock_orientation: None,
            codec_options: String::new(),
            crop: None,
            disabled: false,
        }
    }
}

impl Default for CropRegion {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            x: 0,
            y: 0,
        }
    }
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            bit_rate_kbps: DEFAULT_AUDIO_BIT_RATE_KBPS,
            buffer_ms: 0,
            codec: String::new(),
            source: String::new(),
        }
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            fullscreen: false,
            always_on_top: false,
            borderless: false,
            title: String::new(),
            width: 0,
            height: 0,
            x: None,
            y: None,
        }
    }
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            show_touches: false,
            stay_awake: false,
            turn_screen_off: false,
            forward_all_clicks: false,
            prefer_text: false,
            hid_keyboard: false,
            hid_mouse: false,
            shortcut_mod: String::new(),
        }
    }
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            file: String::new(),
            format: String::new(),
            no_display: false,
        }
    }
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            tunnel_host: DEFAULT_TUNNEL_HOST.to_string(),
            tunnel_port: None,
            force_adb_forward: false,
            log_level: String::new(),
            push_target: String::new(),
            disable_screensaver: false,
            no_legacy_clipboard: false,
        }
    }
}

impl MirrorOptions {
    /// Build the scrcpy argument list from the current form state
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        let push = |args: &mut Vec<String>, flag: &str, value: &str| {
            args.push(flag.to_string());
            args.push(value.to_string());
        };

        let serial = self.serial.trim();
        if !serial.is_empty() {
            push(&mut args, "--serial", serial);
        }

        if self.display_id != 0 {
            push(&mut args, "--display", &self.display_id.to_string());
        }

        // Video
        let v = &self.video;
        if v.max_size != 0 && v.max_size != DEFAULT_MAX_SIZE {
            push(&mut args, "--max-size", &v.max_size.to_string());
        }
        if v.bit_rate_mbps != 0 && v.bit_rate_mbps != DEFAULT_VIDEO_BIT_RATE_MBPS {
            push(&mut args, "--video-bit-rate", &format!("{}M", v.bit_rate_mbps));
        }
        if v.max_fps != 0 && v.max_fps != DEFAULT_MAX_FPS {
            push(&mut args, "--max-fps", &v.max_fps.to_string());
        }
        if v.display_buffer_ms != 0 {
            push(&mut args, "--display-buffer", &v.display_buffer_ms.to_string());
        }
        if !v.codec.is_empty() {
            push(&mut args, "--video-codec", &v.codec);
        }
        if !v.render_driver.is_empty() {
            push(&mut args, "--render-driver", &v.render_driver);
        }
        if let Some(orientation) = v.lock_orientation {
            args.push(format!("--lock-video-orientation={}", orientation));
        }
        let codec_options = v.codec_options.trim();
        if !codec_options.is_empty() {
            push(&mut args, "--video-codec-options", codec_options);
        }
        if let Some(crop) = v.crop {
            if crop.width > 0 && crop.height > 0 {
                push(
                    &mut args,
                    "--crop",
                    &format!("{}:{}:{}:{}", crop.width, crop.height, crop.x, crop.y),
                );
            }
        }
        if v.disabled {
            args.push("--no-video".to_string());
        }

        // Audio
        let a = &self.audio;
        if !a.enabled {
            args.push("--no-audio".to_string());
        } else {
            if a.bit_rate_kbps != 0 && a.bit_rate_kbps != DEFAULT_AUDIO_BIT_RATE_KBPS {
                push(&mut args, "--audio-bit-rate", &format!("{}K", a.bit_rate_kbps));
            }
            if a.buffer_ms != 0 {
                push(&mut args, "--audio-buffer", &a.buffer_ms.to_string());
            }
            if !a.codec.is_empty() {
                push(&mut args, "--audio-codec", &a.codec);
            }
            if !a.source.is_empty() {
                push(&mut args, "--audio-source", &a.source);
            }
        }

        // Window
        let w = &self.window;
        if w.fullscreen {
            args.push("--fullscreen".to_string());
        }
        if w.always_on_top {
            args.push("--always-on-top".to_string());
        }
        if w.borderless {
            args.push("--window-borderless".to_string());
        }
        let title = w.title.trim();
        if !title.is_empty() {
            push(&mut args, "--window-title", title);
        }
        if w.width != 0 {
            push(&mut args, "--window-width", &w.width.to_string());
        }
        if w.height != 0 {
            push(&mut args, "--window-height", &w.height.to_string());
        }
        if let Some(x) = w.x {
            push(&mut args, "--window-x", &x.to_string());
        }
        if let Some(y) = w.y {
            push(&mut args, "--window-y", &y.to_string());
        }

        // Control
        let c = &self.control;
        if c.disabled {
            args.push("--no-control".to_string());
        }
        if c.show_touches {
            args.push("--show-touches".to_string());
        }
        if c.stay_awake {
            args.push("--stay-awake".to_string());
        }
        if c.turn_screen_off {
            args.push("--turn-screen-off".to_string());
        }
        if c.forward_all_clicks {
            args.push("--forward-all-clicks".to_string());
        }
        if c.prefer_text {
            args.push("--prefer-text".to_string());
        }
        if c.hid_keyboard {
            args.push("--hid-keyboard".to_string());
        }
        if c.hid_mouse {
            args.push("--hid-mouse".to_string());
        }
        if !c.shortcut_mod.is_empty() {
            push(&mut args, "--shortcut-mod", &c.shortcut_mod);
        }

        // Recording
        let r = &self.recording;
        if r.enabled {
            let file = r.file.trim();
            if !file.is_empty() {
                push(&mut args, "--record", file);
            }
            if !r.format.is_empty() {
                push(&mut args, "--record-format", &r.format);
            }
        }
        if r.no_display {
            args.push("--no-display".to_string());
        }

        // Advanced
        let adv = &self.advanced;
        let tunnel_host = adv.tunnel_host.trim();
        if !tunnel_host.is_empty() && tunnel_host != DEFAULT_TUNNEL_HOST {
            push(&mut args, "--tunnel-host", tunnel_host);
        }
        if let Some(port) = adv.tunnel_port {
            push(&mut args, "--tunnel-port", &port.to_string());
        }
        if adv.force_adb_forward {
            args.push("--force-adb-forward".to_string());
        }
        if !adv.log_level.is_empty() {
            push(&mut args, "--log-level", &adv.log_level);
        }
        let push_target = adv.push_target.trim();
        if !push_target.is_empty() {
            push(&mut args, "--push-target", push_target);
        }
        if adv.disable_screensaver {
            args.push("--disable-screensaver".to_string());
        }
        if adv.no_legacy_clipboard {
            args.push("--no-legacy-clipboard".to_string());
        }

        args
    }

    /// Human-readable command preview, e.g. `scrcpy --serial R58M --max-fps 30`
    pub fn preview(&self) -> String {
        let args = self.to_args();
        if args.is_empty() {
            "scrcpy".to_string()
        } else {
            format!("scrcpy {}", args.join(" "))
        }
    }

    /// Check launch preconditions that scrcpy itself would not report cleanly
    pub fn validate(&self) -> Result<()> {
        if self.recording.enabled && self.recording.file.trim().is_empty() {
            return Err(MirrordeckError::InvalidOptions(
                "recording is enabled but no output file is set".to_string(),
            ));
        }
        Ok(())
    }

    /// Non-fatal warnings about the current state (high-latency buffers)
    pub fn warnings(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if self.video.display_buffer_ms >= BUFFER_WARN_MS {
            notices.push(Notice::new(
                Severity::Warning,
                "Limit Alert",
                "High display buffering adds noticeable latency.",
            ));
        }
        if self.audio.enabled && self.audio.buffer_ms >= BUFFER_WARN_MS {
            notices.push(Notice::new(
                Severity::Warning,
                "Limit Alert",
                "High audio buffering adds latency.",
            ));
        }
        notices
    }
}
