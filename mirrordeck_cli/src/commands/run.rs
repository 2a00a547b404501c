//! Run command - launch the mirror and stream its output
//!
//! Options come from the saved settings file; command-line flags override
//! individual fields for one launch without touching what is saved.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mirrordeck_core::{
    classify_line,
    options::MirrorOptions,
    session::{LogStream, SessionEvent, SessionManager},
    settings::SettingsStore,
    toolchain::Toolchain,
};

use super::{error, info, print_notice, success, warn};

/// Per-launch overrides on top of the saved settings
#[derive(Args, Debug, Default)]
pub struct MirrorOverrides {
    /// Device serial to mirror
    #[arg(short, long)]
    pub serial: Option<String>,

    /// Cap the larger video dimension in pixels
    #[arg(long)]
    pub max_size: Option<u32>,

    /// Video bit rate in Mbps
    #[arg(long)]
    pub bit_rate: Option<u32>,

    /// Frame rate cap
    #[arg(long)]
    pub max_fps: Option<u32>,

    /// Disable audio forwarding
    #[arg(long)]
    pub no_audio: bool,

    /// Record the session to this file
    #[arg(long, value_name = "FILE")]
    pub record: Option<String>,

    /// Start the mirror window fullscreen
    #[arg(long)]
    pub fullscreen: bool,

    /// Keep the mirror window above others
    #[arg(long)]
    pub always_on_top: bool,

    /// Turn the device screen off while mirroring
    #[arg(long)]
    pub turn_screen_off: bool,

    /// Show touch feedback on the device
    #[arg(long)]
    pub show_touches: bool,

    /// Keep the device awake while plugged in
    #[arg(long)]
    pub stay_awake: bool,

    /// Mirror without injecting input
    #[arg(long)]
    pub no_control: bool,

    /// Custom mirror window title
    #[arg(long)]
    pub window_title: Option<String>,
}

impl MirrorOverrides {
    pub fn apply(&self, options: &mut MirrorOptions) {
        if let Some(serial) = &self.serial {
            options.serial = serial.clone();
        }
        if let Some(max_size) = self.max_size {
            options.video.max_size = max_size;
        }
        if let Some(bit_rate) = self.bit_rate {
            options.video.bit_rate_mbps = bit_rate;
        }
        if let Some(max_fps) = self.max_fps {
            options.video.max_fps = max_fps;
        }
        if self.no_audio {
            options.audio.enabled = false;
        }
        if let Some(file) = &self.record {
            options.recording.enabled = true;
            options.recording.file = file.clone();
        }
        if self.fullscreen {
            options.window.fullscreen = true;
        }
        if self.always_on_top {
            options.window.always_on_top = true;
        }
        if self.turn_screen_off {
            options.control.turn_screen_off = true;
        }
        if self.show_touches {
            options.control.show_touches = true;
        }
        if self.stay_awake {
            options.control.stay_awake = true;
        }
        if self.no_control {
            options.control.disabled = true;
        }
        if let Some(title) = &self.window_title {
            options.window.title = title.clone();
        }
    }
}

/// Combine saved settings with per-launch overrides
pub fn resolve_options(store: &SettingsStore, overrides: &MirrorOverrides) -> Result<MirrorOptions> {
    let settings = store
        .load()
        .with_context(|| format!("Failed to read settings from {}", store.path().display()))?;

    let mut options = settings.to_options();
    overrides.apply(&mut options);
    tracing::debug!("Resolved launch options: {:?}", options);
    Ok(options)
}

/// Launch the mirror and stream classified output until it exits
pub async fn launch(toolchain: &Toolchain, overrides: &MirrorOverrides) -> Result<()> {
    let store = SettingsStore::default_location()?;
    let options = resolve_options(&store, overrides)?;

    options.validate()?;
    for notice in options.warnings() {
        warn(&notice.detail);
    }

    let mut manager = SessionManager::new();
    let mut rx = manager.start(toolchain, &options.to_args())?;

    info(&format!("Launching: {}", options.preview().cyan()));
    println!();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                info("Stopping mirror...");
                manager.stop();
            }
            event = rx.recv() => {
                match event {
                    Some(SessionEvent::Log { stream, line }) => {
                        match stream {
                            LogStream::Stdout => println!("{}", line.dimmed()),
                            LogStream::Stderr => eprintln!("{}", line.yellow()),
                        }
                        if let Some(notice) = classify_line(&line) {
                            print_notice(&notice);
                        }
                    }
                    Some(SessionEvent::Exited { code }) => {
                        println!();
                        match code {
                            Some(0) => success("Mirror exited."),
                            Some(code) => error(&format!("Mirror exited with code {}", code)),
                            None => info("Mirror terminated."),
                        }
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}

/// Print the command line that `run` would launch, without launching it
pub fn print_args(overrides: &MirrorOverrides) -> Result<()> {
    let store = SettingsStore::default_location()?;
    let options = resolve_options(&store, overrides)?;
    println!("{}", options.preview());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrordeck_core::settings::Settings;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let overrides = MirrorOverrides {
            serial: Some("R58M".to_string()),
            max_fps: Some(30),
            no_audio: true,
            ..Default::default()
        };

        let mut options = MirrorOptions::default();
        overrides.apply(&mut options);

        assert_eq!(options.serial, "R58M");
        assert_eq!(options.video.max_fps, 30);
        assert!(!options.audio.enabled);
    }

    #[test]
    fn test_record_override_enables_recording() {
        let overrides = MirrorOverrides {
            record: Some("/tmp/cap.mkv".to_string()),
            ..Default::default()
        };

        let mut options = MirrorOptions::default();
        overrides.apply(&mut options);

        assert!(options.recording.enabled);
        assert_eq!(options.recording.file, "/tmp/cap.mkv");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut options = MirrorOptions::default();
        MirrorOverrides::default().apply(&mut options);
        assert_eq!(options, MirrorOptions::default());
    }

    #[test]
    fn test_resolve_options_layers_saved_settings_and_flags() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::new(temp.path().join("settings.json"));

        let mut saved = MirrorOptions::default();
        saved.video.max_fps = 24;
        saved.control.show_touches = true;
        store.save(&Settings::from_options(&saved)).unwrap();

        let overrides = MirrorOverrides {
            max_fps: Some(60),
            ..Default::default()
        };

        let options = resolve_options(&store, &overrides).unwrap();
        // The flag wins over the file; untouched fields come from the file
        assert_eq!(options.video.max_fps, 60);
        assert!(options.control.show_touches);
    }

    #[test]
    fn test_resolve_options_with_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::new(temp.path().join("settings.json"));

        let options = resolve_options(&store, &MirrorOverrides::default()).unwrap();
        assert_eq!(options, MirrorOptions::default());
    }
}
