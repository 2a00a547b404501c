//! Mirrordeck Core Library
//!
//! This crate provides the core functionality for the Mirrordeck shells:
//! building scrcpy command lines from typed options, tracking adb device
//! state, supervising the mirror process, and persisting user settings.
//! The two wrapped executables (scrcpy and adb) are opaque collaborators,
//! invoked with argument lists and observed only through exit codes and
//! text output.
//!
//! # Architecture
//!
//! - [`options`]: typed form state and the pure flag-list builder
//! - [`adb`]: device-bridge invocation and `adb devices` parsing
//! - [`tracker`]: snapshot diffing and the periodic device poller
//! - [`session`]: mirror process spawning, log forwarding, one-instance rule
//! - [`notice`]: substring classification of process output into toasts
//! - [`settings`]: flat id→scalar persistence with a debounced writer
//!
//! # Example
//!
//! ```no_run
//! use mirrordeck_core::{
//!     options::MirrorOptions,
//!     session::{SessionEvent, SessionManager},
//!     toolchain::Toolchain,
//! };
//!
//! async fn mirror_first_device() -> mirrordeck_core::Result<()> {
//!     let toolchain = Toolchain::from_env();
//!
//!     let mut options = MirrorOptions::default();
//!     options.video.max_fps = 30;
//!     options.validate()?;
//!
//!     let mut manager = SessionManager::new();
//!     let mut events = manager.start(&toolchain, &options.to_args())?;
//!     while let Some(event) = events.recv().await {
//!         if let SessionEvent::Exited { code } = event {
//!             println!("mirror exited: {:?}", code);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod adb;
pub mod error;
pub mod notice;
pub mod options;
pub mod session;
pub mod settings;
pub mod toolchain;
pub mod tracker;

// Re-export commonly used types
pub use adb::{AdbClient, Device, DeviceState, ADB_TIMEOUT, DEFAULT_WIFI_PORT};
pub use error::{MirrordeckError, Result};
pub use notice::{classify_line, notice_for_event, Notice, Severity};
pub use options::MirrorOptions;
pub use session::{LogStream, MirrorSession, SessionEvent, SessionManager};
pub use settings::{DebouncedSaver, SettingValue, Settings, SettingsStore, SAVE_DEBOUNCE};
pub use toolchain::Toolchain;
pub use tracker::{DeviceEvent, DeviceTracker, DeviceUpdate, DeviceWatcher, POLL_INTERVAL};

/// Get the version of the mirrordeck_core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
