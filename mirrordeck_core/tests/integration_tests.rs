//! Integration tests for Mirrordeck Core
//!
//! These tests verify that the different components work together correctly.

use mirrordeck_core::{
    classify_line, notice_for_event,
    options::MirrorOptions,
    session::{LogStream, SessionEvent, SessionManager},
    settings::{DebouncedSaver, Settings, SettingsStore},
    toolchain::Toolchain,
    tracker::{DeviceEvent, DeviceTracker},
    Severity,
};
use std::time::Duration;
use tempfile::TempDir;

/// Options edited in a shell survive a trip through the settings file and
/// still build the same command line
#[test]
fn test_options_survive_settings_file() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.path().join("settings.json"));

    let mut options = MirrorOptions::default();
    options.serial = "192.168.1.42:5555".to_string();
    options.video.max_fps = 30;
    options.audio.enabled = false;
    options.control.turn_screen_off = true;

    store.save(&Settings::from_options(&options)).unwrap();

    let restored = store.load().unwrap().to_options();
    assert_eq!(restored, options);
    assert_eq!(
        restored.to_args(),
        [
            "--serial",
            "192.168.1.42:5555",
            "--max-fps",
            "30",
            "--no-audio",
            "--turn-screen-off",
        ]
    );
}

/// The debounced writer collapses a burst of edits into the final state
#[tokio::test]
async fn test_debounced_edits_end_to_end() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.path().join("settings.json"));
    let saver = DebouncedSaver::spawn(store.clone(), Duration::from_millis(40));

    let mut options = MirrorOptions::default();
    for size in [640, 1024, 1920] {
        options.video.max_size = size;
        saver.submit(Settings::from_options(&options)).await;
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    let restored = store.load().unwrap().to_options();
    assert_eq!(restored.video.max_size, 1920);
}

/// Built args drive a real process and its output comes back as events
#[tokio::test]
async fn test_session_runs_built_args() {
    // `echo` stands in for scrcpy; the built flag list is echoed back
    let toolchain = Toolchain::new("adb", "echo");

    let mut options = MirrorOptions::default();
    options.serial = "emulator-5554".to_string();
    options.validate().unwrap();

    let mut manager = SessionManager::new();
    let mut rx = manager.start(&toolchain, &options.to_args()).unwrap();

    let mut lines = Vec::new();
    let mut exit_code = None;
    while let Some(event) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
    {
        match event {
            SessionEvent::Log { stream, line } => {
                assert_eq!(stream, LogStream::Stdout);
                lines.push(line);
            }
            SessionEvent::Exited { code } => {
                exit_code = code;
                break;
            }
        }
    }

    assert_eq!(lines, ["--serial emulator-5554"]);
    assert_eq!(exit_code, Some(0));
}

/// A polled device sequence produces the expected toast stream
#[test]
fn test_device_lifecycle_toasts() {
    use mirrordeck_core::adb::parse_devices;

    let mut tracker = DeviceTracker::new();

    let events = tracker.observe(parse_devices(
        "List of devices attached\nR58M123ABC\tunauthorized\n",
    ));
    assert_eq!(events.len(), 1);
    let notice = notice_for_event(&events[0]);
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.title, "Authorization Required");

    // User authorizes; the serial is already known, so the poll is quiet
    let events = tracker.observe(parse_devices(
        "List of devices attached\nR58M123ABC\tdevice\n",
    ));
    assert!(events.is_empty());

    tracker.select("R58M123ABC").unwrap();

    // Cable pulled
    let events = tracker.observe(parse_devices("List of devices attached\n"));
    assert_eq!(
        events,
        vec![DeviceEvent::Disconnected {
            serial: "R58M123ABC".to_string()
        }]
    );
    assert_eq!(tracker.selected(), None);

    let notice = notice_for_event(&events[0]);
    assert_eq!(notice.title, "Device Disconnected");
}

/// Mirror-process output lines map to the documented notices
#[test]
fn test_log_classification_pipeline() {
    let transcript = [
        "INFO: scrcpy 2.1 <https://github.com/Genymobile/scrcpy>",
        "/usr/share/scrcpy/scrcpy-server: 1 file pushed",
        "ERROR: Device not found",
    ];

    let notices: Vec<_> = transcript.iter().filter_map(|l| classify_line(l)).collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "No Device Found");
    assert_eq!(notices[0].severity, Severity::Error);
}
