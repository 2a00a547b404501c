//! User-facing notices derived from process output and device events
//!
//! There is no structured error contract with the wrapped tools; status is
//! classified by substring matching on their text output, and the result is
//! a [`Notice`] the shells render as a toast (GUI) or a colored line (CLI).

use crate::tracker::DeviceEvent;
use serde::{Deserialize, Serialize};

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn new(severity: Severity, title: &str, detail: &str) -> Self {
        Self {
            severity,
            title: title.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// How much of an offending output line is quoted back to the user
const DETAIL_CLIP: usize = 120;

/// Classify a line of mirror-process output.
///
/// Rules and priority order follow the substrings scrcpy is known to print;
/// the first match wins.
pub fn classify_line(line: &str) -> Option<Notice> {
    let lower = line.to_lowercase();

    if lower.contains("device not found") || lower.contains("no devices") {
        return Some(Notice::new(
            Severity::Error,
            "No Device Found",
            "Make sure your device is connected and USB debugging is enabled.",
        ));
    }
    if lower.contains("error") && lower.contains("connection") {
        return Some(Notice::new(Severity::Error, "Connection Error", clip(line)));
    }
    if lower.contains("encoder") && (lower.contains("not found") || lower.contains("failed")) {
        return Some(Notice::new(
            Severity::Warning,
            "Encoder Issue",
            "The selected video codec encoder was not found on the device.",
        ));
    }
    if lower.contains("timeout") {
        return Some(Notice::new(
            Severity::Warning,
            "Connection Timeout",
            "Check network or USB connection quality.",
        ));
    }
    if lower.contains("refused") {
        return Some(Notice::new(
            Severity::Error,
            "Connection Refused",
            "ADB could not reach the device server.",
        ));
    }

    None
}

/// The toast a device event maps to
pub fn notice_for_event(event: &DeviceEvent) -> Notice {
    match event {
        DeviceEvent::Connected(device) => {
            Notice::new(Severity::Success, "Device Connected", &device.serial)
        }
        DeviceEvent::AuthorizationRequired(device) => Notice::new(
            Severity::Warning,
            "Authorization Required",
            &format!("{}: allow USB debugging on the device", device.serial),
        ),
        DeviceEvent::WentOffline(device) => {
            Notice::new(Severity::Error, "Device Offline", &device.serial)
        }
        DeviceEvent::Disconnected { serial } => {
            Notice::new(Severity::Error, "Device Disconnected", serial)
        }
    }
}

fn clip(line: &str) -> &str {
    let end = line
        .char_indices()
        .nth(DETAIL_CLIP)
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::{Device, DeviceState};

    #[test]
    fn test_plain_output_is_not_classified() {
        assert!(classify_line("INFO: scrcpy 2.1 <https://github.com/Genymobile/scrcpy>").is_none());
        assert!(classify_line("Device: Google Pixel 7 (Android 14)").is_none());
    }

    #[test]
    fn test_device_not_found() {
        let notice = classify_line("ERROR: Device not found").unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.title, "No Device Found");
    }

    #[test]
    fn test_no_devices_matches_same_rule() {
        let notice = classify_line("adb: no devices/emulators found").unwrap();
        assert_eq!(notice.title, "No Device Found");
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert!(classify_line("DEVICE NOT FOUND").is_some());
    }

    #[test]
    fn test_connection_error_quotes_the_line() {
        let notice = classify_line("ERROR: connection reset mid-stream").unwrap();
        assert_eq!(notice.title, "Connection Error");
        assert_eq!(notice.detail, "ERROR: connection reset mid-stream");
    }

    #[test]
    fn test_connection_error_detail_is_clipped() {
        let line = format!("error: connection {}", "x".repeat(300));
        let notice = classify_line(&line).unwrap();
        assert_eq!(notice.detail.chars().count(), DETAIL_CLIP);
    }

    #[test]
    fn test_error_without_connection_is_not_a_connection_error() {
        assert!(classify_line("ERROR: could not open display").is_none());
    }

    #[test]
    fn test_encoder_issue_is_a_warning() {
        let notice = classify_line("ERROR: Encoder 'c2.android.hevc' failed").unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.title, "Encoder Issue");
    }

    #[test]
    fn test_device_not_found_wins_over_later_rules() {
        // Contains both "no devices" and "refused"; the first rule applies
        let notice = classify_line("no devices attached, connection refused").unwrap();
        assert_eq!(notice.title, "No Device Found");
    }

    #[test]
    fn test_timeout_and_refused() {
        assert_eq!(
            classify_line("server connection timeout after 5000ms").unwrap().title,
            "Connection Timeout"
        );
        assert_eq!(
            classify_line("failed to connect: Connection refused").unwrap().title,
            "Connection Refused"
        );
    }

    #[test]
    fn test_event_notices() {
        let ready = Device {
            serial: "R58M123".to_string(),
            state: DeviceState::Ready,
        };

        let notice = notice_for_event(&DeviceEvent::Connected(ready.clone()));
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.detail, "R58M123");

        let notice = notice_for_event(&DeviceEvent::Disconnected {
            serial: "R58M123".to_string(),
        });
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.title, "Device Disconnected");
    }

    #[test]
    fn test_unauthorized_notice_mentions_usb_debugging() {
        let device = Device {
            serial: "emulator-5554".to_string(),
            state: DeviceState::Unauthorized,
        };
        let notice = notice_for_event(&DeviceEvent::AuthorizationRequired(device));
        assert!(notice.detail.contains("USB debugging"));
    }

    #[test]
    fn test_notice_serialization() {
        let notice = Notice::new(Severity::Warning, "Limit Alert", "High buffering");
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"warning\""));

        let back: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(notice, back);
    }
}
