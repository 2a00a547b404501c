//! Device-bridge (adb) invocation and output parsing
//!
//! adb is an external executable with no machine-readable interface; this
//! module runs it with an argument list and classifies what it prints.
//! The command transport sits behind [`AdbTransport`] so parsing and
//! classification can be tested without a real binary.

use crate::error::{MirrordeckError, Result};
use crate::toolchain::Toolchain;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How long a single adb invocation may take
pub const ADB_TIMEOUT: Duration = Duration::from_secs(10);
/// Default port for wifi (tcpip) connections
pub const DEFAULT_WIFI_PORT: u16 = 5555;

/// Connection state column of `adb devices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// The `device` column value: authorized and usable
    Ready,
    Unauthorized,
    Offline,
    Other(String),
}

impl DeviceState {
    fn parse(column: &str) -> Self {
        match column {
            "device" => Self::Ready,
            "unauthorized" => Self::Unauthorized,
            "offline" => Self::Offline,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Badge text for list views
    pub fn label(&self) -> &str {
        match self {
            Self::Ready => "Ready",
            Self::Unauthorized => "Unauthorized",
            Self::Offline => "Offline",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "device"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Offline => write!(f, "offline"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A device row from `adb devices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub serial: String,
    pub state: DeviceState,
}

/// Captured output of one adb invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl AdbOutput {
    /// adb frequently exits non-zero while still printing a usable result;
    /// anything on stdout counts as success
    pub fn succeeded(&self) -> bool {
        self.code == Some(0) || !self.stdout.trim().is_empty()
    }

    /// The text worth showing: stdout on success, stderr otherwise
    pub fn text(&self) -> &str {
        if self.succeeded() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Executes adb with an argument list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdbTransport: Send + Sync {
    async fn run(&self, args: Vec<String>) -> Result<AdbOutput>;
}

/// Transport that invokes the real executable
pub struct SystemTransport {
    adb: PathBuf,
}

impl SystemTransport {
    pub fn new(adb: PathBuf) -> Self {
        Self { adb }
    }
}

#[async_trait]
impl AdbTransport for SystemTransport {
    async fn run(&self, args: Vec<String>) -> Result<AdbOutput> {
        debug!("Running: {} {}", self.adb.display(), args.join(" "));

        let result = tokio::time::timeout(
            ADB_TIMEOUT,
            tokio::process::Command::new(&self.adb).args(&args).output(),
        )
        .await
        .map_err(|_| MirrordeckError::Timeout(format!("adb {}", args.join(" "))))?;

        let output = result.map_err(|e| {
            MirrordeckError::Bridge(format!("failed to run {}: {}", self.adb.display(), e))
        })?;

        Ok(AdbOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Client for the device-bridge executable
#[derive(Clone)]
pub struct AdbClient {
    transport: Arc<dyn AdbTransport>,
}

impl AdbClient {
    pub fn new(toolchain: &Toolchain) -> Self {
        Self {
            transport: Arc::new(SystemTransport::new(toolchain.adb.clone())),
        }
    }

    /// Swap the transport, mainly for tests
    pub fn with_transport(transport: Arc<dyn AdbTransport>) -> Self {
        Self { transport }
    }

    /// List connected devices
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let output = self.transport.run(vec!["devices".to_string()]).await?;
        if !output.succeeded() {
            return Err(MirrordeckError::Bridge(output.text().trim().to_string()));
        }
        Ok(parse_devices(&output.stdout))
    }

    /// Bridge to a device over wifi; success is classified by the
    /// `connected` substring in adb's reply
    pub async fn connect(&self, host: &str, port: u16) -> Result<String> {
        let target = format!("{}:{}", host, port);
        let output = self
            .transport
            .run(vec!["connect".to_string(), target.clone()])
            .await?;

        let text = output.text().trim().to_string();
        if output.succeeded() && text.to_lowercase().contains("connected") {
            Ok(text)
        } else if text.is_empty() {
            Err(MirrordeckError::Bridge(format!(
                "could not reach {}",
                target
            )))
        } else {
            Err(MirrordeckError::Bridge(text))
        }
    }

    /// Drop a wifi bridge
    pub async fn disconnect(&self, host: &str, port: u16) -> Result<String> {
        let target = format!("{}:{}", host, port);
        let output = self
            .transport
            .run(vec!["disconnect".to_string(), target])
            .await?;
        Ok(output.text().trim().to_string())
    }
}

/// Parse the output of `adb devices`.
///
/// Skips the header and daemon-startup lines wherever they appear, tolerates
/// malformed rows, and drops serials of three characters or fewer.
pub fn parse_devices(output: &str) -> Vec<Device> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices"))
        .filter(|line| !line.starts_with('*'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(Device {
                serial: serial.to_string(),
                state: DeviceState::parse(state),
            })
        })
        .filter(|device| device.serial.len() > 2)
        .collect()
}
