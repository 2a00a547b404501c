//! Locations of the external executables
//!
//! scrcpy and adb are opaque collaborators; Mirrordeck only needs a path
//! (or a bare program name resolved through `PATH`) to invoke them.

use std::path::PathBuf;

/// Environment variable overriding the adb executable path
pub const ADB_ENV: &str = "MIRRORDECK_ADB";
/// Environment variable overriding the scrcpy executable path
pub const SCRCPY_ENV: &str = "MIRRORDECK_SCRCPY";

/// Paths to the two wrapped executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub adb: PathBuf,
    pub scrcpy: PathBuf,
}

impl Toolchain {
    /// Explicit paths to both tools
    pub fn new(adb: impl Into<PathBuf>, scrcpy: impl Into<PathBuf>) -> Self {
        Self {
            adb: adb.into(),
            scrcpy: scrcpy.into(),
        }
    }

    /// Resolve from the environment, falling back to bare program names
    /// that the OS resolves through `PATH`
    pub fn from_env() -> Self {
        Self {
            adb: resolve(std::env::var_os(ADB_ENV), "adb"),
            scrcpy: resolve(std::env::var_os(SCRCPY_ENV), "scrcpy"),
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new("adb", "scrcpy")
    }
}

fn resolve(env_value: Option<std::ffi::OsString>, fallback: &str) -> PathBuf {
    match env_value {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(fallback),
    }
}
