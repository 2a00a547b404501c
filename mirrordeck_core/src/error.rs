//! Error types for Mirrordeck

use thiserror::Error;

/// Main error type for Mirrordeck operations
#[derive(Error, Debug)]
pub enum MirrordeckError {
    #[error("Device bridge error: {0}")]
    Bridge(String),

    #[error("Failed to spawn mirror process: {0}")]
    Spawn(String),

    #[error("Mirror session error: {0}")]
    Session(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device not ready: {0}")]
    DeviceNotReady(String),
}

pub type Result<T> = std::result::Result<T, MirrordeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MirrordeckError::Bridge("adb not reachable".to_string());
        assert_eq!(err.to_string(), "Device bridge error: adb not reachable");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MirrordeckError = io_err.into();
        assert!(matches!(err, MirrordeckError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(MirrordeckError::Timeout("adb devices".to_string()));
        assert!(err_result.is_err());
    }
}
