//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// SD filesystem operation failed
    Storage(StorageError),
    /// Network operation failed
    Net(NetError),
    /// Camera sensor operation failed
    Camera(CameraError),
    /// Platform initialization failed
    InitializationFailed,
}

/// SD filesystem errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// File does not exist
    NotFound,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
}

/// Network client errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// Connection to the remote host failed
    ConnectFailed,
    /// Send operation failed
    SendFailed,
    /// Connection closed by the peer
    Closed,
}

/// Camera sensor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// The sensor rejected a tuning value
    SettingRejected,
    /// The sensor is not initialized
    NotReady,
}

impl From<StorageError> for PlatformError {
    fn from(err: StorageError) -> Self {
        PlatformError::Storage(err)
    }
}

impl From<NetError> for PlatformError {
    fn from(err: NetError) -> Self {
        PlatformError::Net(err)
    }
}

impl From<CameraError> for PlatformError {
    fn from(err: CameraError) -> Self {
        PlatformError::Camera(err)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Storage(e) => write!(f, "Storage error: {:?}", e),
            PlatformError::Net(e) => write!(f, "Network error: {:?}", e),
            PlatformError::Camera(e) => write!(f, "Camera error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
        }
    }
}
