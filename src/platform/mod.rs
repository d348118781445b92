//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the device facilities the
//! core depends on: SD filesystem, TCP upload transport, clock, RNG and the
//! camera sensor control surface. All platform-specific code must stay
//! behind these traits.

pub mod error;
pub mod traits;

// Mock implementations for host tests
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{CameraError, NetError, PlatformError, Result, StorageError};
pub use traits::{RngInterface, SensorControl, StorageInterface, TimerInterface, UploadTransport};
