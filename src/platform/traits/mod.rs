//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod net;
pub mod rng;
pub mod sensor;
pub mod storage;
pub mod timer;

// Re-export trait interfaces
pub use net::UploadTransport;
pub use rng::RngInterface;
pub use sensor::SensorControl;
pub use storage::StorageInterface;
pub use timer::TimerInterface;
