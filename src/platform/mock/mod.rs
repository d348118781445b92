//! Mock platform implementations for testing
//!
//! std-backed in-memory doubles of the platform traits, with failure
//! injection for error-path tests. Compiled under `cfg(test)` or the
//! `mock` feature.

pub mod net;
pub mod rng;
pub mod sensor;
pub mod storage;
pub mod timer;

pub use net::MockTransport;
pub use rng::MockRng;
pub use sensor::MockSensor;
pub use storage::MockStorage;
pub use timer::MockTimer;
