//! Mock camera sensor for testing
//!
//! Records every applied tuning value for verification.

use crate::config::sensor::SensorParam;
use crate::platform::error::CameraError;
use crate::platform::traits::SensorControl;
use std::vec::Vec;

/// Mock camera sensor control surface
#[derive(Debug, Default)]
pub struct MockSensor {
    applied: Vec<(SensorParam, i32)>,
    reject_settings: bool,
}

impl MockSensor {
    /// Create a sensor that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent tuning value
    pub fn reject_settings(&mut self) {
        self.reject_settings = true;
    }

    /// Applied (param, value) pairs in application order
    pub fn applied(&self) -> &[(SensorParam, i32)] {
        &self.applied
    }
}

impl SensorControl for MockSensor {
    fn apply(&mut self, param: SensorParam, value: i32) -> Result<(), CameraError> {
        if self.reject_settings {
            return Err(CameraError::SettingRejected);
        }
        self.applied.push((param, value));
        Ok(())
    }
}
