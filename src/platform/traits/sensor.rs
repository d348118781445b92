//! Camera sensor control trait
//!
//! The camera-init collaborator implements this trait; the configuration
//! engine only fills the override table and hands it over through
//! [`crate::config::sensor::SensorOverrides::apply_to`].

use crate::config::sensor::SensorParam;
use crate::platform::error::CameraError;

/// Camera sensor tuning surface
pub trait SensorControl {
    /// Apply one tuning value to the sensor
    ///
    /// # Errors
    ///
    /// Returns `CameraError::SettingRejected` when the sensor refuses the
    /// value, `CameraError::NotReady` when the sensor is not initialized.
    fn apply(&mut self, param: SensorParam, value: i32) -> Result<(), CameraError>;
}
