//! Declarative configuration engine
//!
//! The configuration lives in three layers, later layers overriding earlier
//! ones:
//!
//! 1. firmware defaults ([`AppConfig::default`]),
//! 2. build-specific custom values (the caller mutates the record before
//!    initialization),
//! 3. the operator's `/config.txt` on the SD card, applied by the loader.
//!
//! [`init_app_config`] runs layer 3 once per boot and logs the result.
//! Content problems in the file are warnings and never stop the device from
//! waking up with usable settings; whether a hard read failure is fatal is
//! decided by `AppConfig::ignore_read_error`.

pub mod loader;
pub mod registry;
pub mod secret;
pub mod sensor;
pub mod settings;

pub use loader::{ConfigError, ConfigWarning, LoadReport, WarningKind, CONFIG_FILE};
pub use secret::SecretKey;
pub use sensor::{SensorOverride, SensorOverrides, SensorParam};
pub use settings::{
    AppConfig, CameraSettings, OtaSettings, TimeSettings, UploadSettings, WifiSettings,
};

use crate::platform::traits::StorageInterface;

/// Initialize the application configuration from the SD card
///
/// Honors `config.read_from_sd` and runs at most once per boot
/// (`config.config_read_done`). Logs the resulting configuration either way.
///
/// # Errors
///
/// A hard read failure is returned only when
/// `config.ignore_read_error` is false; otherwise it is swallowed and
/// reported through [`LoadReport::read_failed`].
pub fn init_app_config<S: StorageInterface>(
    config: &mut AppConfig,
    storage: &mut S,
    key: &SecretKey,
) -> Result<LoadReport, ConfigError> {
    if !config.read_from_sd {
        crate::log_info!("Reading config from SD card is disabled.");
        config.log();
        return Ok(LoadReport::default());
    }
    if config.config_read_done {
        crate::log_info!("Config already read this boot.");
        config.log();
        return Ok(LoadReport::default());
    }
    config.config_read_done = true;

    let outcome = match loader::load_config(storage, CONFIG_FILE, config, key) {
        Ok(report) => {
            crate::log_info!(
                "Config read: {} parameters applied, {} warnings",
                report.applied,
                report.warning_total
            );
            Ok(report)
        }
        Err(_err) if config.ignore_read_error => {
            crate::log_error!("Failed to read config file {}", CONFIG_FILE);
            let mut report = LoadReport::default();
            report.read_failed = true;
            Ok(report)
        }
        Err(err) => Err(err),
    };
    config.log();
    outcome
}
