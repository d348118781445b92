//! Application configuration record
//!
//! One [`AppConfig`] value is constructed per boot and passed explicitly to
//! every component that needs it; there is no global configuration state.
//! `AppConfig::default()` carries the firmware defaults, the caller may
//! overwrite fields with build-specific custom values, and the configuration
//! file on the SD card overrides both (see [`crate::config::init_app_config`]).

use super::sensor::{SensorOverrides, SensorParam};
use heapless::String;

/// Maximum SSID length (IEEE 802.11 standard)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WiFi password length (WPA2 standard)
pub const MAX_PASSWORD_LEN: usize = 63;

/// Maximum NTP server host name length
pub const MAX_NTP_SERVER_LEN: usize = 64;

/// Maximum OTA firmware URL length
pub const MAX_OTA_URL_LEN: usize = 96;

/// Maximum upload server host name length
pub const MAX_SERVER_ADDRESS_LEN: usize = 64;

/// Maximum upload request path length
pub const MAX_UPLOAD_PATH_LEN: usize = 64;

/// Maximum upload auth token length
pub const MAX_AUTH_LEN: usize = 32;

const AWAKE_DURATION_MS_DEFAULT: u16 = 2000;
const DEEP_SLEEP_DURATION_SEC_DEFAULT: u16 = 0;
const WIFI_CONNECT_ATTEMPT_MAX_DEFAULT: u8 = 30;
const NTP_SERVER_DEFAULT: &str = "pool.ntp.org";
const DAYLIGHT_OFFSET_SEC_DEFAULT: i32 = 3600;
const SYNC_TIME_PERIOD_HOURS_DEFAULT: u8 = 24;
const OTA_CHECK_PERIOD_HOURS_DEFAULT: u8 = 24;
const UPLOAD_SERVER_PORT_DEFAULT: u16 = 80;
const UPLOAD_BUNCH_SIZE_DEFAULT: u8 = 2;
const FILE_NAME_RAND_SIZE_DEFAULT: u8 = 5;
const GET_READY_DELAY_MS_DEFAULT: u16 = 1500;

/// WiFi settings (`[wifi]` section)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiSettings {
    /// Associate to the network at wake-up
    pub enabled: bool,
    /// Network SSID
    pub ssid: String<MAX_SSID_LEN>,
    /// Network password (WPA2)
    pub password: String<MAX_PASSWORD_LEN>,
    /// Association attempts before giving up for this cycle
    pub connect_attempt_max: u8,
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            ssid: String::new(),
            password: String::new(),
            connect_attempt_max: WIFI_CONNECT_ATTEMPT_MAX_DEFAULT,
        }
    }
}

/// Time synchronization settings (`[time]` section)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSettings {
    /// Sync the clock over NTP
    pub enabled: bool,
    /// NTP server host name
    pub ntp_server: String<MAX_NTP_SERVER_LEN>,
    /// GMT offset in seconds
    pub gmt_offset_sec: i64,
    /// Daylight saving offset in seconds
    pub daylight_offset_sec: i32,
    /// Hours between NTP synchronizations
    pub sync_period_hours: u8,
}

impl Default for TimeSettings {
    fn default() -> Self {
        let mut ntp_server = String::new();
        // NTP_SERVER_DEFAULT fits MAX_NTP_SERVER_LEN
        let _ = ntp_server.push_str(NTP_SERVER_DEFAULT);
        Self {
            enabled: true,
            ntp_server,
            gmt_offset_sec: 0,
            daylight_offset_sec: DAYLIGHT_OFFSET_SEC_DEFAULT,
            sync_period_hours: SYNC_TIME_PERIOD_HOURS_DEFAULT,
        }
    }
}

/// Over-the-air update settings (`[ota]` section)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaSettings {
    /// Hours between firmware update checks
    pub check_period_hours: u8,
    /// Firmware binary URL; empty disables OTA
    pub url: String<MAX_OTA_URL_LEN>,
}

impl Default for OtaSettings {
    fn default() -> Self {
        Self {
            check_period_hours: OTA_CHECK_PERIOD_HOURS_DEFAULT,
            url: String::new(),
        }
    }
}

/// Picture upload settings (`[upload]` section)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Upload pictures to the server
    pub enabled: bool,
    /// Server host name or address
    pub server_address: String<MAX_SERVER_ADDRESS_LEN>,
    /// Server TCP port
    pub server_port: u16,
    /// Request path of the upload endpoint
    pub path: String<MAX_UPLOAD_PATH_LEN>,
    /// Auth token sent as the `auth` form field
    pub auth: String<MAX_AUTH_LEN>,
    /// Minimum number of pending pictures before a batch is attempted
    pub bunch_size: u8,
    /// Length of the random part of non-persisted picture names
    pub file_name_rand_size: u8,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            server_address: String::new(),
            server_port: UPLOAD_SERVER_PORT_DEFAULT,
            path: String::new(),
            auth: String::new(),
            bunch_size: UPLOAD_BUNCH_SIZE_DEFAULT,
            file_name_rand_size: FILE_NAME_RAND_SIZE_DEFAULT,
        }
    }
}

/// Camera settings (`[camera]` and `[sensor]` sections)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSettings {
    /// Delay after sensor init before the first capture, in milliseconds
    ///
    /// Too short a delay yields dark green frames.
    pub get_ready_delay_ms: u16,
    /// Sparse sensor tuning overrides
    pub sensor: SensorOverrides,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let mut sensor = SensorOverrides::new();
        // Factory tuning: auto gain, auto exposure, auto white balance and a
        // slight brightness lift against underexposed outdoor shots.
        sensor.set(SensorParam::GainCtrl, 1);
        sensor.set(SensorParam::ExposureCtrl, 1);
        sensor.set(SensorParam::AwbGain, 1);
        sensor.set(SensorParam::Brightness, 1);
        sensor.set(SensorParam::Gainceiling, 1);
        Self {
            get_ready_delay_ms: GET_READY_DELAY_MS_DEFAULT,
            sensor,
        }
    }
}

/// Application configuration
///
/// Constructed once per boot; see the module documentation for the
/// defaults / custom values / SD card precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Read `/config.txt` from the SD card at initialization
    pub read_from_sd: bool,
    /// Internal: set once the configuration file has been read this boot
    pub config_read_done: bool,
    /// Continue with defaults when the configuration file cannot be read
    pub ignore_read_error: bool,
    /// Persist captured pictures on the SD card
    pub save_picture_on_sd: bool,
    /// Pause after the capture, preventing picture bursts
    pub awake_duration_ms: u16,
    /// Deep sleep duration before the next wake-up; 0 means infinite
    pub deep_sleep_duration_sec: u16,
    /// WiFi settings
    pub wifi: WifiSettings,
    /// Time synchronization settings
    pub time: TimeSettings,
    /// OTA update settings
    pub ota: OtaSettings,
    /// Picture upload settings
    pub upload: UploadSettings,
    /// Camera settings
    pub camera: CameraSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            read_from_sd: true,
            config_read_done: false,
            ignore_read_error: true,
            save_picture_on_sd: true,
            awake_duration_ms: AWAKE_DURATION_MS_DEFAULT,
            deep_sleep_duration_sec: DEEP_SLEEP_DURATION_SEC_DEFAULT,
            wifi: WifiSettings::default(),
            time: TimeSettings::default(),
            ota: OtaSettings::default(),
            upload: UploadSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl AppConfig {
    /// Log every configuration field at info level
    ///
    /// Secret values are masked.
    pub fn log(&self) {
        crate::log_info!("Current app config:");
        crate::log_info!("[root]");
        crate::log_info!("- readFromSd            = {}", self.read_from_sd);
        crate::log_info!("- ignoreReadError       = {}", self.ignore_read_error);
        crate::log_info!("- savePictureOnSdCard   = {}", self.save_picture_on_sd);
        crate::log_info!("- awakeDurationMs       = {}", self.awake_duration_ms);
        crate::log_info!("- deepSleepDurationSec  = {}", self.deep_sleep_duration_sec);
        crate::log_info!("[wifi]");
        crate::log_info!("- enabled               = {}", self.wifi.enabled);
        crate::log_info!("- ssid                  = {}", self.wifi.ssid.as_str());
        crate::log_info!("- password              = {}", mask(&self.wifi.password));
        crate::log_info!("- connectAttemptMax     = {}", self.wifi.connect_attempt_max);
        crate::log_info!("[time]");
        crate::log_info!("- enabled               = {}", self.time.enabled);
        crate::log_info!("- ntpServer             = {}", self.time.ntp_server.as_str());
        crate::log_info!("- gmtOffsetSec          = {}", self.time.gmt_offset_sec);
        crate::log_info!("- daylightOffsetSec     = {}", self.time.daylight_offset_sec);
        crate::log_info!("- syncTimePeriodHours   = {}", self.time.sync_period_hours);
        crate::log_info!("[ota]");
        crate::log_info!("- checkPeriodHours      = {}", self.ota.check_period_hours);
        crate::log_info!("- url                   = {}", self.ota.url.as_str());
        crate::log_info!("[upload]");
        crate::log_info!("- enabled               = {}", self.upload.enabled);
        crate::log_info!("- serverAddress         = {}", self.upload.server_address.as_str());
        crate::log_info!("- serverPort            = {}", self.upload.server_port);
        crate::log_info!("- path                  = {}", self.upload.path.as_str());
        crate::log_info!("- auth                  = {}", mask(&self.upload.auth));
        crate::log_info!("- bunchSize             = {}", self.upload.bunch_size);
        crate::log_info!("- fileNameRandSize      = {}", self.upload.file_name_rand_size);
        crate::log_info!("[camera]");
        crate::log_info!("- getReadyDelayMs       = {}", self.camera.get_ready_delay_ms);
        crate::log_info!(
            "- sensor overrides      = {}",
            self.camera.sensor.enabled_count()
        );
    }
}

#[allow(dead_code)]
fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "********"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_firmware_factory_values() {
        let config = AppConfig::default();

        assert!(config.read_from_sd);
        assert!(config.ignore_read_error);
        assert!(config.save_picture_on_sd);
        assert_eq!(config.awake_duration_ms, 2000);
        assert_eq!(config.deep_sleep_duration_sec, 0);

        assert!(!config.wifi.enabled);
        assert!(config.wifi.ssid.is_empty());
        assert_eq!(config.wifi.connect_attempt_max, 30);

        assert!(config.time.enabled);
        assert_eq!(config.time.ntp_server.as_str(), "pool.ntp.org");
        assert_eq!(config.time.daylight_offset_sec, 3600);

        assert!(!config.upload.enabled);
        assert_eq!(config.upload.server_port, 80);
        assert_eq!(config.upload.bunch_size, 2);
        assert_eq!(config.upload.file_name_rand_size, 5);

        assert_eq!(config.camera.get_ready_delay_ms, 1500);
    }

    #[test]
    fn test_default_sensor_overrides() {
        let sensor = &AppConfig::default().camera.sensor;
        assert_eq!(sensor.enabled_count(), 5);
        assert!(sensor.get(SensorParam::GainCtrl).enabled);
        assert!(sensor.get(SensorParam::ExposureCtrl).enabled);
        assert!(sensor.get(SensorParam::AwbGain).enabled);
        assert_eq!(sensor.get(SensorParam::Brightness).value, 1);
        assert_eq!(sensor.get(SensorParam::Gainceiling).value, 1);
        assert!(!sensor.get(SensorParam::Contrast).enabled);
    }

    #[test]
    fn test_mask_hides_non_empty_values() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("hunter2"), "********");
    }
}
