//! Parameter registry
//!
//! Declarative tables binding each configuration key to a typed setter for
//! its destination field in [`AppConfig`]. The loader resolves every
//! `key=value` line against the table of the active section and invokes the
//! matching setter at most once per key per load.
//!
//! Setters are plain function pointers writing one field; the table carries
//! no pointers into the configuration record itself, so there is no aliasing
//! and no unsafe dispatch.

use super::sensor::SensorParam;
use super::settings::AppConfig;
use bitflags::bitflags;
use heapless::String;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Value is a secret; never log it raw
        const HIDDEN = 0b0000_0001;
    }
}

/// Bounded text destination
///
/// Implemented for `heapless::String<N>`: the capacity bound travels with
/// the destination type, so string setters cannot write past it.
pub trait TextSlot {
    /// Capacity of the destination in bytes
    fn capacity(&self) -> usize;

    /// Replace the contents with `value`, truncating at capacity on a char
    /// boundary. Returns true when the value fit without truncation.
    fn store(&mut self, value: &str) -> bool;
}

impl<const N: usize> TextSlot for String<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn store(&mut self, value: &str) -> bool {
        self.clear();
        if value.len() <= N {
            // Cannot fail: length checked against capacity
            let _ = self.push_str(value);
            return true;
        }
        let mut end = N;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.push_str(&value[..end]);
        false
    }
}

/// Typed write strategy for one configuration key
pub enum Apply {
    /// Truthy/falsy parse, write bit
    Bool(fn(&mut AppConfig, bool)),
    /// Decimal parse, truncate to 8 bits
    U8(fn(&mut AppConfig, u8)),
    /// Decimal parse, truncate to 16 bits
    U16(fn(&mut AppConfig, u16)),
    /// Decimal parse, truncate to 32 bits
    I32(fn(&mut AppConfig, i32)),
    /// Wide decimal parse; malformed input leaves the destination unchanged
    I64(fn(&mut AppConfig, i64)),
    /// Bounded copy into a text destination; returns fit-without-truncation
    Text(fn(&mut AppConfig, &str) -> bool),
    /// Like `Text`, but the raw value is decoded by the secret codec first
    Secret(fn(&mut AppConfig, &str) -> bool),
    /// Enable the sensor override slot with the parsed value
    Sensor(SensorParam),
}

/// One parameter that can be read from the configuration file
///
/// `already_set` makes assignment idempotent-once: a second occurrence of
/// the key in the same load is rejected as a duplicate.
pub struct ParamSpec {
    /// Key in the configuration file
    pub name: &'static str,
    /// Parameter flags
    pub flags: ParamFlags,
    /// True once the parameter has been matched in this load
    pub already_set: bool,
    /// Typed setter
    pub apply: Apply,
}

impl ParamSpec {
    /// Parameter with default flags
    pub fn new(name: &'static str, apply: Apply) -> Self {
        Self {
            name,
            flags: ParamFlags::empty(),
            already_set: false,
            apply,
        }
    }

    /// Secret parameter (value never logged raw)
    pub fn hidden(name: &'static str, apply: Apply) -> Self {
        Self {
            name,
            flags: ParamFlags::HIDDEN,
            already_set: false,
            apply,
        }
    }
}

/// Parameters of one configuration section
pub struct Section<'a> {
    /// Section name; the unnamed root section is ""
    pub name: &'static str,
    /// Parameters, in declaration order
    pub params: &'a mut [ParamSpec],
}

/// First parameter matching `key` that has not been set yet
///
/// Names are unique within a section, so this scan only exists to reject
/// duplicates while keeping the lookup single-pass and allocation-free.
pub fn find_unset<'a>(params: &'a mut [ParamSpec], key: &str) -> Option<&'a mut ParamSpec> {
    params.iter_mut().find(|p| !p.already_set && p.name == key)
}

/// Root section parameters
pub fn root_params() -> [ParamSpec; 3] {
    [
        ParamSpec::new(
            "savePictureOnSdCard",
            Apply::Bool(|c, v| c.save_picture_on_sd = v),
        ),
        ParamSpec::new("awakeDurationMs", Apply::U16(|c, v| c.awake_duration_ms = v)),
        ParamSpec::new(
            "deepSleepDurationSec",
            Apply::U16(|c, v| c.deep_sleep_duration_sec = v),
        ),
    ]
}

/// `[wifi]` section parameters
pub fn wifi_params() -> [ParamSpec; 5] {
    [
        ParamSpec::new("enabled", Apply::Bool(|c, v| c.wifi.enabled = v)),
        ParamSpec::new("ssid", Apply::Text(|c, v| c.wifi.ssid.store(v))),
        ParamSpec::hidden("password", Apply::Text(|c, v| c.wifi.password.store(v))),
        ParamSpec::hidden("passwordEnc", Apply::Secret(|c, v| c.wifi.password.store(v))),
        ParamSpec::new(
            "connectAttemptMax",
            Apply::U8(|c, v| c.wifi.connect_attempt_max = v),
        ),
    ]
}

/// `[time]` section parameters
pub fn time_params() -> [ParamSpec; 5] {
    [
        ParamSpec::new("enabled", Apply::Bool(|c, v| c.time.enabled = v)),
        ParamSpec::new("ntpServer", Apply::Text(|c, v| c.time.ntp_server.store(v))),
        ParamSpec::new("gmtOffsetSec", Apply::I64(|c, v| c.time.gmt_offset_sec = v)),
        ParamSpec::new(
            "daylightOffsetSec",
            Apply::I32(|c, v| c.time.daylight_offset_sec = v),
        ),
        ParamSpec::new(
            "syncTimePeriodHours",
            Apply::U8(|c, v| c.time.sync_period_hours = v),
        ),
    ]
}

/// `[ota]` section parameters
pub fn ota_params() -> [ParamSpec; 2] {
    [
        ParamSpec::new(
            "checkPeriodHours",
            Apply::U8(|c, v| c.ota.check_period_hours = v),
        ),
        ParamSpec::new("url", Apply::Text(|c, v| c.ota.url.store(v))),
    ]
}

/// `[upload]` section parameters
pub fn upload_params() -> [ParamSpec; 8] {
    [
        ParamSpec::new("enabled", Apply::Bool(|c, v| c.upload.enabled = v)),
        ParamSpec::new(
            "serverAddress",
            Apply::Text(|c, v| c.upload.server_address.store(v)),
        ),
        ParamSpec::new("serverPort", Apply::U16(|c, v| c.upload.server_port = v)),
        ParamSpec::new("path", Apply::Text(|c, v| c.upload.path.store(v))),
        ParamSpec::hidden("auth", Apply::Text(|c, v| c.upload.auth.store(v))),
        ParamSpec::hidden("authEnc", Apply::Secret(|c, v| c.upload.auth.store(v))),
        ParamSpec::new("bunchSize", Apply::U8(|c, v| c.upload.bunch_size = v)),
        ParamSpec::new(
            "fileNameRandSize",
            Apply::U8(|c, v| c.upload.file_name_rand_size = v),
        ),
    ]
}

/// `[camera]` section parameters
pub fn camera_params() -> [ParamSpec; 1] {
    [ParamSpec::new(
        "getReadyDelayMs",
        Apply::U16(|c, v| c.camera.get_ready_delay_ms = v),
    )]
}

/// `[sensor]` section parameters, one per known tuning parameter
pub fn sensor_params() -> [ParamSpec; SensorParam::COUNT] {
    SensorParam::ALL.map(|p| ParamSpec::new(p.key(), Apply::Sensor(p)))
}
