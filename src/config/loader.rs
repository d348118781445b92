//! Configuration file loader
//!
//! Streams the line-oriented `key=value` source, tracks the active
//! `[section]`, resolves each key against the section's parameter table and
//! invokes the matching typed setter exactly once per key.
//!
//! Everything that can go wrong inside the file (unknown section, unknown or
//! duplicate key, unparseable or truncated value) is a warning: it is
//! recorded in the [`LoadReport`] and processing continues. The only hard
//! failure is a source that cannot be read at all.

use super::registry::{self, Apply, ParamFlags, Section, TextSlot};
use super::secret::{self, SecretKey};
use super::settings::AppConfig;
use crate::platform::traits::StorageInterface;
use crate::platform::StorageError;
use core::fmt;
use heapless::{String, Vec};

/// Configuration file path on the SD card
pub const CONFIG_FILE: &str = "/config.txt";

/// Maximum configuration file size
const CONFIG_FILE_MAX: usize = 4096;

/// Scratch buffer for decoded secret values
const SECRET_BUF_LEN: usize = 128;

/// Maximum recorded warnings; later ones are only counted
pub const MAX_WARNINGS: usize = 16;

/// Maximum stored length of a warned-about name
const WARN_NAME_LEN: usize = 32;

/// What a configuration warning is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Section header does not match any known section
    UnknownSection,
    /// Key is unknown in the active section, already set, or appears under
    /// an unknown section
    UnrecognizedKey,
    /// Line is neither a section header nor `key=value`
    MalformedLine,
    /// Value could not be parsed for the parameter's type
    BadValue,
    /// Value was cut at the destination capacity
    Truncated,
}

/// One recorded configuration warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Warning kind
    pub kind: WarningKind,
    /// Key or section name the warning is about (possibly shortened)
    pub name: String<WARN_NAME_LEN>,
}

/// Outcome of one configuration load
///
/// Warnings never make the load fail; a flag on the caller side decides
/// whether a non-clean report escalates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of parameters successfully applied
    pub applied: u16,
    /// Recorded warnings (first [`MAX_WARNINGS`])
    pub warnings: Vec<ConfigWarning, MAX_WARNINGS>,
    /// Total warning count, including ones beyond the recording capacity
    pub warning_total: u16,
    /// The source could not be read and defaults were kept
    pub read_failed: bool,
}

impl LoadReport {
    /// True when the load produced no warnings and the source was readable
    pub fn is_clean(&self) -> bool {
        self.warning_total == 0 && !self.read_failed
    }

    fn record(&mut self, kind: WarningKind, name: &str) {
        self.warning_total = self.warning_total.saturating_add(1);
        let mut stored: String<WARN_NAME_LEN> = String::new();
        stored.store(name);
        let _ = self.warnings.push(ConfigWarning { kind, name: stored });
    }
}

/// Configuration load errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The source cannot be opened or read
    Storage(StorageError),
    /// The source is not decodable text or exceeds the read buffer
    Malformed,
}

impl From<StorageError> for ConfigError {
    fn from(err: StorageError) -> Self {
        ConfigError::Storage(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Storage(e) => write!(f, "config read error: {:?}", e),
            ConfigError::Malformed => write!(f, "config file is not readable text"),
        }
    }
}

/// Read and apply the configuration file at `path`
///
/// # Errors
///
/// Hard failures only: the file cannot be read ([`ConfigError::Storage`]) or
/// is not decodable text ([`ConfigError::Malformed`]). File content problems
/// surface as warnings in the report instead.
pub fn load_config<S: StorageInterface>(
    storage: &mut S,
    path: &str,
    config: &mut AppConfig,
    key: &SecretKey,
) -> Result<LoadReport, ConfigError> {
    let mut buf = [0u8; CONFIG_FILE_MAX];
    let len = storage.read(path, 0, &mut buf)?;
    if len == CONFIG_FILE_MAX {
        // Anything left beyond the buffer means the file is oversized
        let mut probe = [0u8; 1];
        if storage.read(path, len as u32, &mut probe)? != 0 {
            return Err(ConfigError::Malformed);
        }
    }
    let text = core::str::from_utf8(&buf[..len]).map_err(|_| ConfigError::Malformed)?;
    Ok(load_from_str(text, config, key))
}

/// Apply configuration text to `config`
///
/// The parameter tables are constructed fresh for this load; each parameter
/// is assigned at most once.
pub fn load_from_str(text: &str, config: &mut AppConfig, key: &SecretKey) -> LoadReport {
    let mut root = registry::root_params();
    let mut wifi = registry::wifi_params();
    let mut time = registry::time_params();
    let mut ota = registry::ota_params();
    let mut upload = registry::upload_params();
    let mut camera = registry::camera_params();
    let mut sensor = registry::sensor_params();
    let mut sections: [Section<'_>; 7] = [
        Section {
            name: "",
            params: &mut root,
        },
        Section {
            name: "wifi",
            params: &mut wifi,
        },
        Section {
            name: "time",
            params: &mut time,
        },
        Section {
            name: "ota",
            params: &mut ota,
        },
        Section {
            name: "upload",
            params: &mut upload,
        },
        Section {
            name: "camera",
            params: &mut camera,
        },
        Section {
            name: "sensor",
            params: &mut sensor,
        },
    ];

    let mut report = LoadReport::default();
    // The unnamed root section is active until the first header
    let mut active: Option<usize> = Some(0);

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let name = header.trim();
            active = sections.iter().position(|s| s.name == name);
            if active.is_some() {
                crate::log_debug!("Config section changed: [{}]", name);
            } else {
                crate::log_warn!("Config section not recognized: [{}]", name);
                report.record(WarningKind::UnknownSection, name);
            }
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            crate::log_warn!("Config line is not key=value: {}", line);
            report.record(WarningKind::MalformedLine, line);
            continue;
        };
        let param_key = raw_key.trim();
        let value = raw_value.trim();

        // Keys under an unrecognized section resolve against an empty table
        let matched = active
            .and_then(|idx| registry::find_unset(sections[idx].params, param_key));

        let Some(spec) = matched else {
            crate::log_warn!("Unknown or already defined parameter {}", param_key);
            report.record(WarningKind::UnrecognizedKey, param_key);
            continue;
        };

        // Marked before the setter runs: a later duplicate is rejected even
        // when this value turns out to be unparseable.
        spec.already_set = true;
        if spec.flags.contains(ParamFlags::HIDDEN) {
            crate::log_debug!("Config set {} = <hidden>", param_key);
        } else {
            crate::log_debug!("Config set {} = {}", param_key, value);
        }

        match apply_value(&spec.apply, value, config, key) {
            Ok(true) => report.applied += 1,
            Ok(false) => {
                crate::log_warn!("Config value for {} truncated", param_key);
                report.applied += 1;
                report.record(WarningKind::Truncated, param_key);
            }
            Err(kind) => {
                crate::log_warn!("Config value for {} rejected", param_key);
                report.record(kind, param_key);
            }
        }
    }

    report
}

/// Invoke one typed setter with a raw textual value
///
/// `Ok(false)` means the value was applied but truncated.
fn apply_value(
    apply: &Apply,
    raw: &str,
    config: &mut AppConfig,
    key: &SecretKey,
) -> Result<bool, WarningKind> {
    match apply {
        Apply::Bool(set) => {
            set(config, parse_bool(raw).ok_or(WarningKind::BadValue)?);
            Ok(true)
        }
        Apply::U8(set) => {
            set(config, parse_wide(raw)? as u8);
            Ok(true)
        }
        Apply::U16(set) => {
            set(config, parse_wide(raw)? as u16);
            Ok(true)
        }
        Apply::I32(set) => {
            set(config, parse_wide(raw)? as i32);
            Ok(true)
        }
        Apply::I64(set) => {
            // Tolerant wide kind: malformed input leaves the destination unchanged
            if let Ok(v) = raw.parse::<i64>() {
                set(config, v);
            }
            Ok(true)
        }
        Apply::Text(set) => Ok(set(config, raw)),
        Apply::Secret(set) => {
            let mut buf = [0u8; SECRET_BUF_LEN];
            let plain =
                secret::decode(raw, key, &mut buf).map_err(|_| WarningKind::BadValue)?;
            Ok(set(config, plain))
        }
        Apply::Sensor(param) => {
            let value = parse_wide(raw)? as i32;
            config.camera.sensor.set(*param, value);
            Ok(true)
        }
    }
}

/// Truthy/falsy parse
fn parse_bool(raw: &str) -> Option<bool> {
    const TRUE: &[&str] = &["true", "1", "yes", "on"];
    const FALSE: &[&str] = &["false", "0", "no", "off"];
    if TRUE.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

/// Wide decimal parse; narrow kinds truncate the result after parsing
fn parse_wide(raw: &str) -> Result<i64, WarningKind> {
    raw.parse::<i64>().map_err(|_| WarningKind::BadValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sensor::SensorParam;
    use crate::platform::mock::MockStorage;

    fn test_key() -> SecretKey {
        SecretKey::new([1, 2, 3, 4, 5, 6])
    }

    fn load(text: &str, config: &mut AppConfig) -> LoadReport {
        load_from_str(text, config, &test_key())
    }

    #[test]
    fn test_duplicate_key_keeps_first_value() {
        let mut config = AppConfig::default();
        let report = load("[wifi]\nssid=Foo\nssid=Bar\n", &mut config);

        assert_eq!(config.wifi.ssid.as_str(), "Foo");
        assert_eq!(report.warning_total, 1);
        assert_eq!(report.warnings[0].kind, WarningKind::UnrecognizedKey);
        assert_eq!(report.warnings[0].name.as_str(), "ssid");
    }

    #[test]
    fn test_unknown_section_keys_have_no_side_effects() {
        let mut config = AppConfig::default();
        let before = config.clone();
        let report = load("[unknown]\nfoo=bar\n", &mut config);

        assert_eq!(config, before);
        assert_eq!(report.applied, 0);
        assert_eq!(report.warning_total, 2);
        assert_eq!(report.warnings[0].kind, WarningKind::UnknownSection);
        assert_eq!(report.warnings[1].kind, WarningKind::UnrecognizedKey);
        assert_eq!(report.warnings[1].name.as_str(), "foo");
    }

    #[test]
    fn test_root_section_params_before_any_header() {
        let mut config = AppConfig::default();
        let report = load(
            "savePictureOnSdCard=false\nawakeDurationMs=750\ndeepSleepDurationSec=300\n",
            &mut config,
        );

        assert!(report.is_clean());
        assert_eq!(report.applied, 3);
        assert!(!config.save_picture_on_sd);
        assert_eq!(config.awake_duration_ms, 750);
        assert_eq!(config.deep_sleep_duration_sec, 300);
    }

    #[test]
    fn test_full_file_with_comments_and_blank_lines() {
        let mut config = AppConfig::default();
        let text = "\
# Camera site A
savePictureOnSdCard=true

[wifi]
enabled=true
ssid=FieldNet
password=opensesame
connectAttemptMax=10

; upload goes to the shared server
[upload]
enabled=true
serverAddress=pictures.example.org
serverPort=8080
path=/upload.php
auth=token123
bunchSize=4

[sensor]
brightness=2
vflip=1
";
        let report = load(text, &mut config);

        assert!(report.is_clean(), "warnings: {:?}", report.warnings);
        assert!(config.wifi.enabled);
        assert_eq!(config.wifi.ssid.as_str(), "FieldNet");
        assert_eq!(config.wifi.password.as_str(), "opensesame");
        assert_eq!(config.wifi.connect_attempt_max, 10);
        assert!(config.upload.enabled);
        assert_eq!(config.upload.server_address.as_str(), "pictures.example.org");
        assert_eq!(config.upload.server_port, 8080);
        assert_eq!(config.upload.path.as_str(), "/upload.php");
        assert_eq!(config.upload.auth.as_str(), "token123");
        assert_eq!(config.upload.bunch_size, 4);
        assert_eq!(config.camera.sensor.get(SensorParam::Brightness).value, 2);
        assert_eq!(config.camera.sensor.get(SensorParam::Vflip).value, 1);
    }

    #[test]
    fn test_encrypted_password_is_decoded() {
        let mut config = AppConfig::default();
        // "VGVzdA==" decodes to "Ugpp" under the test key
        let report = load("[wifi]\npasswordEnc=VGVzdA==\n", &mut config);

        assert!(report.is_clean());
        assert_eq!(config.wifi.password.as_str(), "Ugpp");
    }

    #[test]
    fn test_bad_ciphertext_keeps_destination_unchanged() {
        let mut config = AppConfig::default();
        let report = load("[upload]\nauthEnc=!!!not-base64!!!\n", &mut config);

        assert!(config.upload.auth.is_empty());
        assert_eq!(report.warning_total, 1);
        assert_eq!(report.warnings[0].kind, WarningKind::BadValue);
    }

    #[test]
    fn test_bad_integer_keeps_destination_unchanged() {
        let mut config = AppConfig::default();
        let report = load("awakeDurationMs=soon\n", &mut config);

        assert_eq!(config.awake_duration_ms, 2000);
        assert_eq!(report.warnings[0].kind, WarningKind::BadValue);
        // The key counts as seen: a later duplicate is a duplicate
        let report2 = load("awakeDurationMs=soon\nawakeDurationMs=100\n", &mut AppConfig::default());
        assert_eq!(report2.warnings[1].kind, WarningKind::UnrecognizedKey);
    }

    #[test]
    fn test_tolerant_long_kind_ignores_malformed_value() {
        let mut config = AppConfig::default();
        let report = load("[time]\ngmtOffsetSec=tomorrow\n", &mut config);

        // No warning, destination unchanged
        assert!(report.is_clean());
        assert_eq!(config.time.gmt_offset_sec, 0);

        load("[time]\ngmtOffsetSec=-7200\n", &mut config);
        assert_eq!(config.time.gmt_offset_sec, -7200);
    }

    #[test]
    fn test_overlong_value_is_truncated_with_warning() {
        let mut config = AppConfig::default();
        let long_ssid = "s".repeat(40);
        let mut text = std::string::String::from("[wifi]\nssid=");
        text.push_str(&long_ssid);
        text.push('\n');
        let report = load(&text, &mut config);

        assert_eq!(config.wifi.ssid.len(), 32);
        assert_eq!(report.warnings[0].kind, WarningKind::Truncated);
        assert_eq!(report.applied, 1);
    }

    #[test]
    fn test_malformed_line_is_reported() {
        let mut config = AppConfig::default();
        let report = load("this is not a setting\n", &mut config);
        assert_eq!(report.warnings[0].kind, WarningKind::MalformedLine);
    }

    #[test]
    fn test_switching_back_to_known_section_resumes_matching() {
        let mut config = AppConfig::default();
        let report = load(
            "[bogus]\nenabled=true\n[wifi]\nenabled=true\n",
            &mut config,
        );

        assert!(config.wifi.enabled);
        // One for the section, one for the key under it
        assert_eq!(report.warning_total, 2);
    }

    #[test]
    fn test_boolean_lexicon() {
        for (value, expected) in [
            ("true", true),
            ("TRUE", true),
            ("1", true),
            ("yes", true),
            ("on", true),
            ("false", false),
            ("0", false),
            ("no", false),
            ("off", false),
        ] {
            let mut config = AppConfig::default();
            let mut text = std::string::String::from("[wifi]\nenabled=");
            text.push_str(value);
            let report = load(&text, &mut config);
            assert!(report.is_clean());
            assert_eq!(config.wifi.enabled, expected, "value {:?}", value);
        }

        let mut config = AppConfig::default();
        let report = load("[wifi]\nenabled=maybe\n", &mut config);
        assert_eq!(report.warnings[0].kind, WarningKind::BadValue);
        assert!(!config.wifi.enabled);
    }

    #[test]
    fn test_load_config_reads_from_storage() {
        let mut storage = MockStorage::new();
        storage.insert(CONFIG_FILE, b"[wifi]\nenabled=true\nssid=Foo\n");

        let mut config = AppConfig::default();
        let report =
            load_config(&mut storage, CONFIG_FILE, &mut config, &test_key()).unwrap();

        assert!(report.is_clean());
        assert_eq!(config.wifi.ssid.as_str(), "Foo");
    }

    #[test]
    fn test_load_config_missing_file_is_hard_error() {
        let mut storage = MockStorage::new();
        let mut config = AppConfig::default();
        let result = load_config(&mut storage, CONFIG_FILE, &mut config, &test_key());
        assert_eq!(result, Err(ConfigError::Storage(StorageError::NotFound)));
    }

    #[test]
    fn test_load_config_rejects_non_utf8_file() {
        let mut storage = MockStorage::new();
        storage.insert(CONFIG_FILE, &[0xff, 0xfe, 0x00, 0x01]);

        let mut config = AppConfig::default();
        let result = load_config(&mut storage, CONFIG_FILE, &mut config, &test_key());
        assert_eq!(result, Err(ConfigError::Malformed));
    }

    #[test]
    fn test_warning_overflow_keeps_counting() {
        let mut config = AppConfig::default();
        let mut text = std::string::String::new();
        for i in 0..20 {
            text.push_str(&std::format!("bogusKey{}=x\n", i));
        }
        let report = load(&text, &mut config);

        assert_eq!(report.warning_total, 20);
        assert_eq!(report.warnings.len(), MAX_WARNINGS);
    }
}
