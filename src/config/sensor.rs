//! Camera sensor override table
//!
//! The camera module exposes a large fixed set of tuning parameters
//! (contrast, exposure control, white balance, ...). A config file usually
//! touches only a handful of them, and an untouched parameter must keep the
//! sensor's own default. This module stores that sparse intent: one slot per
//! known parameter, disabled until the configuration enables it.
//!
//! Slots are located by [`SensorParam`] identifier; the camera-init
//! collaborator resolves each identifier to the actual register write behind
//! [`SensorControl`].

use crate::platform::traits::SensorControl;
use crate::platform::CameraError;

/// Identifier of one camera sensor tuning parameter
///
/// The names double as the keys of the `[sensor]` configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorParam {
    Contrast,
    Brightness,
    Saturation,
    Sharpness,
    Denoise,
    Quality,
    Colorbar,
    Whitebal,
    GainCtrl,
    ExposureCtrl,
    Hmirror,
    Vflip,
    Aec2,
    AwbGain,
    AgcGain,
    AecValue,
    SpecialEffect,
    WbMode,
    AeLevel,
    Dcw,
    Bpc,
    Wpc,
    RawGma,
    Lenc,
    Gainceiling,
    Framesize,
    Pixformat,
}

impl SensorParam {
    /// Number of known tuning parameters
    pub const COUNT: usize = 27;

    /// All parameters in declaration order
    pub const ALL: [SensorParam; Self::COUNT] = [
        SensorParam::Contrast,
        SensorParam::Brightness,
        SensorParam::Saturation,
        SensorParam::Sharpness,
        SensorParam::Denoise,
        SensorParam::Quality,
        SensorParam::Colorbar,
        SensorParam::Whitebal,
        SensorParam::GainCtrl,
        SensorParam::ExposureCtrl,
        SensorParam::Hmirror,
        SensorParam::Vflip,
        SensorParam::Aec2,
        SensorParam::AwbGain,
        SensorParam::AgcGain,
        SensorParam::AecValue,
        SensorParam::SpecialEffect,
        SensorParam::WbMode,
        SensorParam::AeLevel,
        SensorParam::Dcw,
        SensorParam::Bpc,
        SensorParam::Wpc,
        SensorParam::RawGma,
        SensorParam::Lenc,
        SensorParam::Gainceiling,
        SensorParam::Framesize,
        SensorParam::Pixformat,
    ];

    /// Configuration file key for this parameter
    pub const fn key(self) -> &'static str {
        match self {
            SensorParam::Contrast => "contrast",
            SensorParam::Brightness => "brightness",
            SensorParam::Saturation => "saturation",
            SensorParam::Sharpness => "sharpness",
            SensorParam::Denoise => "denoise",
            SensorParam::Quality => "quality",
            SensorParam::Colorbar => "colorbar",
            SensorParam::Whitebal => "whitebal",
            SensorParam::GainCtrl => "gain_ctrl",
            SensorParam::ExposureCtrl => "exposure_ctrl",
            SensorParam::Hmirror => "hmirror",
            SensorParam::Vflip => "vflip",
            SensorParam::Aec2 => "aec2",
            SensorParam::AwbGain => "awb_gain",
            SensorParam::AgcGain => "agc_gain",
            SensorParam::AecValue => "aec_value",
            SensorParam::SpecialEffect => "special_effect",
            SensorParam::WbMode => "wb_mode",
            SensorParam::AeLevel => "ae_level",
            SensorParam::Dcw => "dcw",
            SensorParam::Bpc => "bpc",
            SensorParam::Wpc => "wpc",
            SensorParam::RawGma => "raw_gma",
            SensorParam::Lenc => "lenc",
            SensorParam::Gainceiling => "gainceiling",
            SensorParam::Framesize => "framesize",
            SensorParam::Pixformat => "pixformat",
        }
    }

    /// Slot index of this parameter
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One optional override of a sensor tuning parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorOverride {
    /// True once the configuration has set a value for this parameter
    pub enabled: bool,
    /// Value to apply when enabled
    pub value: i32,
}

impl SensorOverride {
    const DISABLED: SensorOverride = SensorOverride {
        enabled: false,
        value: 0,
    };
}

/// Sparse override table over the full sensor parameter set
///
/// Disabled slots are skipped by the consumer and never perturb the
/// hardware default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorOverrides {
    slots: [SensorOverride; SensorParam::COUNT],
}

impl SensorOverrides {
    /// Create a table with every slot disabled
    pub const fn new() -> Self {
        Self {
            slots: [SensorOverride::DISABLED; SensorParam::COUNT],
        }
    }

    /// Enable the slot for `param` with `value`
    pub fn set(&mut self, param: SensorParam, value: i32) {
        self.slots[param.index()] = SensorOverride {
            enabled: true,
            value,
        };
    }

    /// Slot state for `param`
    pub fn get(&self, param: SensorParam) -> SensorOverride {
        self.slots[param.index()]
    }

    /// Slots in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (SensorParam, SensorOverride)> + '_ {
        SensorParam::ALL.iter().map(|&p| (p, self.slots[p.index()]))
    }

    /// Number of enabled slots
    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }

    /// Apply every enabled override to the sensor, in declaration order
    ///
    /// # Errors
    ///
    /// Stops at the first value the sensor rejects.
    pub fn apply_to(&self, sensor: &mut dyn SensorControl) -> Result<(), CameraError> {
        for (param, slot) in self.iter() {
            if slot.enabled {
                sensor.apply(param, slot.value)?;
            }
        }
        Ok(())
    }
}

impl Default for SensorOverrides {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockSensor;

    #[test]
    fn test_all_params_have_distinct_keys() {
        for (i, a) in SensorParam::ALL.iter().enumerate() {
            for b in SensorParam::ALL.iter().skip(i + 1) {
                assert_ne!(a.key(), b.key());
            }
        }
        assert_eq!(SensorParam::ALL.len(), SensorParam::COUNT);
    }

    #[test]
    fn test_new_table_is_all_disabled() {
        let table = SensorOverrides::new();
        assert_eq!(table.enabled_count(), 0);
        for (_, slot) in table.iter() {
            assert!(!slot.enabled);
        }
    }

    #[test]
    fn test_set_enables_single_slot() {
        let mut table = SensorOverrides::new();
        table.set(SensorParam::Brightness, 2);

        assert_eq!(table.enabled_count(), 1);
        let slot = table.get(SensorParam::Brightness);
        assert!(slot.enabled);
        assert_eq!(slot.value, 2);
        assert!(!table.get(SensorParam::Contrast).enabled);
    }

    #[test]
    fn test_apply_to_skips_disabled_slots() {
        let mut table = SensorOverrides::new();
        table.set(SensorParam::Vflip, 1);
        table.set(SensorParam::Contrast, -1);

        let mut sensor = MockSensor::new();
        table.apply_to(&mut sensor).unwrap();

        // Declaration order: contrast comes before vflip
        assert_eq!(
            sensor.applied(),
            &[(SensorParam::Contrast, -1), (SensorParam::Vflip, 1)]
        );
    }

    #[test]
    fn test_apply_to_stops_on_rejection() {
        let mut table = SensorOverrides::new();
        table.set(SensorParam::Quality, 10);

        let mut sensor = MockSensor::new();
        sensor.reject_settings();
        assert_eq!(
            table.apply_to(&mut sensor),
            Err(CameraError::SettingRejected)
        );
    }
}
