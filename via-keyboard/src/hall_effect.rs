//! Hall-Effect (analog switch) configuration types.
//!
//! Channel 0 of the custom-value sub-protocol. Each field is one byte
//! on the wire with a documented valid range narrower than the full
//! byte; setters clamp out-of-range input to the range bounds rather
//! than rejecting it, matching firmware-observed host behavior.

use serde::Serialize;

/// Documented inclusive ranges for the numeric fields.
pub mod range {
    pub const ACTUATION_MIN: u8 = 10;
    pub const ACTUATION_MAX: u8 = 90;
    pub const RELEASE_MIN: u8 = 10;
    pub const RELEASE_MAX: u8 = 90;
    pub const DEADZONE_MIN: u8 = 0;
    pub const DEADZONE_MAX: u8 = 40;
    pub const RT_DISTANCE_MIN: u8 = 2;
    pub const RT_DISTANCE_MAX: u8 = 50;
}

/// Clamp a caller-supplied value into an inclusive byte range.
pub(crate) fn clamp(value: i16, min: u8, max: u8) -> u8 {
    value.clamp(min as i16, max as i16) as u8
}

/// Global actuation mode (field 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ActuationMode {
    /// Fixed actuation/release thresholds
    #[default]
    Normal,
    /// Dynamic boundaries tracking travel direction reversals
    RapidTrigger,
    /// SOCD cleaning (A+D / Z+X cancellation)
    KeyCancel,
}

impl ActuationMode {
    /// Parse from protocol value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::RapidTrigger),
            2 => Some(Self::KeyCancel),
            _ => None,
        }
    }

    /// Convert to protocol value
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::RapidTrigger => 1,
            Self::KeyCancel => 2,
        }
    }

    /// The next mode in the Normal → RapidTrigger → KeyCancel cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::RapidTrigger,
            Self::RapidTrigger => Self::KeyCancel,
            Self::KeyCancel => Self::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::RapidTrigger => "Rapid Trigger",
            Self::KeyCancel => "Key Cancel",
        }
    }
}

/// Rapid-trigger tuning (fields 7-9)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RapidTrigger {
    /// Top-of-travel deadzone before tracking starts
    pub deadzone: u8,
    /// Downward travel that re-engages the key
    pub engage_distance: u8,
    /// Upward travel that releases the key
    pub disengage_distance: u8,
}

/// Key-cancel (SOCD) pair enables (fields 10-11)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyCancel {
    /// A+D pair cancellation
    pub ad: bool,
    /// Z+X pair cancellation
    pub zx: bool,
}

/// Full Hall-Effect configuration read-model.
///
/// Assembled from one request per field, so a snapshot is not atomic:
/// device state changing mid-read yields an internally inconsistent
/// result. Callers needing certainty re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeConfig {
    pub actuation_mode: ActuationMode,
    pub actuation_threshold: u8,
    pub release_threshold: u8,
    pub rapid_trigger: RapidTrigger,
    pub key_cancel: KeyCancel,
}

/// Partial-update request: only present fields are written.
///
/// Numeric fields are `i16` so out-of-range caller input has somewhere
/// to live before clamping.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeConfigUpdate {
    pub actuation_mode: Option<ActuationMode>,
    pub actuation_threshold: Option<i16>,
    pub release_threshold: Option<i16>,
    pub deadzone: Option<i16>,
    pub engage_distance: Option<i16>,
    pub disengage_distance: Option<i16>,
    pub key_cancel_ad: Option<bool>,
    pub key_cancel_zx: Option<bool>,
}

impl From<HeConfig> for HeConfigUpdate {
    fn from(config: HeConfig) -> Self {
        Self {
            actuation_mode: Some(config.actuation_mode),
            actuation_threshold: Some(config.actuation_threshold as i16),
            release_threshold: Some(config.release_threshold as i16),
            deadzone: Some(config.rapid_trigger.deadzone as i16),
            engage_distance: Some(config.rapid_trigger.engage_distance as i16),
            disengage_distance: Some(config.rapid_trigger.disengage_distance as i16),
            key_cancel_ad: Some(config.key_cancel.ad),
            key_cancel_zx: Some(config.key_cancel.zx),
        }
    }
}
