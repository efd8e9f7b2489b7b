//! RGB matrix lighting types.
//!
//! Channel 2 of the custom-value sub-protocol: brightness, effect,
//! effect speed, and two hue/saturation color slots.

use std::fmt;

use serde::Serialize;

/// QMK RGB matrix effect, by its index in the firmware effect table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RgbEffect {
    #[default]
    Off,
    SolidColor,
    Breathing,
    BandSpiral,
    CycleAll,
    CycleLeftRight,
    CycleUpDown,
    RainbowChevron,
    CycleOutIn,
    CycleOutInDual,
    CyclePinwheel,
    CycleSpiral,
    DualBeacon,
    RainbowBeacon,
    RainbowPinwheels,
    Raindrops,
    JellybeanRaindrops,
    HueBreathing,
    HuePendulum,
    HueWave,
    TypingHeatmap,
    DigitalRain,
    ReactiveSimple,
    Reactive,
    ReactiveWide,
    ReactiveMultiwide,
    ReactiveCross,
    ReactiveMulticross,
    ReactiveNexus,
    ReactiveMultinexus,
    Splash,
    Multisplash,
    SolidSplash,
    SolidMultisplash,
    /// Effect index this client has no name for (newer firmware)
    Unknown(u8),
}

impl RgbEffect {
    /// Parse from protocol value
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Off,
            1 => Self::SolidColor,
            2 => Self::Breathing,
            3 => Self::BandSpiral,
            4 => Self::CycleAll,
            5 => Self::CycleLeftRight,
            6 => Self::CycleUpDown,
            7 => Self::RainbowChevron,
            8 => Self::CycleOutIn,
            9 => Self::CycleOutInDual,
            10 => Self::CyclePinwheel,
            11 => Self::CycleSpiral,
            12 => Self::DualBeacon,
            13 => Self::RainbowBeacon,
            14 => Self::RainbowPinwheels,
            15 => Self::Raindrops,
            16 => Self::JellybeanRaindrops,
            17 => Self::HueBreathing,
            18 => Self::HuePendulum,
            19 => Self::HueWave,
            20 => Self::TypingHeatmap,
            21 => Self::DigitalRain,
            22 => Self::ReactiveSimple,
            23 => Self::Reactive,
            24 => Self::ReactiveWide,
            25 => Self::ReactiveMultiwide,
            26 => Self::ReactiveCross,
            27 => Self::ReactiveMulticross,
            28 => Self::ReactiveNexus,
            29 => Self::ReactiveMultinexus,
            30 => Self::Splash,
            31 => Self::Multisplash,
            32 => Self::SolidSplash,
            33 => Self::SolidMultisplash,
            v => Self::Unknown(v),
        }
    }

    /// Convert to protocol value
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::SolidColor => 1,
            Self::Breathing => 2,
            Self::BandSpiral => 3,
            Self::CycleAll => 4,
            Self::CycleLeftRight => 5,
            Self::CycleUpDown => 6,
            Self::RainbowChevron => 7,
            Self::CycleOutIn => 8,
            Self::CycleOutInDual => 9,
            Self::CyclePinwheel => 10,
            Self::CycleSpiral => 11,
            Self::DualBeacon => 12,
            Self::RainbowBeacon => 13,
            Self::RainbowPinwheels => 14,
            Self::Raindrops => 15,
            Self::JellybeanRaindrops => 16,
            Self::HueBreathing => 17,
            Self::HuePendulum => 18,
            Self::HueWave => 19,
            Self::TypingHeatmap => 20,
            Self::DigitalRain => 21,
            Self::ReactiveSimple => 22,
            Self::Reactive => 23,
            Self::ReactiveWide => 24,
            Self::ReactiveMultiwide => 25,
            Self::ReactiveCross => 26,
            Self::ReactiveMulticross => 27,
            Self::ReactiveNexus => 28,
            Self::ReactiveMultinexus => 29,
            Self::Splash => 30,
            Self::Multisplash => 31,
            Self::SolidSplash => 32,
            Self::SolidMultisplash => 33,
            Self::Unknown(v) => v,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SolidColor => "Solid Color",
            Self::Breathing => "Breathing",
            Self::BandSpiral => "Band Spiral",
            Self::CycleAll => "Cycle All",
            Self::CycleLeftRight => "Cycle Left Right",
            Self::CycleUpDown => "Cycle Up Down",
            Self::RainbowChevron => "Rainbow Chevron",
            Self::CycleOutIn => "Cycle Out In",
            Self::CycleOutInDual => "Cycle Out In Dual",
            Self::CyclePinwheel => "Cycle Pinwheel",
            Self::CycleSpiral => "Cycle Spiral",
            Self::DualBeacon => "Dual Beacon",
            Self::RainbowBeacon => "Rainbow Beacon",
            Self::RainbowPinwheels => "Rainbow Pinwheels",
            Self::Raindrops => "Raindrops",
            Self::JellybeanRaindrops => "Jellybean Raindrops",
            Self::HueBreathing => "Hue Breathing",
            Self::HuePendulum => "Hue Pendulum",
            Self::HueWave => "Hue Wave",
            Self::TypingHeatmap => "Typing Heatmap",
            Self::DigitalRain => "Digital Rain",
            Self::ReactiveSimple => "Reactive Simple",
            Self::Reactive => "Reactive",
            Self::ReactiveWide => "Reactive Wide",
            Self::ReactiveMultiwide => "Reactive Multiwide",
            Self::ReactiveCross => "Reactive Cross",
            Self::ReactiveMulticross => "Reactive Multicross",
            Self::ReactiveNexus => "Reactive Nexus",
            Self::ReactiveMultinexus => "Reactive Multinexus",
            Self::Splash => "Splash",
            Self::Multisplash => "Multisplash",
            Self::SolidSplash => "Solid Splash",
            Self::SolidMultisplash => "Solid Multisplash",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Look up an effect by its display label, case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        (0..=33u8)
            .map(Self::from_u8)
            .find(|effect| effect.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for RgbEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(v) => write!(f, "Unknown(0x{v:02X})"),
            _ => f.write_str(self.label()),
        }
    }
}

/// Hue + saturation color slot; value (brightness) is global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HsColor {
    pub hue: u8,
    pub sat: u8,
}

impl HsColor {
    pub const fn new(hue: u8, sat: u8) -> Self {
        Self { hue, sat }
    }

    pub const WHITE: Self = Self::new(0, 0);
    pub const RED: Self = Self::new(0, 255);
    pub const GREEN: Self = Self::new(85, 255);
    pub const BLUE: Self = Self::new(170, 255);
}

/// Full RGB lighting configuration read-model (non-atomic snapshot,
/// one request per field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbConfig {
    pub brightness: u8,
    pub effect: RgbEffect,
    pub effect_speed: u8,
    pub color1: HsColor,
    pub color2: HsColor,
}
