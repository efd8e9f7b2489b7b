//! VIA protocol constants.

/// Protocol version this client targets (big-endian u16 in the
/// GET_PROTOCOL_VERSION response).
pub const VIA_PROTOCOL_VERSION: u16 = 0x000C;

/// VIA command ids (byte 0 of every frame)
pub mod cmd {
    pub const GET_PROTOCOL_VERSION: u8 = 0x01;
    pub const GET_KEYBOARD_VALUE: u8 = 0x02;
    pub const SET_KEYBOARD_VALUE: u8 = 0x03;
    pub const DYNAMIC_KEYMAP_GET_KEYCODE: u8 = 0x04;
    pub const DYNAMIC_KEYMAP_SET_KEYCODE: u8 = 0x05;
    pub const DYNAMIC_KEYMAP_RESET: u8 = 0x06;
    pub const CUSTOM_SET_VALUE: u8 = 0x07;
    pub const CUSTOM_GET_VALUE: u8 = 0x08;
    pub const CUSTOM_SAVE: u8 = 0x09;
    pub const EEPROM_RESET: u8 = 0x0A;
    pub const BOOTLOADER_JUMP: u8 = 0x0B;
    pub const DYNAMIC_KEYMAP_MACRO_GET_COUNT: u8 = 0x0C;
    pub const DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE: u8 = 0x0D;
    pub const DYNAMIC_KEYMAP_MACRO_GET_BUFFER: u8 = 0x0E;
    pub const DYNAMIC_KEYMAP_MACRO_SET_BUFFER: u8 = 0x0F;
    pub const DYNAMIC_KEYMAP_MACRO_RESET: u8 = 0x10;
    pub const DYNAMIC_KEYMAP_GET_LAYER_COUNT: u8 = 0x11;
    pub const DYNAMIC_KEYMAP_GET_BUFFER: u8 = 0x12;
    pub const DYNAMIC_KEYMAP_SET_BUFFER: u8 = 0x13;
    pub const DYNAMIC_KEYMAP_GET_ENCODER: u8 = 0x14;
    pub const DYNAMIC_KEYMAP_SET_ENCODER: u8 = 0x15;

    /// Get human-readable name for a command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            GET_PROTOCOL_VERSION => "GET_PROTOCOL_VERSION",
            GET_KEYBOARD_VALUE => "GET_KEYBOARD_VALUE",
            SET_KEYBOARD_VALUE => "SET_KEYBOARD_VALUE",
            DYNAMIC_KEYMAP_GET_KEYCODE => "DYNAMIC_KEYMAP_GET_KEYCODE",
            DYNAMIC_KEYMAP_SET_KEYCODE => "DYNAMIC_KEYMAP_SET_KEYCODE",
            DYNAMIC_KEYMAP_RESET => "DYNAMIC_KEYMAP_RESET",
            CUSTOM_SET_VALUE => "CUSTOM_SET_VALUE",
            CUSTOM_GET_VALUE => "CUSTOM_GET_VALUE",
            CUSTOM_SAVE => "CUSTOM_SAVE",
            EEPROM_RESET => "EEPROM_RESET",
            BOOTLOADER_JUMP => "BOOTLOADER_JUMP",
            DYNAMIC_KEYMAP_MACRO_GET_COUNT => "DYNAMIC_KEYMAP_MACRO_GET_COUNT",
            DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE => "DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE",
            DYNAMIC_KEYMAP_MACRO_GET_BUFFER => "DYNAMIC_KEYMAP_MACRO_GET_BUFFER",
            DYNAMIC_KEYMAP_MACRO_SET_BUFFER => "DYNAMIC_KEYMAP_MACRO_SET_BUFFER",
            DYNAMIC_KEYMAP_MACRO_RESET => "DYNAMIC_KEYMAP_MACRO_RESET",
            DYNAMIC_KEYMAP_GET_LAYER_COUNT => "DYNAMIC_KEYMAP_GET_LAYER_COUNT",
            DYNAMIC_KEYMAP_GET_BUFFER => "DYNAMIC_KEYMAP_GET_BUFFER",
            DYNAMIC_KEYMAP_SET_BUFFER => "DYNAMIC_KEYMAP_SET_BUFFER",
            DYNAMIC_KEYMAP_GET_ENCODER => "DYNAMIC_KEYMAP_GET_ENCODER",
            DYNAMIC_KEYMAP_SET_ENCODER => "DYNAMIC_KEYMAP_SET_ENCODER",
            _ => "UNKNOWN",
        }
    }
}

/// Value ids for GET_KEYBOARD_VALUE / SET_KEYBOARD_VALUE
pub mod keyboard_value {
    pub const UPTIME: u8 = 0x01;
    pub const LAYOUT_OPTIONS: u8 = 0x02;
    pub const SWITCH_MATRIX_STATE: u8 = 0x03;
    pub const FIRMWARE_VERSION: u8 = 0x04;
    pub const DEVICE_INDICATION: u8 = 0x05;
}

/// Custom-value channels (byte 1 of CUSTOM_GET/SET_VALUE payloads)
pub mod channel {
    /// Hall-Effect actuation sub-protocol
    pub const HALL_EFFECT: u8 = 0;
    /// RGB matrix lighting sub-protocol
    pub const RGB_MATRIX: u8 = 2;
}

/// Hall-Effect value ids (channel 0)
pub mod he {
    pub const ACTUATION_THRESHOLD: u8 = 1;
    pub const RELEASE_THRESHOLD: u8 = 2;
    pub const START_CALIBRATION: u8 = 4;
    pub const SAVE_CALIBRATION: u8 = 5;
    pub const ACTUATION_MODE: u8 = 6;
    pub const RAPID_TRIGGER_DEADZONE: u8 = 7;
    pub const RAPID_TRIGGER_ENGAGE: u8 = 8;
    pub const RAPID_TRIGGER_DISENGAGE: u8 = 9;
    pub const KEY_CANCEL_AD: u8 = 10;
    pub const KEY_CANCEL_ZX: u8 = 11;

    /// Get human-readable name for a Hall-Effect value id
    pub fn name(value_id: u8) -> &'static str {
        match value_id {
            ACTUATION_THRESHOLD => "ACTUATION_THRESHOLD",
            RELEASE_THRESHOLD => "RELEASE_THRESHOLD",
            START_CALIBRATION => "START_CALIBRATION",
            SAVE_CALIBRATION => "SAVE_CALIBRATION",
            ACTUATION_MODE => "ACTUATION_MODE",
            RAPID_TRIGGER_DEADZONE => "RAPID_TRIGGER_DEADZONE",
            RAPID_TRIGGER_ENGAGE => "RAPID_TRIGGER_ENGAGE",
            RAPID_TRIGGER_DISENGAGE => "RAPID_TRIGGER_DISENGAGE",
            KEY_CANCEL_AD => "KEY_CANCEL_AD",
            KEY_CANCEL_ZX => "KEY_CANCEL_ZX",
            _ => "UNKNOWN",
        }
    }
}

/// RGB matrix value ids (channel 2)
pub mod rgb {
    pub const BRIGHTNESS: u8 = 1;
    pub const EFFECT: u8 = 2;
    pub const EFFECT_SPEED: u8 = 3;
    pub const COLOR_1: u8 = 4;
    pub const COLOR_2: u8 = 5;

    /// Get human-readable name for an RGB value id
    pub fn name(value_id: u8) -> &'static str {
        match value_id {
            BRIGHTNESS => "BRIGHTNESS",
            EFFECT => "EFFECT",
            EFFECT_SPEED => "EFFECT_SPEED",
            COLOR_1 => "COLOR_1",
            COLOR_2 => "COLOR_2",
            _ => "UNKNOWN",
        }
    }
}

/// Request/response timing
pub mod timing {
    /// Default deadline for an awaited response (ms)
    pub const DEFAULT_TIMEOUT_MS: u64 = 500;
    /// Queue capacity for caller requests into the correlator
    pub const REQUEST_QUEUE_SIZE: usize = 16;
    /// Broadcast capacity for inbound frames
    pub const INBOUND_CHANNEL_CAPACITY: usize = 256;
}

/// Raw-HID usage identification for VIA endpoints
pub mod usage {
    /// Vendor-defined usage page exposed by VIA firmware
    pub const USAGE_PAGE: u16 = 0xFF60;
    /// Usage id of the VIA command collection
    pub const USAGE: u16 = 0x61;
}
