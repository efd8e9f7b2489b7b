// CLI definitions using clap

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "viactl")]
#[command(author, version, about = "VIA keyboard configuration tool")]
#[command(propagate_version = true)]
pub struct Cli {
    /// USB vendor id of the keyboard (hex, e.g. 0x3434)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub vid: Option<u16>,

    /// USB product id of the keyboard (hex)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub pid: Option<u16>,

    /// Scan matrix rows (the protocol cannot query this)
    #[arg(long, global = true, default_value_t = 6)]
    pub rows: u8,

    /// Scan matrix columns
    #[arg(long, global = true, default_value_t = 16)]
    pub cols: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Query Commands ===
    /// Show device and protocol information
    #[command(visible_aliases = ["version", "v"])]
    Info,

    /// List raw-HID interfaces that look like VIA endpoints
    #[command(visible_alias = "ls")]
    List,

    /// Read the keycode at one matrix position
    #[command(visible_alias = "gk")]
    GetKey {
        layer: u8,
        row: u8,
        col: u8,
    },

    /// Dump a full keymap layer
    #[command(visible_alias = "km")]
    Keymap {
        /// Layer to dump (default: all layers)
        layer: Option<u8>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show pressed keys from the live switch matrix
    #[command(visible_alias = "m")]
    Matrix {
        /// Poll continuously (interval in milliseconds, default: 50)
        #[arg(short, long)]
        watch: Option<Option<u64>>,
        #[arg(long)]
        json: bool,
    },

    // === Keymap Commands ===
    /// Assign a keycode to a matrix position
    #[command(visible_alias = "sk")]
    SetKey {
        layer: u8,
        row: u8,
        col: u8,
        /// Keycode as a QMK name (KC_ESCAPE), key (a, F5, MO(1)) or hex (0x5221)
        keycode: String,
    },

    /// Restore the default keymap
    ResetKeymap,

    // === Hall-Effect Commands ===
    /// Show the Hall-Effect configuration
    He {
        #[arg(long)]
        json: bool,
    },

    /// Update Hall-Effect settings (only the given fields are written)
    #[command(visible_alias = "she")]
    SetHe {
        /// Actuation mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Actuation threshold (10-90)
        #[arg(long)]
        actuation: Option<i16>,
        /// Release threshold (10-90)
        #[arg(long)]
        release: Option<i16>,
        /// Rapid-trigger deadzone (0-40)
        #[arg(long)]
        deadzone: Option<i16>,
        /// Rapid-trigger engage distance (2-50)
        #[arg(long)]
        engage: Option<i16>,
        /// Rapid-trigger disengage distance (2-50)
        #[arg(long)]
        disengage: Option<i16>,
        /// Enable/disable A+D key cancellation
        #[arg(long)]
        kc_ad: Option<bool>,
        /// Enable/disable Z+X key cancellation
        #[arg(long)]
        kc_zx: Option<bool>,
        /// Commit to the persistent store afterwards
        #[arg(long)]
        save: bool,
    },

    /// Cycle the actuation mode (Normal -> Rapid Trigger -> Key Cancel)
    #[command(visible_alias = "tm")]
    ToggleMode,

    /// Hall-Effect sensor calibration
    Calibrate {
        #[command(subcommand)]
        action: CalibrateAction,
    },

    // === RGB Commands ===
    /// Show the RGB lighting configuration
    Rgb {
        #[arg(long)]
        json: bool,
    },

    /// Update RGB lighting (only the given fields are written)
    #[command(visible_alias = "sr")]
    SetRgb {
        /// Effect name (e.g. "Cycle All") or index
        #[arg(long)]
        effect: Option<String>,
        /// Brightness (0-255)
        #[arg(long)]
        brightness: Option<u8>,
        /// Effect speed (0-255)
        #[arg(long)]
        speed: Option<u8>,
        /// Color 1 hue (0-255)
        #[arg(long)]
        hue: Option<u8>,
        /// Color 1 saturation (0-255)
        #[arg(long)]
        sat: Option<u8>,
        /// Commit to the persistent store afterwards
        #[arg(long)]
        save: bool,
    },

    /// Apply a lighting preset
    #[command(visible_alias = "preset")]
    RgbPreset {
        #[arg(value_enum)]
        preset: PresetArg,
    },

    // === Persistence / Maintenance ===
    /// Commit volatile settings to the persistent store
    Save {
        /// Which channel to commit
        #[arg(value_enum, default_value_t = SaveArg::All)]
        channel: SaveArg,
    },

    /// Reset the persistent store to firmware defaults
    ResetEeprom,

    /// Reboot the keyboard into its bootloader
    #[command(visible_alias = "boot")]
    Bootloader,
}

#[derive(Subcommand)]
pub enum CalibrateAction {
    /// Begin calibration; press every key to full travel afterwards
    Start,
    /// Persist the gathered calibration data
    Save,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Normal,
    RapidTrigger,
    KeyCancel,
}

impl From<ModeArg> for via_keyboard::ActuationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Normal => Self::Normal,
            ModeArg::RapidTrigger => Self::RapidTrigger,
            ModeArg::KeyCancel => Self::KeyCancel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Off,
    White,
    Red,
    Green,
    Blue,
    Rainbow,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveArg {
    He,
    Rgb,
    All,
}

fn parse_hex_u16(input: &str) -> Result<u16, String> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex id {input:?}: {e}"))
}
