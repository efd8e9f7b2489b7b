//! Command handlers for the CLI application.
//!
//! Handlers are grouped by category:
//! - `query`: read-only commands (info, list, get-key, keymap, matrix)
//! - `keymap`: keymap mutation (set-key, reset-keymap)
//! - `hall_effect`: Hall-Effect commands (he, set-he, toggle-mode, calibrate)
//! - `lighting`: RGB commands (rgb, set-rgb, rgb-preset)
//! - `utility`: persistence and maintenance (save, reset-eeprom, bootloader)

pub mod hall_effect;
pub mod keymap;
pub mod lighting;
pub mod query;
pub mod utility;

use anyhow::{bail, Context};
use hidapi::{DeviceInfo, HidApi};
use serde::Serialize;
use tracing::debug;
use via_keyboard::{Keyboard, MatrixDims};
use via_transport::protocol::usage;
use via_transport::{HidTransport, TransportDeviceInfo, ViaSession};

use crate::cli::Cli;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Whether a HID interface looks like a VIA command endpoint.
fn is_via_interface(info: &DeviceInfo, vid: Option<u16>, pid: Option<u16>) -> bool {
    info.usage_page() == usage::USAGE_PAGE
        && info.usage() == usage::USAGE
        && vid.map_or(true, |v| info.vendor_id() == v)
        && pid.map_or(true, |p| info.product_id() == p)
}

/// Open the first matching VIA endpoint and wrap it in a [`Keyboard`].
///
/// The interface is opened twice: one handle carries outbound reports,
/// the other is parked on the transport's reader thread.
pub fn open_keyboard(cli: &Cli) -> anyhow::Result<Keyboard> {
    let api = HidApi::new().context("Failed to initialize HID API")?;

    let candidate = api
        .device_list()
        .find(|info| is_via_interface(info, cli.vid, cli.pid))
        .map(|info| (info.path().to_owned(), info.clone()));
    let Some((path, info)) = candidate else {
        bail!(
            "No VIA raw-HID interface found (usage page 0x{:04X}, usage 0x{:02X}); \
             try --vid/--pid, and check device permissions",
            usage::USAGE_PAGE,
            usage::USAGE
        );
    };

    debug!(
        "opening VIA endpoint VID={:04X} PID={:04X}",
        info.vendor_id(),
        info.product_id()
    );
    let writer = api.open_path(&path).context("Failed to open device")?;
    let reader = api
        .open_path(&path)
        .context("Failed to open device reader handle")?;

    let transport = HidTransport::new(
        writer,
        reader,
        TransportDeviceInfo {
            vid: info.vendor_id(),
            pid: info.product_id(),
            device_path: path.to_string_lossy().into_owned(),
            product_name: info.product_string().map(str::to_owned),
        },
    );
    let session = ViaSession::open_default(transport);
    let dims = MatrixDims::new(cli.rows, cli.cols);
    Ok(Keyboard::new(session, dims))
}

/// Print a serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
