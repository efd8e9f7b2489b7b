//! Keymap mutation handlers.

use anyhow::bail;
use via_keyboard::{keycodes, Keyboard};

use super::CommandResult;

/// Assign a keycode to a matrix position.
pub async fn set_key(
    keyboard: &Keyboard,
    layer: u8,
    row: u8,
    col: u8,
    keycode: &str,
) -> CommandResult {
    let Some(code) = keycodes::parse(keycode) else {
        bail!("Unrecognized keycode {keycode:?} (try a QMK name, a key, or 0x-hex)");
    };
    keyboard.set_keycode(layer, row, col, code).await?;
    println!(
        "layer {layer} ({row},{col}) = 0x{code:04X}  {}",
        keycodes::label(code)
    );
    Ok(())
}

/// Restore the default keymap.
pub async fn reset_keymap(keyboard: &Keyboard) -> CommandResult {
    keyboard.reset_keymap().await?;
    println!("Keymap reset to firmware default");
    Ok(())
}
