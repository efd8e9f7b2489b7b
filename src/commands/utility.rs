//! Persistence and maintenance handlers.

use via_keyboard::{Keyboard, KeyboardError};
use via_transport::ViaError;

use crate::cli::SaveArg;

use super::CommandResult;

/// Commit volatile settings to the persistent store.
pub async fn save(keyboard: &Keyboard, channel: SaveArg) -> CommandResult {
    if matches!(channel, SaveArg::He | SaveArg::All) {
        keyboard.save_he_config().await?;
        println!("Hall-Effect settings saved");
    }
    if matches!(channel, SaveArg::Rgb | SaveArg::All) {
        keyboard.save_rgb_config().await?;
        println!("Lighting settings saved");
    }
    Ok(())
}

/// Reset the persistent store to firmware defaults.
pub async fn reset_eeprom(keyboard: &Keyboard) -> CommandResult {
    keyboard.reset_eeprom().await?;
    println!("Persistent store reset; the keyboard may re-enumerate");
    Ok(())
}

/// Reboot into the bootloader.
pub async fn bootloader(keyboard: &Keyboard) -> CommandResult {
    match keyboard.jump_to_bootloader().await {
        Ok(()) => println!("Bootloader jump acknowledged; the keyboard will disconnect"),
        // The reboot races the acknowledgement; a missing response is
        // the usual outcome.
        Err(KeyboardError::Protocol(ViaError::Timeout(_))) => {
            println!("Bootloader jump issued (no acknowledgement before reboot)");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
