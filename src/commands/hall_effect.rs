//! Hall-Effect command handlers.

use via_keyboard::{HeConfigUpdate, Keyboard};

use crate::cli::{CalibrateAction, ModeArg};

use super::{print_json, CommandResult};

/// Show the full Hall-Effect configuration.
pub async fn show(keyboard: &Keyboard, json: bool) -> CommandResult {
    let config = keyboard.he_config().await?;
    if json {
        return print_json(&config);
    }
    println!("Hall-Effect:");
    println!("  Mode:       {}", config.actuation_mode.label());
    println!("  Actuation:  {}", config.actuation_threshold);
    println!("  Release:    {}", config.release_threshold);
    println!("  Rapid trigger:");
    println!("    Deadzone:    {}", config.rapid_trigger.deadzone);
    println!("    Engage:      {}", config.rapid_trigger.engage_distance);
    println!("    Disengage:   {}", config.rapid_trigger.disengage_distance);
    println!("  Key cancel:");
    println!("    A+D:         {}", config.key_cancel.ad);
    println!("    Z+X:         {}", config.key_cancel.zx);
    Ok(())
}

/// Write the requested fields, optionally committing afterwards.
#[allow(clippy::too_many_arguments)]
pub async fn set(
    keyboard: &Keyboard,
    mode: Option<ModeArg>,
    actuation: Option<i16>,
    release: Option<i16>,
    deadzone: Option<i16>,
    engage: Option<i16>,
    disengage: Option<i16>,
    kc_ad: Option<bool>,
    kc_zx: Option<bool>,
    save: bool,
) -> CommandResult {
    let update = HeConfigUpdate {
        actuation_mode: mode.map(Into::into),
        actuation_threshold: actuation,
        release_threshold: release,
        deadzone,
        engage_distance: engage,
        disengage_distance: disengage,
        key_cancel_ad: kc_ad,
        key_cancel_zx: kc_zx,
    };
    keyboard.set_he_config(&update).await?;
    if save {
        keyboard.save_he_config().await?;
        println!("Hall-Effect settings updated and saved");
    } else {
        println!("Hall-Effect settings updated (volatile; use 'save he' to persist)");
    }
    Ok(())
}

/// Cycle the actuation mode.
pub async fn toggle_mode(keyboard: &Keyboard) -> CommandResult {
    let mode = keyboard.toggle_actuation_mode().await?;
    println!("Actuation mode: {}", mode.label());
    Ok(())
}

/// Start or persist sensor calibration.
pub async fn calibrate(keyboard: &Keyboard, action: CalibrateAction) -> CommandResult {
    match action {
        CalibrateAction::Start => {
            keyboard.start_calibration().await?;
            println!("Calibration started: press every key to full travel,");
            println!("then run 'viactl calibrate save'");
        }
        CalibrateAction::Save => {
            keyboard.save_calibration().await?;
            println!("Calibration saved");
        }
    }
    Ok(())
}
