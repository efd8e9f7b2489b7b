//! RGB lighting command handlers.

use anyhow::bail;
use via_keyboard::{HsColor, Keyboard, RgbEffect};

use crate::cli::PresetArg;

use super::{print_json, CommandResult};

/// Show the lighting configuration.
pub async fn show(keyboard: &Keyboard, json: bool) -> CommandResult {
    let config = keyboard.rgb_config().await?;
    if json {
        return print_json(&config);
    }
    println!("RGB:");
    println!("  Effect:     {}", config.effect);
    println!("  Brightness: {}", config.brightness);
    println!("  Speed:      {}", config.effect_speed);
    println!(
        "  Color 1:    hue {} sat {}",
        config.color1.hue, config.color1.sat
    );
    println!(
        "  Color 2:    hue {} sat {}",
        config.color2.hue, config.color2.sat
    );
    Ok(())
}

/// Write the requested lighting fields. The set commands are
/// fire-and-forget; `--save` issues the awaited commit.
pub async fn set(
    keyboard: &Keyboard,
    effect: Option<&str>,
    brightness: Option<u8>,
    speed: Option<u8>,
    hue: Option<u8>,
    sat: Option<u8>,
    save: bool,
) -> CommandResult {
    if let Some(name) = effect {
        let effect = match name.parse::<u8>() {
            Ok(index) => RgbEffect::from_u8(index),
            Err(_) => match RgbEffect::from_label(name) {
                Some(effect) => effect,
                None => bail!("Unknown effect {name:?}"),
            },
        };
        keyboard.set_rgb_effect(effect).await?;
    }
    if let Some(brightness) = brightness {
        keyboard.set_rgb_brightness(brightness).await?;
    }
    if let Some(speed) = speed {
        keyboard.set_rgb_effect_speed(speed).await?;
    }
    if hue.is_some() || sat.is_some() {
        // Partial color input keeps the other component from the device.
        let current = keyboard.rgb_config().await?.color1;
        let color = HsColor::new(
            hue.unwrap_or(current.hue),
            sat.unwrap_or(current.sat),
        );
        keyboard.set_rgb_color1(color).await?;
    }
    if save {
        keyboard.save_rgb_config().await?;
        println!("Lighting updated and saved");
    } else {
        println!("Lighting updated (volatile; use 'save rgb' to persist)");
    }
    Ok(())
}

/// Apply one of the quick presets.
pub async fn preset(keyboard: &Keyboard, preset: PresetArg) -> CommandResult {
    match preset {
        PresetArg::Off => keyboard.rgb_off().await?,
        PresetArg::White => keyboard.rgb_solid(HsColor::WHITE, 255).await?,
        PresetArg::Red => keyboard.rgb_solid(HsColor::RED, 255).await?,
        PresetArg::Green => keyboard.rgb_solid(HsColor::GREEN, 255).await?,
        PresetArg::Blue => keyboard.rgb_solid(HsColor::BLUE, 255).await?,
        PresetArg::Rainbow => keyboard.rgb_rainbow().await?,
    }
    println!("Preset applied (volatile; use 'save rgb' to persist)");
    Ok(())
}
