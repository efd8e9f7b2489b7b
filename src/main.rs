//! VIA Keyboard CLI
//!
//! A command-line interface for configuring VIA-compatible keyboards.

use clap::Parser;
use hidapi::HidApi;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers (split from main.rs)
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that do not talk to a keyboard.
    if let Some(Commands::List) = cli.command {
        let api = HidApi::new()?;
        return commands::query::list(&api);
    }

    let keyboard = commands::open_keyboard(&cli)?;

    match cli.command {
        None | Some(Commands::Info) => {
            commands::query::info(&keyboard).await?;
        }
        Some(Commands::List) => unreachable!("handled above"),

        // === Query Commands ===
        Some(Commands::GetKey { layer, row, col }) => {
            commands::query::get_key(&keyboard, layer, row, col).await?;
        }
        Some(Commands::Keymap { layer, json }) => {
            commands::query::keymap(&keyboard, layer, json).await?;
        }
        Some(Commands::Matrix { watch, json }) => {
            commands::query::matrix(&keyboard, watch, json).await?;
        }

        // === Keymap Commands ===
        Some(Commands::SetKey {
            layer,
            row,
            col,
            keycode,
        }) => {
            commands::keymap::set_key(&keyboard, layer, row, col, &keycode).await?;
        }
        Some(Commands::ResetKeymap) => {
            commands::keymap::reset_keymap(&keyboard).await?;
        }

        // === Hall-Effect Commands ===
        Some(Commands::He { json }) => {
            commands::hall_effect::show(&keyboard, json).await?;
        }
        Some(Commands::SetHe {
            mode,
            actuation,
            release,
            deadzone,
            engage,
            disengage,
            kc_ad,
            kc_zx,
            save,
        }) => {
            commands::hall_effect::set(
                &keyboard, mode, actuation, release, deadzone, engage, disengage, kc_ad, kc_zx,
                save,
            )
            .await?;
        }
        Some(Commands::ToggleMode) => {
            commands::hall_effect::toggle_mode(&keyboard).await?;
        }
        Some(Commands::Calibrate { action }) => {
            commands::hall_effect::calibrate(&keyboard, action).await?;
        }

        // === RGB Commands ===
        Some(Commands::Rgb { json }) => {
            commands::lighting::show(&keyboard, json).await?;
        }
        Some(Commands::SetRgb {
            effect,
            brightness,
            speed,
            hue,
            sat,
            save,
        }) => {
            commands::lighting::set(
                &keyboard,
                effect.as_deref(),
                brightness,
                speed,
                hue,
                sat,
                save,
            )
            .await?;
        }
        Some(Commands::RgbPreset { preset }) => {
            commands::lighting::preset(&keyboard, preset).await?;
        }

        // === Persistence / Maintenance ===
        Some(Commands::Save { channel }) => {
            commands::utility::save(&keyboard, channel).await?;
        }
        Some(Commands::ResetEeprom) => {
            commands::utility::reset_eeprom(&keyboard).await?;
        }
        Some(Commands::Bootloader) => {
            commands::utility::bootloader(&keyboard).await?;
        }
    }

    keyboard.close().await.ok();
    Ok(())
}
