//! Query (read-only) command handlers.

use std::time::Duration;

use hidapi::HidApi;
use via_keyboard::{keycodes, Keyboard, MatrixState};
use via_transport::protocol::{usage, VIA_PROTOCOL_VERSION};

use super::{print_json, CommandResult};

/// Show device identity and protocol version.
pub async fn info(keyboard: &Keyboard) -> CommandResult {
    let info = keyboard.session().device_info();
    println!(
        "Device:   VID={:04X} PID={:04X} {}",
        info.vid,
        info.pid,
        info.product_name.as_deref().unwrap_or("(unnamed)")
    );

    let version = keyboard.protocol_version().await?;
    let layers = keyboard.layer_count().await?;
    println!("Protocol: 0x{version:04X} (client targets 0x{VIA_PROTOCOL_VERSION:04X})");
    println!("Layers:   {layers}");
    println!(
        "Matrix:   {}x{} (from --rows/--cols)",
        keyboard.dims().rows,
        keyboard.dims().cols
    );
    Ok(())
}

/// List HID interfaces exposing the VIA usage page.
pub fn list(api: &HidApi) -> CommandResult {
    let mut found = false;
    for info in api.device_list() {
        if info.usage_page() != usage::USAGE_PAGE || info.usage() != usage::USAGE {
            continue;
        }
        found = true;
        println!(
            "VID={:04x} PID={:04x} {}  {}",
            info.vendor_id(),
            info.product_id(),
            info.product_string().unwrap_or("(unnamed)"),
            info.path().to_string_lossy(),
        );
    }
    if !found {
        println!("No VIA raw-HID interfaces found");
    }
    Ok(())
}

/// Read one keycode.
pub async fn get_key(keyboard: &Keyboard, layer: u8, row: u8, col: u8) -> CommandResult {
    let code = keyboard.keycode(layer, row, col).await?;
    println!(
        "layer {layer} ({row},{col}): 0x{code:04X}  {}",
        keycodes::name(code)
            .map(str::to_owned)
            .unwrap_or_else(|| keycodes::label(code))
    );
    Ok(())
}

/// Dump one layer or all layers.
pub async fn keymap(keyboard: &Keyboard, layer: Option<u8>, json: bool) -> CommandResult {
    let layers: Vec<u8> = match layer {
        Some(layer) => vec![layer],
        None => (0..keyboard.layer_count().await?).collect(),
    };

    let mut dump = Vec::new();
    for layer in layers {
        let codes = keyboard.read_layer(layer).await?;
        dump.push((layer, codes));
    }

    if json {
        let value: Vec<_> = dump
            .iter()
            .map(|(layer, codes)| {
                serde_json::json!({
                    "layer": layer,
                    "keycodes": codes,
                })
            })
            .collect();
        return print_json(&value);
    }

    let cols = keyboard.dims().cols as usize;
    for (layer, codes) in dump {
        println!("Layer {layer}:");
        for row in codes.chunks(cols) {
            let cells: Vec<String> = row
                .iter()
                .map(|&code| format!("{:>8}", keycodes::label(code)))
                .collect();
            println!("  {}", cells.join(" "));
        }
    }
    Ok(())
}

/// One-shot or polled switch matrix display.
pub async fn matrix(keyboard: &Keyboard, watch: Option<Option<u64>>, json: bool) -> CommandResult {
    match watch {
        None => {
            let state = keyboard.matrix_state().await?;
            print_matrix(&state, json)
        }
        Some(interval_ms) => {
            let interval = Duration::from_millis(interval_ms.unwrap_or(50));
            let mut last = MatrixState::default();
            loop {
                let state = keyboard.matrix_state().await?;
                if state != last {
                    print_matrix(&state, json)?;
                    last = state;
                }
                tokio::time::sleep(interval).await;
            }
        }
    }
}

fn print_matrix(state: &MatrixState, json: bool) -> CommandResult {
    if json {
        return print_json(state);
    }
    if state.is_empty() {
        println!("(no keys pressed)");
    } else {
        let cells: Vec<String> = state
            .pressed
            .iter()
            .map(|(row, col)| format!("({row},{col})"))
            .collect();
        println!("{}", cells.join(" "));
    }
    Ok(())
}
