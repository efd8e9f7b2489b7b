//! High-level command library for VIA-compatible keyboards
//!
//! This crate turns protocol exchanges into typed operations on top of
//! a [`ViaSession`]: keymap get/set, live switch matrix reads,
//! Hall-Effect actuation settings, and RGB lighting.

pub mod error;
pub mod hall_effect;
pub mod keycodes;
pub mod lighting;
pub mod matrix;

pub use error::KeyboardError;
pub use hall_effect::{ActuationMode, HeConfig, HeConfigUpdate, KeyCancel, RapidTrigger};
pub use lighting::{HsColor, RgbConfig, RgbEffect};
pub use matrix::{MatrixDims, MatrixState};

use tracing::debug;
use via_transport::protocol::{channel, cmd, he, keyboard_value, rgb};
use via_transport::ViaSession;

use hall_effect::{clamp, range};

/// Largest chunk a keymap buffer request can carry: the 32-byte frame
/// minus command id, offset (2), and size byte.
pub const KEYMAP_CHUNK_SIZE: usize = 28;

/// Typed operations on one connected keyboard.
///
/// Composite operations (config snapshots, full-layer reads) issue
/// their sub-requests strictly sequentially, one request fully
/// resolved before the next goes out, because the firmware cannot
/// multiplex overlapping multi-step exchanges. The first failure
/// aborts the remainder; the device may then hold a partial update,
/// and callers re-read to recover.
pub struct Keyboard {
    session: ViaSession,
    dims: MatrixDims,
}

impl Keyboard {
    /// Wrap an open session.
    ///
    /// `dims` drives matrix bitmap decoding and layer sizing; the
    /// protocol has no way to query it.
    pub fn new(session: ViaSession, dims: MatrixDims) -> Self {
        Self { session, dims }
    }

    pub fn session(&self) -> &ViaSession {
        &self.session
    }

    pub fn dims(&self) -> MatrixDims {
        self.dims
    }

    pub async fn is_connected(&self) -> bool {
        self.session.is_connected().await
    }

    /// Close the session; pending requests fail with a disconnect error.
    pub async fn close(&self) -> Result<(), KeyboardError> {
        self.session
            .close()
            .await
            .map_err(|e| KeyboardError::Protocol(via_transport::ViaError::WriteFailed(e)))
    }

    // === Device info ===

    /// VIA protocol version (big-endian u16 at response bytes 1-2).
    pub async fn protocol_version(&self) -> Result<u16, KeyboardError> {
        let response = self.session.query(cmd::GET_PROTOCOL_VERSION, &[]).await?;
        Ok(response.u16_be(1))
    }

    /// Number of dynamic keymap layers.
    pub async fn layer_count(&self) -> Result<u8, KeyboardError> {
        let response = self
            .session
            .query(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[])
            .await?;
        Ok(response.byte(1))
    }

    // === Keymap ===

    /// Keycode at (layer, row, col). The response echoes the request
    /// payload in bytes 1-3; the keycode follows at bytes 4-5.
    pub async fn keycode(&self, layer: u8, row: u8, col: u8) -> Result<u16, KeyboardError> {
        let response = self
            .session
            .query(cmd::DYNAMIC_KEYMAP_GET_KEYCODE, &[layer, row, col])
            .await?;
        Ok(response.u16_be(4))
    }

    /// Assign a keycode at (layer, row, col).
    pub async fn set_keycode(
        &self,
        layer: u8,
        row: u8,
        col: u8,
        keycode: u16,
    ) -> Result<(), KeyboardError> {
        let [hi, lo] = keycode.to_be_bytes();
        self.session
            .query(cmd::DYNAMIC_KEYMAP_SET_KEYCODE, &[layer, row, col, hi, lo])
            .await?;
        Ok(())
    }

    /// Read up to [`KEYMAP_CHUNK_SIZE`] bytes of the raw keymap buffer.
    pub async fn keymap_buffer(&self, offset: u16, size: u8) -> Result<Vec<u8>, KeyboardError> {
        if size as usize > KEYMAP_CHUNK_SIZE {
            return Err(KeyboardError::InvalidParameter(format!(
                "Keymap read size must be <= {KEYMAP_CHUNK_SIZE}"
            )));
        }
        let [off_hi, off_lo] = offset.to_be_bytes();
        let response = self
            .session
            .query(cmd::DYNAMIC_KEYMAP_GET_BUFFER, &[off_hi, off_lo, size])
            .await?;
        Ok(response.slice(4, size as usize).to_vec())
    }

    /// Write up to [`KEYMAP_CHUNK_SIZE`] bytes of the raw keymap buffer.
    pub async fn set_keymap_buffer(&self, offset: u16, data: &[u8]) -> Result<(), KeyboardError> {
        if data.len() > KEYMAP_CHUNK_SIZE {
            return Err(KeyboardError::InvalidParameter(format!(
                "Keymap write size must be <= {KEYMAP_CHUNK_SIZE}"
            )));
        }
        let [off_hi, off_lo] = offset.to_be_bytes();
        let mut payload = Vec::with_capacity(3 + data.len());
        payload.extend_from_slice(&[off_hi, off_lo, data.len() as u8]);
        payload.extend_from_slice(data);
        self.session
            .query(cmd::DYNAMIC_KEYMAP_SET_BUFFER, &payload)
            .await?;
        Ok(())
    }

    /// Read one full layer of keycodes, sequentially in frame-sized
    /// chunks. Returns `rows * cols` big-endian u16 values.
    pub async fn read_layer(&self, layer: u8) -> Result<Vec<u16>, KeyboardError> {
        let layer_size = self.dims.layer_size();
        let base = layer as usize * layer_size;
        let mut raw = Vec::with_capacity(layer_size);
        while raw.len() < layer_size {
            let offset = base + raw.len();
            let size = (layer_size - raw.len()).min(KEYMAP_CHUNK_SIZE);
            let chunk = self.keymap_buffer(offset as u16, size as u8).await?;
            raw.extend_from_slice(&chunk);
        }
        Ok(raw
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect())
    }

    /// Restore the default keymap.
    pub async fn reset_keymap(&self) -> Result<(), KeyboardError> {
        self.session.query(cmd::DYNAMIC_KEYMAP_RESET, &[]).await?;
        Ok(())
    }

    // === Maintenance ===

    /// Clear the persistent store back to firmware defaults.
    pub async fn reset_eeprom(&self) -> Result<(), KeyboardError> {
        self.session.query(cmd::EEPROM_RESET, &[]).await?;
        Ok(())
    }

    /// Reboot into the bootloader for flashing.
    pub async fn jump_to_bootloader(&self) -> Result<(), KeyboardError> {
        self.session.query(cmd::BOOTLOADER_JUMP, &[]).await?;
        Ok(())
    }

    // === Switch matrix ===

    /// Live pressed-key coordinates from the scan matrix.
    pub async fn matrix_state(&self) -> Result<MatrixState, KeyboardError> {
        let response = self
            .session
            .query(cmd::GET_KEYBOARD_VALUE, &[keyboard_value::SWITCH_MATRIX_STATE])
            .await?;
        // Bitmap begins at byte 2, after the echoed value id.
        let bitmap = response.slice(2, self.dims.bitmap_len());
        Ok(MatrixState::decode(bitmap, self.dims))
    }

    // === Custom values (channel + value id) ===

    /// Read one byte-sized custom value.
    pub async fn custom_get(&self, channel: u8, value_id: u8) -> Result<u8, KeyboardError> {
        let response = self
            .session
            .query(cmd::CUSTOM_GET_VALUE, &[channel, value_id])
            .await?;
        Ok(response.byte(3))
    }

    /// Read a two-byte custom value (color slots).
    pub async fn custom_get_pair(
        &self,
        channel: u8,
        value_id: u8,
    ) -> Result<(u8, u8), KeyboardError> {
        let response = self
            .session
            .query(cmd::CUSTOM_GET_VALUE, &[channel, value_id])
            .await?;
        Ok((response.byte(3), response.byte(4)))
    }

    /// Write a custom value and await the acknowledgement.
    pub async fn custom_set(
        &self,
        channel: u8,
        value_id: u8,
        value: &[u8],
    ) -> Result<(), KeyboardError> {
        let mut payload = Vec::with_capacity(2 + value.len());
        payload.extend_from_slice(&[channel, value_id]);
        payload.extend_from_slice(value);
        self.session.query(cmd::CUSTOM_SET_VALUE, &payload).await?;
        Ok(())
    }

    /// Write a custom value without awaiting a response. Tested
    /// lighting firmware does not reliably acknowledge channel-2 set
    /// commands, so those setters go through here.
    pub async fn custom_set_unacked(
        &self,
        channel: u8,
        value_id: u8,
        value: &[u8],
    ) -> Result<(), KeyboardError> {
        let mut payload = Vec::with_capacity(2 + value.len());
        payload.extend_from_slice(&[channel, value_id]);
        payload.extend_from_slice(value);
        self.session.send(cmd::CUSTOM_SET_VALUE, &payload).await?;
        Ok(())
    }

    /// Commit a channel's values to the persistent store. Field writes
    /// alone are volatile until this is called.
    pub async fn custom_save(&self, channel: u8) -> Result<(), KeyboardError> {
        self.session.query(cmd::CUSTOM_SAVE, &[channel]).await?;
        Ok(())
    }

    // === Hall-Effect (channel 0) ===

    /// One awaited byte write to a Hall-Effect field.
    async fn set_he_field(&self, value_id: u8, value: u8) -> Result<(), KeyboardError> {
        debug!(field = he::name(value_id), value, "writing Hall-Effect field");
        self.custom_set(channel::HALL_EFFECT, value_id, &[value])
            .await
    }

    /// Read the full Hall-Effect configuration, one field at a time.
    pub async fn he_config(&self) -> Result<HeConfig, KeyboardError> {
        let ch = channel::HALL_EFFECT;
        let mode_raw = self.custom_get(ch, he::ACTUATION_MODE).await?;
        let actuation_mode = ActuationMode::from_u8(mode_raw).ok_or_else(|| {
            KeyboardError::UnexpectedResponse(format!("Unknown actuation mode {mode_raw}"))
        })?;
        Ok(HeConfig {
            actuation_mode,
            actuation_threshold: self.custom_get(ch, he::ACTUATION_THRESHOLD).await?,
            release_threshold: self.custom_get(ch, he::RELEASE_THRESHOLD).await?,
            rapid_trigger: RapidTrigger {
                deadzone: self.custom_get(ch, he::RAPID_TRIGGER_DEADZONE).await?,
                engage_distance: self.custom_get(ch, he::RAPID_TRIGGER_ENGAGE).await?,
                disengage_distance: self.custom_get(ch, he::RAPID_TRIGGER_DISENGAGE).await?,
            },
            key_cancel: KeyCancel {
                ad: self.custom_get(ch, he::KEY_CANCEL_AD).await? != 0,
                zx: self.custom_get(ch, he::KEY_CANCEL_ZX).await? != 0,
            },
        })
    }

    /// Apply the fields present in `update`, each clamped to its
    /// documented range, one awaited write per field. Absent fields are
    /// left untouched on the device.
    pub async fn set_he_config(&self, update: &HeConfigUpdate) -> Result<(), KeyboardError> {
        if let Some(mode) = update.actuation_mode {
            self.set_he_field(he::ACTUATION_MODE, mode.to_u8()).await?;
        }
        if let Some(value) = update.actuation_threshold {
            let value = clamp(value, range::ACTUATION_MIN, range::ACTUATION_MAX);
            self.set_he_field(he::ACTUATION_THRESHOLD, value).await?;
        }
        if let Some(value) = update.release_threshold {
            let value = clamp(value, range::RELEASE_MIN, range::RELEASE_MAX);
            self.set_he_field(he::RELEASE_THRESHOLD, value).await?;
        }
        if let Some(value) = update.deadzone {
            let value = clamp(value, range::DEADZONE_MIN, range::DEADZONE_MAX);
            self.set_he_field(he::RAPID_TRIGGER_DEADZONE, value).await?;
        }
        if let Some(value) = update.engage_distance {
            let value = clamp(value, range::RT_DISTANCE_MIN, range::RT_DISTANCE_MAX);
            self.set_he_field(he::RAPID_TRIGGER_ENGAGE, value).await?;
        }
        if let Some(value) = update.disengage_distance {
            let value = clamp(value, range::RT_DISTANCE_MIN, range::RT_DISTANCE_MAX);
            self.set_he_field(he::RAPID_TRIGGER_DISENGAGE, value).await?;
        }
        if let Some(enabled) = update.key_cancel_ad {
            self.set_he_field(he::KEY_CANCEL_AD, enabled as u8).await?;
        }
        if let Some(enabled) = update.key_cancel_zx {
            self.set_he_field(he::KEY_CANCEL_ZX, enabled as u8).await?;
        }
        Ok(())
    }

    /// Advance the actuation mode one step in the Normal → Rapid
    /// Trigger → Key Cancel cycle. Read-modify-write; the firmware has
    /// no toggle instruction.
    pub async fn toggle_actuation_mode(&self) -> Result<ActuationMode, KeyboardError> {
        let current = self
            .custom_get(channel::HALL_EFFECT, he::ACTUATION_MODE)
            .await?;
        let next = ActuationMode::from_u8(current)
            .unwrap_or_default()
            .next();
        self.set_he_field(he::ACTUATION_MODE, next.to_u8()).await?;
        Ok(next)
    }

    /// Begin sensor calibration; the user then presses every key to
    /// full travel.
    pub async fn start_calibration(&self) -> Result<(), KeyboardError> {
        self.set_he_field(he::START_CALIBRATION, 1).await
    }

    /// Persist the calibration gathered since [`Self::start_calibration`].
    pub async fn save_calibration(&self) -> Result<(), KeyboardError> {
        self.set_he_field(he::SAVE_CALIBRATION, 1).await
    }

    /// Commit Hall-Effect settings to the persistent store.
    pub async fn save_he_config(&self) -> Result<(), KeyboardError> {
        self.custom_save(channel::HALL_EFFECT).await
    }

    // === RGB lighting (channel 2) ===

    /// One fire-and-forget write to a lighting field.
    async fn set_rgb_field(&self, value_id: u8, value: &[u8]) -> Result<(), KeyboardError> {
        debug!(field = rgb::name(value_id), "writing lighting field");
        self.custom_set_unacked(channel::RGB_MATRIX, value_id, value)
            .await
    }

    /// Read the full lighting configuration, one field at a time.
    pub async fn rgb_config(&self) -> Result<RgbConfig, KeyboardError> {
        let ch = channel::RGB_MATRIX;
        let brightness = self.custom_get(ch, rgb::BRIGHTNESS).await?;
        let effect = RgbEffect::from_u8(self.custom_get(ch, rgb::EFFECT).await?);
        let effect_speed = self.custom_get(ch, rgb::EFFECT_SPEED).await?;
        let (hue1, sat1) = self.custom_get_pair(ch, rgb::COLOR_1).await?;
        let (hue2, sat2) = self.custom_get_pair(ch, rgb::COLOR_2).await?;
        Ok(RgbConfig {
            brightness,
            effect,
            effect_speed,
            color1: HsColor::new(hue1, sat1),
            color2: HsColor::new(hue2, sat2),
        })
    }

    /// Write every lighting field, fire-and-forget per field.
    pub async fn set_rgb_config(&self, config: &RgbConfig) -> Result<(), KeyboardError> {
        self.set_rgb_brightness(config.brightness).await?;
        self.set_rgb_effect(config.effect).await?;
        self.set_rgb_effect_speed(config.effect_speed).await?;
        self.set_rgb_color1(config.color1).await?;
        self.set_rgb_color2(config.color2).await
    }

    pub async fn set_rgb_brightness(&self, brightness: u8) -> Result<(), KeyboardError> {
        self.set_rgb_field(rgb::BRIGHTNESS, &[brightness]).await
    }

    pub async fn set_rgb_effect(&self, effect: RgbEffect) -> Result<(), KeyboardError> {
        self.set_rgb_field(rgb::EFFECT, &[effect.to_u8()]).await
    }

    pub async fn set_rgb_effect_speed(&self, speed: u8) -> Result<(), KeyboardError> {
        self.set_rgb_field(rgb::EFFECT_SPEED, &[speed]).await
    }

    pub async fn set_rgb_color1(&self, color: HsColor) -> Result<(), KeyboardError> {
        self.set_rgb_field(rgb::COLOR_1, &[color.hue, color.sat]).await
    }

    pub async fn set_rgb_color2(&self, color: HsColor) -> Result<(), KeyboardError> {
        self.set_rgb_field(rgb::COLOR_2, &[color.hue, color.sat]).await
    }

    /// Turn lighting off.
    pub async fn rgb_off(&self) -> Result<(), KeyboardError> {
        self.set_rgb_effect(RgbEffect::Off).await
    }

    /// Solid color at the given brightness.
    pub async fn rgb_solid(&self, color: HsColor, brightness: u8) -> Result<(), KeyboardError> {
        self.set_rgb_effect(RgbEffect::SolidColor).await?;
        self.set_rgb_color1(color).await?;
        self.set_rgb_brightness(brightness).await
    }

    /// Full-spectrum cycling.
    pub async fn rgb_rainbow(&self) -> Result<(), KeyboardError> {
        self.set_rgb_effect(RgbEffect::CycleAll).await
    }

    /// Commit lighting settings to the persistent store. Unlike the
    /// field setters, the save command is acknowledged and awaited.
    pub async fn save_rgb_config(&self) -> Result<(), KeyboardError> {
        self.custom_save(channel::RGB_MATRIX).await
    }
}
