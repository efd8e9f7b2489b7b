//! Command library wire-format tests against a scripted transport.

use std::sync::Arc;

use via_keyboard::{
    ActuationMode, HeConfigUpdate, HsColor, Keyboard, MatrixDims, RgbEffect,
};
use via_transport::protocol::{channel, cmd, he, keyboard_value, rgb};
use via_transport::{Frame, MockTransport, Transport, ViaSession};

fn keyboard(transport: &Arc<MockTransport>) -> Keyboard {
    let session = ViaSession::open_default(Arc::clone(transport) as Arc<dyn Transport>);
    Keyboard::new(session, MatrixDims::default())
}

/// Answers every awaited command by echoing the request, which is what
/// firmware acknowledgements look like for set-style commands.
fn echo(frame: &Frame) -> Option<Frame> {
    Some(*frame)
}

#[tokio::test]
async fn protocol_version_decodes_big_endian() {
    let transport = MockTransport::with_responder(|frame| {
        assert_eq!(frame.command_id(), cmd::GET_PROTOCOL_VERSION);
        Some(Frame::encode(cmd::GET_PROTOCOL_VERSION, &[0x00, 0x0C]))
    });
    let kb = keyboard(&transport);
    assert_eq!(kb.protocol_version().await.unwrap(), 0x000C);
}

#[tokio::test]
async fn keycode_payload_and_response_offsets() {
    let transport = MockTransport::with_responder(|frame| match frame.command_id() {
        // Firmware echoes the addressing bytes, then the keycode.
        cmd::DYNAMIC_KEYMAP_GET_KEYCODE => Some(Frame::encode(
            cmd::DYNAMIC_KEYMAP_GET_KEYCODE,
            &[frame.byte(1), frame.byte(2), frame.byte(3), 0x52, 0x21],
        )),
        _ => echo(frame),
    });
    let kb = keyboard(&transport);

    assert_eq!(kb.keycode(1, 2, 3).await.unwrap(), 0x5221);
    kb.set_keycode(1, 2, 3, 0x5221).await.unwrap();

    let written = transport.written();
    assert_eq!(written[0].slice(1, 3), [1, 2, 3]);
    assert_eq!(written[1].slice(1, 5), [1, 2, 3, 0x52, 0x21]);
}

#[tokio::test]
async fn matrix_state_decodes_bitmap_from_byte_two() {
    let transport = MockTransport::with_responder(|frame| {
        assert_eq!(frame.command_id(), cmd::GET_KEYBOARD_VALUE);
        assert_eq!(frame.byte(1), keyboard_value::SWITCH_MATRIX_STATE);
        // Value id echo at byte 1, bitmap from byte 2: second bitmap
        // byte, bit 0 -> row 0 column 8.
        Some(Frame::encode(
            cmd::GET_KEYBOARD_VALUE,
            &[keyboard_value::SWITCH_MATRIX_STATE, 0x00, 0x01],
        ))
    });
    let kb = keyboard(&transport);

    let state = kb.matrix_state().await.unwrap();
    assert_eq!(state.pressed.into_iter().collect::<Vec<_>>(), [(0, 8)]);
}

#[tokio::test]
async fn matrix_state_all_zero_is_empty_not_error() {
    let transport = MockTransport::with_responder(|_| {
        Some(Frame::encode(
            cmd::GET_KEYBOARD_VALUE,
            &[keyboard_value::SWITCH_MATRIX_STATE],
        ))
    });
    let kb = keyboard(&transport);
    assert!(kb.matrix_state().await.unwrap().is_empty());
}

#[tokio::test]
async fn he_setters_clamp_to_documented_range() {
    let transport = MockTransport::with_responder(echo);
    let kb = keyboard(&transport);

    kb.set_he_config(&HeConfigUpdate {
        actuation_threshold: Some(500),
        ..Default::default()
    })
    .await
    .unwrap();
    kb.set_he_config(&HeConfigUpdate {
        actuation_threshold: Some(-5),
        ..Default::default()
    })
    .await
    .unwrap();

    let written = transport.written();
    assert_eq!(written[0].slice(1, 3), [channel::HALL_EFFECT, he::ACTUATION_THRESHOLD, 90]);
    assert_eq!(written[1].slice(1, 3), [channel::HALL_EFFECT, he::ACTUATION_THRESHOLD, 10]);
}

#[tokio::test]
async fn partial_update_writes_exactly_the_present_fields() {
    let transport = MockTransport::with_responder(echo);
    let kb = keyboard(&transport);

    kb.set_he_config(&HeConfigUpdate {
        actuation_threshold: Some(40),
        ..Default::default()
    })
    .await
    .unwrap();

    let written = transport.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].command_id(), cmd::CUSTOM_SET_VALUE);
    assert_eq!(written[0].slice(1, 3), [channel::HALL_EFFECT, he::ACTUATION_THRESHOLD, 40]);
}

#[tokio::test]
async fn he_config_reads_every_field_sequentially() {
    let transport = MockTransport::with_responder(|frame| {
        assert_eq!(frame.command_id(), cmd::CUSTOM_GET_VALUE);
        assert_eq!(frame.byte(1), channel::HALL_EFFECT);
        // Value derived from the field id so decode mix-ups surface.
        let value = match frame.byte(2) {
            he::ACTUATION_MODE => 1,
            id => id + 20,
        };
        Some(Frame::encode(
            cmd::CUSTOM_GET_VALUE,
            &[frame.byte(1), frame.byte(2), value],
        ))
    });
    let kb = keyboard(&transport);

    let config = kb.he_config().await.unwrap();
    assert_eq!(config.actuation_mode, ActuationMode::RapidTrigger);
    assert_eq!(config.actuation_threshold, 21);
    assert_eq!(config.release_threshold, 22);
    assert_eq!(config.rapid_trigger.deadzone, 27);
    assert_eq!(config.rapid_trigger.engage_distance, 28);
    assert_eq!(config.rapid_trigger.disengage_distance, 29);
    assert!(config.key_cancel.ad);
    assert!(config.key_cancel.zx);

    let order: Vec<u8> = transport.written().iter().map(|f| f.byte(2)).collect();
    assert_eq!(
        order,
        [
            he::ACTUATION_MODE,
            he::ACTUATION_THRESHOLD,
            he::RELEASE_THRESHOLD,
            he::RAPID_TRIGGER_DEADZONE,
            he::RAPID_TRIGGER_ENGAGE,
            he::RAPID_TRIGGER_DISENGAGE,
            he::KEY_CANCEL_AD,
            he::KEY_CANCEL_ZX,
        ]
    );
}

#[tokio::test]
async fn toggle_actuation_mode_wraps_and_is_read_modify_write() {
    let transport = MockTransport::with_responder(|frame| match frame.command_id() {
        cmd::CUSTOM_GET_VALUE => Some(Frame::encode(
            cmd::CUSTOM_GET_VALUE,
            &[frame.byte(1), frame.byte(2), 2],
        )),
        _ => echo(frame),
    });
    let kb = keyboard(&transport);

    let next = kb.toggle_actuation_mode().await.unwrap();
    assert_eq!(next, ActuationMode::Normal);

    let written = transport.written();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].command_id(), cmd::CUSTOM_GET_VALUE);
    assert_eq!(written[1].command_id(), cmd::CUSTOM_SET_VALUE);
    assert_eq!(written[1].slice(1, 3), [channel::HALL_EFFECT, he::ACTUATION_MODE, 0]);
}

#[tokio::test]
async fn calibration_commands_write_value_one() {
    let transport = MockTransport::with_responder(echo);
    let kb = keyboard(&transport);

    kb.start_calibration().await.unwrap();
    kb.save_calibration().await.unwrap();

    let written = transport.written();
    assert_eq!(written[0].slice(1, 3), [channel::HALL_EFFECT, he::START_CALIBRATION, 1]);
    assert_eq!(written[1].slice(1, 3), [channel::HALL_EFFECT, he::SAVE_CALIBRATION, 1]);
}

#[tokio::test]
async fn rgb_setters_resolve_without_any_response() {
    // No responder: awaited requests would time out, but the lighting
    // setters never wait for the device.
    let transport = MockTransport::new();
    let kb = keyboard(&transport);

    kb.set_rgb_effect(RgbEffect::CycleAll).await.unwrap();
    kb.set_rgb_brightness(200).await.unwrap();
    kb.set_rgb_color1(HsColor::new(85, 255)).await.unwrap();

    let written = transport.written();
    assert_eq!(written.len(), 3);
    assert_eq!(written[0].slice(1, 3), [channel::RGB_MATRIX, rgb::EFFECT, 4]);
    assert_eq!(written[1].slice(1, 3), [channel::RGB_MATRIX, rgb::BRIGHTNESS, 200]);
    assert_eq!(written[2].slice(1, 4), [channel::RGB_MATRIX, rgb::COLOR_1, 85, 255]);
}

#[tokio::test]
async fn rgb_save_is_awaited_unlike_field_writes() {
    let transport = MockTransport::with_responder(|frame| match frame.command_id() {
        cmd::CUSTOM_SAVE => {
            assert_eq!(frame.byte(1), channel::RGB_MATRIX);
            echo(frame)
        }
        // Lighting set-value goes unanswered, like real firmware.
        _ => None,
    });
    let kb = keyboard(&transport);

    kb.rgb_solid(HsColor::RED, 255).await.unwrap();
    kb.save_rgb_config().await.unwrap();
    assert_eq!(transport.written_count(), 4);
}

#[tokio::test]
async fn rgb_config_decodes_color_pairs() {
    let transport = MockTransport::with_responder(|frame| {
        let value: &[u8] = match frame.byte(2) {
            rgb::BRIGHTNESS => &[180],
            rgb::EFFECT => &[4],
            rgb::EFFECT_SPEED => &[96],
            rgb::COLOR_1 => &[85, 255],
            rgb::COLOR_2 => &[170, 128],
            _ => &[0],
        };
        let mut payload = vec![frame.byte(1), frame.byte(2)];
        payload.extend_from_slice(value);
        Some(Frame::encode(cmd::CUSTOM_GET_VALUE, &payload))
    });
    let kb = keyboard(&transport);

    let config = kb.rgb_config().await.unwrap();
    assert_eq!(config.brightness, 180);
    assert_eq!(config.effect, RgbEffect::CycleAll);
    assert_eq!(config.effect_speed, 96);
    assert_eq!(config.color1, HsColor::new(85, 255));
    assert_eq!(config.color2, HsColor::new(170, 128));
}

#[tokio::test]
async fn read_layer_chunks_the_keymap_buffer() {
    let transport = MockTransport::with_responder(|frame| {
        assert_eq!(frame.command_id(), cmd::DYNAMIC_KEYMAP_GET_BUFFER);
        let size = frame.byte(3) as usize;
        // Data starts at byte 4; fill with the low offset byte so the
        // reassembled buffer shows where each chunk landed.
        let mut payload = vec![frame.byte(1), frame.byte(2), frame.byte(3)];
        payload.extend(std::iter::repeat(frame.byte(2)).take(size));
        Some(Frame::encode(cmd::DYNAMIC_KEYMAP_GET_BUFFER, &payload))
    });
    let kb = keyboard(&transport);

    // 6x16 matrix = 192 bytes per layer = 6 full chunks + one of 24.
    let layer = kb.read_layer(1).await.unwrap();
    assert_eq!(layer.len(), 96);

    let written = transport.written();
    assert_eq!(written.len(), 7);
    let offsets: Vec<u16> = written.iter().map(|f| f.u16_be(1)).collect();
    assert_eq!(offsets, [192, 220, 248, 276, 304, 332, 360]);
    let sizes: Vec<u8> = written.iter().map(|f| f.byte(3)).collect();
    assert_eq!(sizes, [28, 28, 28, 28, 28, 28, 24]);
}

#[tokio::test]
async fn oversized_keymap_writes_are_rejected() {
    let transport = MockTransport::with_responder(echo);
    let kb = keyboard(&transport);

    let result = kb.set_keymap_buffer(0, &[0u8; 29]).await;
    assert!(matches!(
        result,
        Err(via_keyboard::KeyboardError::InvalidParameter(_))
    ));
    assert_eq!(transport.written_count(), 0);
}
