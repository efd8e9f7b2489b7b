//! Fixed-size VIA command frames.
//!
//! Every exchange with the firmware is one 32-byte raw HID report in
//! each direction. Byte 0 carries the command id; the payload is
//! left-aligned from byte 1 with the remainder zero-filled. Responses
//! use the identical layout and echo the request's command id in
//! byte 0, and that echo is the only correlation key the protocol has.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::protocol::cmd;

/// Raw HID report size used by the VIA protocol (both directions).
pub const RAW_HID_BUFFER_SIZE: usize = 32;

/// A single command or response frame.
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(transparent)]
pub struct Frame([u8; RAW_HID_BUFFER_SIZE]);

impl Frame {
    /// Build an outbound frame from a command id and payload.
    ///
    /// The payload is written starting at byte 1. Payloads longer than
    /// 31 bytes are truncated silently: the firmware never reads past
    /// the report boundary, so over-long input is a caller bug with a
    /// well-defined outcome rather than an error path.
    pub fn encode(command_id: u8, payload: &[u8]) -> Self {
        let mut buf = [0u8; RAW_HID_BUFFER_SIZE];
        buf[0] = command_id;
        let len = payload.len().min(RAW_HID_BUFFER_SIZE - 1);
        buf[1..1 + len].copy_from_slice(&payload[..len]);
        Self(buf)
    }

    /// Parse a frame from a raw inbound report.
    ///
    /// Short reads are zero-extended to the fixed size; anything past
    /// 32 bytes is ignored.
    pub fn from_report(data: &[u8]) -> Self {
        if let Ok(frame) = Frame::read_from_bytes(&data[..data.len().min(RAW_HID_BUFFER_SIZE)]) {
            return frame;
        }
        let mut buf = [0u8; RAW_HID_BUFFER_SIZE];
        let len = data.len().min(RAW_HID_BUFFER_SIZE);
        buf[..len].copy_from_slice(&data[..len]);
        Self(buf)
    }

    /// Command id (byte 0).
    pub fn command_id(&self) -> u8 {
        self.0[0]
    }

    /// Single byte at a command-specific offset.
    pub fn byte(&self, offset: usize) -> u8 {
        self.0[offset]
    }

    /// Big-endian u16 at `offset..offset + 2`.
    pub fn u16_be(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.0[offset], self.0[offset + 1]])
    }

    /// Slice of `len` bytes starting at `offset`, capped at the frame end.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        let start = offset.min(RAW_HID_BUFFER_SIZE);
        let end = (offset + len).min(RAW_HID_BUFFER_SIZE);
        &self.0[start..end]
    }

    /// The full 32-byte buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame(0x{:02X} {}, {:02X?})",
            self.command_id(),
            cmd::name(self.command_id()),
            &self.0[1..9]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_preserves_command_id() {
        for command in 0x01..=0x15u8 {
            let frame = Frame::encode(command, &[1, 2, 3]);
            assert_eq!(frame.command_id(), command);
        }
    }

    #[test]
    fn encode_left_aligns_and_zero_fills() {
        let frame = Frame::encode(0x04, &[2, 1, 7]);
        assert_eq!(frame.as_slice()[0], 0x04);
        assert_eq!(frame.as_slice()[1..4], [2, 1, 7]);
        assert!(frame.as_slice()[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_truncates_oversized_payload() {
        let payload = [0xAAu8; 40];
        let frame = Frame::encode(0x13, &payload);
        assert_eq!(frame.as_slice()[1..], [0xAA; RAW_HID_BUFFER_SIZE - 1]);
    }

    #[test]
    fn u16_be_joins_split_keycode() {
        // Set-keycode splits big-endian; a synthetic get response built
        // from the same bytes must round-trip the value.
        let keycode = 0x5221u16;
        let [hi, lo] = keycode.to_be_bytes();
        let set = Frame::encode(0x05, &[0, 1, 2, hi, lo]);
        let response = Frame::encode(0x04, &[0, 1, 2, set.byte(4), set.byte(5)]);
        assert_eq!(response.u16_be(4), keycode);
    }

    #[test]
    fn from_report_zero_extends_short_reads() {
        let frame = Frame::from_report(&[0x01, 0x00, 0x0C]);
        assert_eq!(frame.command_id(), 0x01);
        assert_eq!(frame.u16_be(1), 0x000C);
        assert!(frame.as_slice()[3..].iter().all(|&b| b == 0));
    }
}
