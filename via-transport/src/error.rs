//! Transport and protocol error types

use thiserror::Error;

/// Errors from the raw transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device disconnected")]
    Disconnected,

    #[error("HID error: {0}")]
    Hid(String),

    #[error("HID permission denied: {0}")]
    PermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::PermissionDenied(msg)
        } else {
            TransportError::Hid(msg)
        }
    }
}

/// Terminal outcomes of a single VIA request.
///
/// None of these is fatal to the session; a failed request leaves the
/// client usable. The core never retries; retry policy belongs to the
/// caller, because the command-id-only correlation key cannot tell a
/// retry's response apart from a response to a different logical
/// request that happens to share the id.
#[derive(Error, Debug)]
pub enum ViaError {
    /// No open transport/session
    #[error("No device connected")]
    NotConnected,

    /// The underlying write was rejected
    #[error("Transport write failed: {0}")]
    WriteFailed(TransportError),

    /// No response arrived within the deadline
    #[error("Command 0x{0:02X} timed out")]
    Timeout(u8),

    /// A newer request with the same command id preempted this one
    #[error("Command 0x{0:02X} superseded by a newer request")]
    Superseded(u8),
}
