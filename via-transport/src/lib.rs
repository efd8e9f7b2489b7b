//! Raw-HID transport and request correlation for the VIA keyboard
//! protocol.
//!
//! This crate provides the protocol core shared by all higher-level
//! tooling:
//!
//! - 32-byte command frames and their byte layout ([`frame`])
//! - the VIA command id space and sub-protocol addressing ([`protocol`])
//! - request/response correlation with timeouts ([`session`])
//! - a hidapi-backed transport ([`hid`]) and an in-memory one for
//!   tests ([`mock`])

pub mod error;
pub mod frame;
pub mod hid;
pub mod mock;
pub mod protocol;
pub mod session;

mod correlator;

pub use error::{TransportError, ViaError};
pub use frame::{Frame, RAW_HID_BUFFER_SIZE};
pub use hid::HidTransport;
pub use mock::MockTransport;
pub use session::{SessionConfig, ViaSession};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

/// Report id used for all outbound writes.
pub const OUTPUT_REPORT_ID: u8 = 0;

/// An inbound report delivered by a transport.
#[derive(Debug, Clone, Copy)]
pub struct InboundFrame {
    /// HID report id as delivered by the host stack. Correlation uses
    /// frame byte 0 only; the report id is informational.
    pub report_id: u8,
    pub frame: Frame,
}

/// Device identification information
#[derive(Debug, Clone, Serialize)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Product name if available
    pub product_name: Option<String>,
}

/// An opened duplex frame channel to a keyboard.
///
/// Implementations accept fixed-length outbound frames and deliver
/// inbound frames via a broadcast channel. Device discovery and the
/// host permission flow are the caller's concern; a `Transport` is
/// constructed from an already-opened device.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one outbound frame (report id 0).
    async fn write(&self, frame: &Frame) -> Result<(), TransportError>;

    /// Subscribe to inbound frames.
    fn subscribe(&self) -> broadcast::Receiver<InboundFrame>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check if the transport is still connected
    async fn is_connected(&self) -> bool;

    /// Close the transport gracefully
    async fn close(&self) -> Result<(), TransportError>;
}
