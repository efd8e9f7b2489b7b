//! hidapi-backed transport for VIA raw-HID endpoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hidapi::HidDevice;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use zerocopy::IntoBytes;

use crate::error::TransportError;
use crate::frame::{Frame, RAW_HID_BUFFER_SIZE};
use crate::protocol::timing;
use crate::{InboundFrame, Transport, TransportDeviceInfo, OUTPUT_REPORT_ID};

/// Poll interval for the blocking reader thread (ms). Short enough that
/// the shutdown flag is observed promptly.
const READ_POLL_MS: i32 = 50;

/// Transport over a VIA raw-HID interface.
///
/// Takes two handles to the same interface: `device` carries outbound
/// output reports, `reader` is parked on a dedicated thread that pushes
/// every input report into a broadcast channel.
pub struct HidTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
    inbound_tx: broadcast::Sender<InboundFrame>,
    shutdown: Arc<AtomicBool>,
}

impl HidTransport {
    /// Wrap an already-opened device pair.
    pub fn new(device: HidDevice, reader: HidDevice, info: TransportDeviceInfo) -> Arc<Self> {
        let (inbound_tx, _) = broadcast::channel(timing::INBOUND_CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_tx = inbound_tx.clone();
        let thread_shutdown = Arc::clone(&shutdown);
        std::thread::Builder::new()
            .name("via-hid-reader".into())
            .spawn(move || run_reader_loop(reader, thread_tx, thread_shutdown))
            .expect("Failed to spawn HID reader thread");

        Arc::new(Self {
            device: Mutex::new(device),
            info,
            inbound_tx,
            shutdown,
        })
    }
}

#[async_trait]
impl Transport for HidTransport {
    async fn write(&self, frame: &Frame) -> Result<(), TransportError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(TransportError::Disconnected);
        }

        // Report id prefix + 32-byte frame, as the host stack expects.
        let mut report = [0u8; RAW_HID_BUFFER_SIZE + 1];
        report[0] = OUTPUT_REPORT_ID;
        report[1..].copy_from_slice(frame.as_bytes());

        let device = self.device.lock();
        let written = device.write(&report)?;
        debug!(
            "wrote {written} bytes for command 0x{:02X}",
            frame.command_id()
        );
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundFrame> {
        self.inbound_tx.subscribe()
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        if self.shutdown.load(Ordering::Relaxed) {
            return false;
        }
        self.device.lock().get_product_string().is_ok()
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for HidTransport {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        debug!("HidTransport dropped, signaling reader shutdown");
    }
}

fn run_reader_loop(
    reader: HidDevice,
    tx: broadcast::Sender<InboundFrame>,
    shutdown: Arc<AtomicBool>,
) {
    debug!("HID reader thread started");
    let mut buf = [0u8; RAW_HID_BUFFER_SIZE + 1];
    while !shutdown.load(Ordering::Relaxed) {
        match reader.read_timeout(&mut buf, READ_POLL_MS) {
            Ok(0) => continue, // poll timeout
            Ok(n) => {
                // hidapi strips the report id when it is 0; a full-size
                // read including the id arrives as 33 bytes.
                let (report_id, data) = if n > RAW_HID_BUFFER_SIZE {
                    (buf[0], &buf[1..n])
                } else {
                    (0, &buf[..n])
                };
                let frame = Frame::from_report(data);
                // No receivers is fine; the session may not be open yet.
                let _ = tx.send(InboundFrame { report_id, frame });
            }
            Err(e) => {
                warn!("HID read failed, stopping reader: {e}");
                break;
            }
        }
    }
    debug!("HID reader thread stopped");
}
