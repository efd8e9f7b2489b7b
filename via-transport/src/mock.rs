//! In-memory transport for exercising the protocol core without
//! hardware.
//!
//! Tests either inject inbound frames by hand ([`MockTransport::inject`])
//! or install a responder closure that builds the device's answer to
//! each written frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::TransportError;
use crate::frame::Frame;
use crate::protocol::timing;
use crate::{InboundFrame, Transport, TransportDeviceInfo};

/// Builds the simulated device response to a written frame, or `None`
/// for commands the fake firmware does not answer.
pub type Responder = Box<dyn FnMut(&Frame) -> Option<Frame> + Send>;

pub struct MockTransport {
    info: TransportDeviceInfo,
    written: Mutex<Vec<Frame>>,
    responder: Mutex<Option<Responder>>,
    inbound_tx: broadcast::Sender<InboundFrame>,
    fail_writes: AtomicBool,
    connected: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        let (inbound_tx, _) = broadcast::channel(timing::INBOUND_CHANNEL_CAPACITY);
        Arc::new(Self {
            info: TransportDeviceInfo {
                vid: 0xFEED,
                pid: 0x0000,
                device_path: "mock".into(),
                product_name: Some("Mock VIA keyboard".into()),
            },
            written: Mutex::new(Vec::new()),
            responder: Mutex::new(None),
            inbound_tx,
            fail_writes: AtomicBool::new(false),
            connected: AtomicBool::new(true),
        })
    }

    /// A transport whose fake firmware answers every write via `f`.
    pub fn with_responder<F>(f: F) -> Arc<Self>
    where
        F: FnMut(&Frame) -> Option<Frame> + Send + 'static,
    {
        let transport = Self::new();
        *transport.responder.lock() = Some(Box::new(f));
        transport
    }

    /// All frames written so far, in order.
    pub fn written(&self) -> Vec<Frame> {
        self.written.lock().clone()
    }

    pub fn written_count(&self) -> usize {
        self.written.lock().len()
    }

    /// Deliver an inbound frame as if the device had sent it.
    pub fn inject(&self, frame: Frame) {
        let _ = self.inbound_tx.send(InboundFrame {
            report_id: 0,
            frame,
        });
    }

    /// Make subsequent writes fail synchronously.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write(&self, frame: &Frame) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::Hid("simulated write failure".into()));
        }
        self.written.lock().push(*frame);
        let response = self.responder.lock().as_mut().and_then(|r| r(frame));
        if let Some(response) = response {
            let _ = self.inbound_tx.send(InboundFrame {
                report_id: 0,
                frame: response,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundFrame> {
        self.inbound_tx.subscribe()
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
