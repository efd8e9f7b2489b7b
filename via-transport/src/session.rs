//! Session lifecycle binding a transport to the request correlator.
//!
//! A [`ViaSession`] owns one transport reference and the correlator
//! task driving it. Sessions are independent values: multiple
//! sessions to different devices can coexist in one process; nothing
//! here is ambient or global.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::correlator::{Correlator, Request};
use crate::error::{TransportError, ViaError};
use crate::frame::Frame;
use crate::protocol::timing;
use crate::{Transport, TransportDeviceInfo};

/// Session tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Deadline for an awaited response.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(timing::DEFAULT_TIMEOUT_MS),
        }
    }
}

/// A live protocol session over one opened transport.
pub struct ViaSession {
    transport: Arc<dyn Transport>,
    requests: mpsc::Sender<Request>,
}

impl ViaSession {
    /// Bind an opened transport and spawn the correlator task.
    pub fn open(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        let requests = Correlator::spawn(Arc::clone(&transport), config.timeout);
        Self {
            transport,
            requests,
        }
    }

    /// Bind with the default 500 ms response deadline.
    pub fn open_default(transport: Arc<dyn Transport>) -> Self {
        Self::open(transport, SessionConfig::default())
    }

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    /// Send `command` with `payload` and await the matching response.
    ///
    /// Resolves exactly once with the response frame, a timeout, a
    /// write failure, or [`ViaError::Superseded`] if a newer request
    /// with the same command id preempts this one.
    pub async fn query(&self, command: u8, payload: &[u8]) -> Result<Frame, ViaError> {
        let frame = Frame::encode(command, payload);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(Request::Query {
                frame,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ViaError::NotConnected)?;
        reply_rx.await.map_err(|_| ViaError::NotConnected)?
    }

    /// Write a frame without awaiting a response.
    ///
    /// Still routed through the correlator task so writes stay
    /// serialized with awaited requests. Used for the lighting-channel
    /// setters that tested firmware does not acknowledge.
    pub async fn send(&self, command: u8, payload: &[u8]) -> Result<(), ViaError> {
        let frame = Frame::encode(command, payload);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(Request::Send {
                frame,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ViaError::NotConnected)?;
        reply_rx.await.map_err(|_| ViaError::NotConnected)?
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.is_connected().await
    }

    /// Disconnect: every pending request resolves with
    /// [`ViaError::NotConnected`] and the transport is closed.
    /// Subsequent requests on this session fail fast.
    pub async fn close(&self) -> Result<(), TransportError> {
        let _ = self.requests.send(Request::Shutdown).await;
        self.transport.close().await
    }
}
