//! Request correlation for the shared VIA command/response channel.
//!
//! A response echoes the request's command id in byte 0; that byte is
//! the only correlation key the protocol has. The correlator owns the
//! pending-request table and runs as a single task, so sends, inbound
//! frames, deadline expiry, and shutdown are serialized in one place.
//! A response racing an expiring timer can never resolve a request
//! twice.
//!
//! ```text
//! [ViaSession::query/send]  →  mpsc  →  [correlator task]  →  Transport::write
//!                                            ↑
//!                        broadcast (inbound frames from the transport)
//! ```
//!
//! The correlator never retries. At most one request per command id is
//! in flight; a newer request for the same id first fails the prior
//! entry with [`ViaError::Superseded`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace, warn};

use crate::error::ViaError;
use crate::frame::Frame;
use crate::protocol::{cmd, timing};
use crate::{InboundFrame, Transport};

/// A caller request into the correlator task.
pub(crate) enum Request {
    /// Send a frame and await the matching response.
    Query {
        frame: Frame,
        reply: oneshot::Sender<Result<Frame, ViaError>>,
    },
    /// Write a frame without registering a pending entry.
    Send {
        frame: Frame,
        reply: oneshot::Sender<Result<(), ViaError>>,
    },
    /// Fail all pending entries and stop the loop.
    Shutdown,
}

struct Pending {
    deadline: Instant,
    reply: oneshot::Sender<Result<Frame, ViaError>>,
}

pub(crate) struct Correlator {
    transport: Arc<dyn Transport>,
    inbound: broadcast::Receiver<InboundFrame>,
    requests: mpsc::Receiver<Request>,
    pending: HashMap<u8, Pending>,
    timeout: Duration,
}

impl Correlator {
    /// Spawn the correlator task for an opened transport.
    pub(crate) fn spawn(transport: Arc<dyn Transport>, timeout: Duration) -> mpsc::Sender<Request> {
        let (request_tx, request_rx) = mpsc::channel(timing::REQUEST_QUEUE_SIZE);
        let inbound = transport.subscribe();
        let actor = Correlator {
            transport,
            inbound,
            requests: request_rx,
            pending: HashMap::new(),
            timeout,
        };
        tokio::spawn(actor.run());
        request_tx
    }

    async fn run(mut self) {
        debug!("correlator task started");
        loop {
            let next_deadline = self.pending.values().map(|p| p.deadline).min();
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(Request::Query { frame, reply }) => self.handle_query(frame, reply).await,
                    Some(Request::Send { frame, reply }) => {
                        let result = self
                            .transport
                            .write(&frame)
                            .await
                            .map_err(ViaError::WriteFailed);
                        let _ = reply.send(result);
                    }
                    Some(Request::Shutdown) | None => break,
                },
                inbound = self.inbound.recv() => match inbound {
                    Ok(report) => self.handle_inbound(report),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("inbound receiver lagged by {n} frames");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = deadline_sleep(next_deadline) => self.expire_due(),
            }
        }
        self.fail_all();
        debug!("correlator task stopped");
    }

    async fn handle_query(
        &mut self,
        frame: Frame,
        reply: oneshot::Sender<Result<Frame, ViaError>>,
    ) {
        let command = frame.command_id();

        // The device cannot disambiguate two in-flight requests sharing
        // a command id: evict any prior entry before this one goes out.
        if let Some(prev) = self.pending.remove(&command) {
            warn!(
                "superseding pending request for 0x{command:02X} ({})",
                cmd::name(command)
            );
            let _ = prev.reply.send(Err(ViaError::Superseded(command)));
        }

        trace!("sending {frame:?}");
        self.pending.insert(
            command,
            Pending {
                deadline: Instant::now() + self.timeout,
                reply,
            },
        );

        if let Err(e) = self.transport.write(&frame).await {
            // First failure wins: resolve the entry we just registered.
            if let Some(entry) = self.pending.remove(&command) {
                let _ = entry.reply.send(Err(ViaError::WriteFailed(e)));
            }
        }
    }

    fn handle_inbound(&mut self, report: InboundFrame) {
        let command = report.frame.command_id();
        match self.pending.remove(&command) {
            Some(entry) => {
                trace!("resolved {:?}", report.frame);
                let _ = entry.reply.send(Ok(report.frame));
            }
            // Unsolicited or already-timed-out response.
            None => trace!("dropping unmatched inbound frame {:?}", report.frame),
        }
    }

    fn expire_due(&mut self) {
        let now = Instant::now();
        let due: Vec<u8> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(&command, _)| command)
            .collect();
        for command in due {
            if let Some(entry) = self.pending.remove(&command) {
                warn!(
                    "command 0x{command:02X} ({}) timed out after {:?}",
                    cmd::name(command),
                    self.timeout
                );
                let _ = entry.reply.send(Err(ViaError::Timeout(command)));
            }
        }
    }

    /// Resolve every pending entry on disconnect so no caller is left
    /// suspended.
    fn fail_all(&mut self) {
        for (command, entry) in self.pending.drain() {
            debug!("failing pending 0x{command:02X} on shutdown");
            let _ = entry.reply.send(Err(ViaError::NotConnected));
        }
    }
}

async fn deadline_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
