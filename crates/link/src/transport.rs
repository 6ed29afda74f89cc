//! Transport seam and the WebSocket transport.
//!
//! A transport runs on its own task and reports everything it observes
//! through an [`EventSink`]. The session only ever sees those events, so a
//! test can substitute a scripted transport for the real socket.

use crate::driver::DriverMsg;
use crate::state::{AttemptId, LinkEvent, TransportEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Channel a transport reports into, pre-tagged with its attempt
#[derive(Debug, Clone)]
pub struct EventSink {
    attempt: AttemptId,
    tx: mpsc::UnboundedSender<DriverMsg>,
}

impl EventSink {
    pub(crate) fn new(attempt: AttemptId, tx: mpsc::UnboundedSender<DriverMsg>) -> Self {
        Self { attempt, tx }
    }

    /// Attempt this sink belongs to
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Report an event. Returns `false` once the driver has stopped.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(DriverMsg::Link(LinkEvent::Transport {
                attempt: self.attempt,
                event,
            }))
            .is_ok()
    }
}

/// Handle to a running transport
#[derive(Debug, Default)]
pub struct TransportHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TransportHandle {
    /// Handle for a transport task with a graceful shutdown signal
    pub fn new(shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Handle for a transport with nothing to stop
    pub fn detached() -> Self {
        Self::default()
    }

    /// Ask the transport to close
    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }

    /// Close and stop the transport task outright
    pub fn abort(&mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Opens connections for the session driver
pub trait Transport: Send + 'static {
    /// Open a connection to `endpoint`, reporting through `sink`.
    ///
    /// Must not block. A failed open is reported as
    /// [`TransportEvent::Error`] followed by [`TransportEvent::Closed`].
    fn open(&mut self, endpoint: &str, sink: EventSink) -> TransportHandle;
}

/// Receive-only WebSocket transport
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl WsTransport {
    /// Create the transport
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WsTransport {
    fn open(&mut self, endpoint: &str, sink: EventSink) -> TransportHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let endpoint = endpoint.to_string();
        let task = tokio::spawn(run_socket(endpoint, sink, shutdown_rx));
        TransportHandle::new(shutdown_tx, task)
    }
}

async fn run_socket(endpoint: String, sink: EventSink, mut shutdown: oneshot::Receiver<()>) {
    let attempt = sink.attempt();
    let connecting = tokio::select! {
        result = connect_async(endpoint.as_str()) => result,
        _ = &mut shutdown => {
            debug!(attempt, "transport closed before handshake completed");
            return;
        }
    };

    let ws_stream = match connecting {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!(attempt, endpoint = %endpoint, error = %e, "WebSocket handshake failed");
            sink.emit(TransportEvent::Error(e.to_string()));
            sink.emit(TransportEvent::Closed);
            return;
        }
    };

    info!(attempt, endpoint = %endpoint, "WebSocket open");
    sink.emit(TransportEvent::Opened);
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!(attempt, "closing WebSocket on request");
                let _ = ws_sender.send(Message::Close(None)).await;
                return;
            }
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !sink.emit(TransportEvent::Message(text)) {
                        return;
                    }
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => {
                        if !sink.emit(TransportEvent::Message(text)) {
                            return;
                        }
                    }
                    Err(_) => debug!(attempt, "non UTF-8 binary frame dropped"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(attempt, ?frame, "server closed WebSocket");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(attempt, error = %e, "WebSocket receive failed");
                    sink.emit(TransportEvent::Error(e.to_string()));
                    sink.emit(TransportEvent::Closed);
                    return;
                }
                None => {
                    sink.emit(TransportEvent::Closed);
                    return;
                }
            }
        }
    }
}
