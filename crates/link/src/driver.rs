//! Session driver: the single event loop.
//!
//! Transport tasks, timer tasks and [`SessionHandle`] callers only send
//! [`DriverMsg`]s into one channel. The driver task drains it and runs each
//! message through the session to completion before taking the next, so
//! session state is never shared and never locked.

use crate::error::LinkError;
use crate::presenter::Presenter;
use crate::session::{SessionSnapshot, TelemetrySession, VehicleDetail};
use crate::state::{AttemptId, Command, LinkEvent, Notification};
use crate::transport::{EventSink, Transport, TransportHandle};
use fleetglass_stream::VehicleId;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Message for the driver loop
#[derive(Debug)]
pub enum DriverMsg {
    /// Transport or timer event
    Link(LinkEvent),
    /// Detail pane request
    Select {
        /// Vehicle to look up
        vehicle_id: VehicleId,
        /// Reply channel
        reply: oneshot::Sender<Option<VehicleDetail>>,
    },
    /// State request
    Snapshot {
        /// Reply channel
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Dispose the session and stop the loop
    Dispose {
        /// Signalled once disposal is complete
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle for talking to a running driver
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<DriverMsg>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> DriverMsg,
    ) -> Result<T, LinkError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| LinkError::DriverStopped)?;
        response.await.map_err(|_| LinkError::DriverStopped)
    }

    /// Latest raw record for `vehicle_id`, for the detail pane
    pub async fn select(
        &self,
        vehicle_id: impl Into<VehicleId>,
    ) -> Result<Option<VehicleDetail>, LinkError> {
        let vehicle_id = vehicle_id.into();
        self.request(|reply| DriverMsg::Select { vehicle_id, reply })
            .await
    }

    /// Current state and counters
    pub async fn snapshot(&self) -> Result<SessionSnapshot, LinkError> {
        self.request(|reply| DriverMsg::Snapshot { reply }).await
    }

    /// Dispose the session; the driver's `run` returns afterwards
    pub async fn dispose(&self) -> Result<(), LinkError> {
        self.request(|reply| DriverMsg::Dispose { reply }).await
    }
}

/// Runs a [`TelemetrySession`] against a transport and a presenter
pub struct SessionDriver<T, P> {
    session: TelemetrySession,
    transport: T,
    presenter: P,
    tx: mpsc::UnboundedSender<DriverMsg>,
    rx: mpsc::UnboundedReceiver<DriverMsg>,
    active: Option<(AttemptId, TransportHandle)>,
    timers: Vec<JoinHandle<()>>,
}

impl<T, P> SessionDriver<T, P>
where
    T: Transport,
    P: Presenter,
{
    /// Create a driver; nothing happens until [`run`](Self::run)
    pub fn new(session: TelemetrySession, transport: T, presenter: P) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            transport,
            presenter,
            tx,
            rx,
            active: None,
            timers: Vec::new(),
        }
    }

    /// Handle for queries and disposal
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Start the session and process messages until disposed.
    ///
    /// Returns the disposed session for final inspection.
    pub async fn run(mut self) -> TelemetrySession {
        let commands = self.session.init();
        self.execute(commands);

        while let Some(msg) = self.rx.recv().await {
            match msg {
                DriverMsg::Link(event) => {
                    let commands = self.session.handle(event);
                    self.execute(commands);
                }
                DriverMsg::Select { vehicle_id, reply } => {
                    let _ = reply.send(self.session.select(&vehicle_id));
                }
                DriverMsg::Snapshot { reply } => {
                    let _ = reply.send(self.session.snapshot());
                }
                DriverMsg::Dispose { reply } => {
                    let commands = self.session.dispose();
                    self.execute(commands);
                    if let Some((_, mut handle)) = self.active.take() {
                        handle.abort();
                    }
                    let _ = reply.send(());
                    break;
                }
            }
        }

        info!("Session driver stopped");
        self.session
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Connect { attempt, endpoint } => {
                    let sink = EventSink::new(attempt, self.tx.clone());
                    let handle = self.transport.open(&endpoint, sink);
                    if let Some((previous, mut old)) = self.active.replace((attempt, handle)) {
                        debug!(previous, "replacing transport handle");
                        old.close();
                    }
                }
                Command::CloseTransport { attempt } => {
                    if let Some((active, handle)) = self.active.as_mut() {
                        if *active == attempt {
                            handle.close();
                        }
                    }
                }
                Command::ArmLiveness { attempt, after } => {
                    self.schedule(after, LinkEvent::LivenessElapsed { attempt });
                }
                Command::ScheduleReconnect { attempt, after } => {
                    self.schedule(after, LinkEvent::ReconnectDue { attempt });
                }
                Command::CancelTimers => {
                    for timer in self.timers.drain(..) {
                        timer.abort();
                    }
                }
                Command::Notify(Notification::Status(update)) => {
                    self.presenter.status(&update);
                }
                Command::Notify(Notification::RowAppended { view, row, counts }) => {
                    self.presenter.row_appended(view, &row, counts);
                }
            }
        }
    }

    fn schedule(&mut self, after: Duration, event: LinkEvent) {
        self.timers.retain(|timer| !timer.is_finished());
        let tx = self.tx.clone();
        self.timers.push(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(DriverMsg::Link(event));
        }));
    }
}
