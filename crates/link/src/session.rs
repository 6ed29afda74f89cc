//! Telemetry session: connection state machine plus ingestion pipeline.
//!
//! All session state lives here and is only mutated by [`TelemetrySession::init`],
//! [`TelemetrySession::handle`] and [`TelemetrySession::dispose`]. Each call
//! returns the [`Command`]s the caller must execute; the session itself never
//! touches sockets or timers.

use crate::error::LinkError;
use crate::retry::{FixedDelay, RetryPolicy};
use crate::state::{AttemptId, Command, ConnectionState, LinkEvent, Notification, TransportEvent};
use fleetglass_core::{SessionConfig, StatusUpdate};
use fleetglass_feeds::ViewCounts;
use fleetglass_stream::{IngestOutcome, PipelineMetrics, RawRecord, TelemetryPipeline, VehicleId};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Detail pane content for a selected vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDetail {
    /// Selected vehicle
    pub vehicle_id: VehicleId,
    /// Latest raw record received for it
    pub record: RawRecord,
}

impl VehicleDetail {
    /// Raw record as indented JSON
    pub fn to_pretty_json(&self) -> Result<String, LinkError> {
        Ok(serde_json::to_string_pretty(&self.record)?)
    }
}

/// Point-in-time view of session state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Connection state
    pub state: ConnectionState,
    /// Current attempt generation
    pub attempt: AttemptId,
    /// Messages received over the whole session
    pub messages_received: u64,
    /// Rows per view
    pub counts: ViewCounts,
    /// Vehicles in the detail cache
    pub cached_vehicles: usize,
    /// Pipeline counters
    pub metrics: PipelineMetrics,
}

/// One dashboard session
#[derive(Debug)]
pub struct TelemetrySession {
    config: SessionConfig,
    state: ConnectionState,
    attempt: AttemptId,
    /// Monotonic over the session
    messages_received: u64,
    /// Reset on every open; drives the liveness check
    messages_this_attempt: u64,
    /// Closes since the transport was last open
    consecutive_closes: u32,
    /// Attempt whose reconnect timer is the one to honour
    pending_reconnect: Option<AttemptId>,
    pipeline: TelemetryPipeline,
    retry: Box<dyn RetryPolicy>,
}

impl TelemetrySession {
    /// Create a session with the fixed reconnect delay from `config`
    pub fn new(config: SessionConfig) -> Result<Self, LinkError> {
        let retry = FixedDelay::new(config.reconnect_delay());
        Self::with_retry_policy(config, Box::new(retry))
    }

    /// Create a session with a custom reconnect strategy
    pub fn with_retry_policy(
        config: SessionConfig,
        retry: Box<dyn RetryPolicy>,
    ) -> Result<Self, LinkError> {
        config.validate()?;
        Ok(Self {
            pipeline: TelemetryPipeline::from_config(&config),
            config,
            state: ConnectionState::Idle,
            attempt: 0,
            messages_received: 0,
            messages_this_attempt: 0,
            consecutive_closes: 0,
            pending_reconnect: None,
            retry,
        })
    }

    /// Start the session. Only valid from [`ConnectionState::Idle`].
    pub fn init(&mut self) -> Vec<Command> {
        if self.state != ConnectionState::Idle {
            warn!(state = ?self.state, "init called on a started session");
            return Vec::new();
        }
        self.connect()
    }

    /// Begin a new connection attempt.
    ///
    /// Safe to call in any state except [`ConnectionState::Disposed`]; a
    /// transport still alive for the previous attempt is closed first.
    pub fn connect(&mut self) -> Vec<Command> {
        if self.state == ConnectionState::Disposed {
            warn!("connect called on a disposed session");
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(3);
        if self.state.has_live_transport() {
            commands.push(Command::CloseTransport {
                attempt: self.attempt,
            });
        }

        self.attempt += 1;
        self.state = ConnectionState::Connecting;
        self.messages_this_attempt = 0;
        self.pending_reconnect = None;

        info!(
            attempt = self.attempt,
            endpoint = %self.config.endpoint,
            "Connecting to telemetry stream"
        );
        commands.push(status(StatusUpdate::connecting(&self.config.endpoint)));
        commands.push(Command::Connect {
            attempt: self.attempt,
            endpoint: self.config.endpoint.clone(),
        });
        commands
    }

    /// Stop the session: close the transport and cancel every timer
    pub fn dispose(&mut self) -> Vec<Command> {
        if self.state == ConnectionState::Disposed {
            return Vec::new();
        }

        let mut commands = vec![Command::CancelTimers];
        if self.state.has_live_transport() {
            commands.push(Command::CloseTransport {
                attempt: self.attempt,
            });
        }
        self.state = ConnectionState::Disposed;
        self.pending_reconnect = None;

        info!(
            messages_received = self.messages_received,
            "Telemetry session disposed"
        );
        commands
    }

    /// Reduce one event into commands
    pub fn handle(&mut self, event: LinkEvent) -> Vec<Command> {
        if self.state == ConnectionState::Disposed {
            debug!(?event, "event after dispose ignored");
            return Vec::new();
        }

        match event {
            LinkEvent::Transport { attempt, event } => {
                if attempt != self.attempt {
                    debug!(attempt, current = self.attempt, "stale transport event ignored");
                    return Vec::new();
                }
                self.on_transport(event)
            }
            LinkEvent::LivenessElapsed { attempt } => self.on_liveness(attempt),
            LinkEvent::ReconnectDue { attempt } => self.on_reconnect_due(attempt),
        }
    }

    fn on_transport(&mut self, event: TransportEvent) -> Vec<Command> {
        match event {
            TransportEvent::Opened => self.on_open(),
            TransportEvent::Message(payload) => self.on_message(&payload),
            TransportEvent::Error(detail) => self.on_error(&detail),
            TransportEvent::Closed => self.on_close(),
        }
    }

    fn on_open(&mut self) -> Vec<Command> {
        self.state = ConnectionState::Open;
        self.consecutive_closes = 0;
        self.messages_this_attempt = 0;

        info!(attempt = self.attempt, "Telemetry stream connected");
        vec![
            status(StatusUpdate::connected()),
            Command::ArmLiveness {
                attempt: self.attempt,
                after: self.config.liveness_timeout(),
            },
        ]
    }

    fn on_message(&mut self, payload: &str) -> Vec<Command> {
        self.messages_received += 1;
        self.messages_this_attempt += 1;
        debug!(
            message = self.messages_received,
            bytes = payload.len(),
            "telemetry message received"
        );

        let outcome = self.pipeline.ingest(payload);
        let view = outcome.classification();
        let mut commands = Vec::with_capacity(2);

        if let Some(row) = self.pipeline.views().head(view) {
            commands.push(Command::Notify(Notification::RowAppended {
                view,
                row: row.clone(),
                counts: self.pipeline.counts(),
            }));
        }

        commands.push(match outcome {
            IngestOutcome::Routed { .. } => status(StatusUpdate::receiving()),
            IngestOutcome::Diagnostic { error } => {
                status(StatusUpdate::parse_error(&error.to_string()))
            }
        });
        commands
    }

    fn on_error(&mut self, detail: &str) -> Vec<Command> {
        error!(attempt = self.attempt, error = %detail, "Telemetry transport error");
        self.state = ConnectionState::Errored;
        vec![status(StatusUpdate::transport_error(detail))]
    }

    fn on_close(&mut self) -> Vec<Command> {
        if self.state == ConnectionState::Closed {
            debug!(attempt = self.attempt, "duplicate close ignored");
            return Vec::new();
        }

        self.state = ConnectionState::Closed;
        self.consecutive_closes = self.consecutive_closes.saturating_add(1);
        self.pending_reconnect = Some(self.attempt);
        let delay = self.retry.next_delay(self.consecutive_closes);

        warn!(
            attempt = self.attempt,
            retry_in_ms = delay.as_millis() as u64,
            "Telemetry stream disconnected, reconnect scheduled"
        );
        vec![
            status(StatusUpdate::disconnected()),
            Command::ScheduleReconnect {
                attempt: self.attempt,
                after: delay,
            },
        ]
    }

    fn on_liveness(&mut self, attempt: AttemptId) -> Vec<Command> {
        if attempt != self.attempt || !self.state.has_live_transport() {
            debug!(attempt, current = self.attempt, "stale liveness timer ignored");
            return Vec::new();
        }
        if self.messages_this_attempt > 0 {
            return Vec::new();
        }

        warn!(
            attempt,
            timeout_ms = self.config.liveness_timeout_ms,
            "No telemetry received since connecting"
        );
        vec![status(StatusUpdate::no_data())]
    }

    fn on_reconnect_due(&mut self, attempt: AttemptId) -> Vec<Command> {
        if self.pending_reconnect != Some(attempt) || self.state != ConnectionState::Closed {
            debug!(attempt, current = self.attempt, "superseded reconnect timer ignored");
            return Vec::new();
        }
        self.connect()
    }

    /// Detail pane content for `vehicle_id`
    pub fn select(&self, vehicle_id: &VehicleId) -> Option<VehicleDetail> {
        self.pipeline.detail(vehicle_id).map(|record| VehicleDetail {
            vehicle_id: vehicle_id.clone(),
            record: record.clone(),
        })
    }

    /// Current state and counters
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            attempt: self.attempt,
            messages_received: self.messages_received,
            counts: self.pipeline.counts(),
            cached_vehicles: self.pipeline.details().len(),
            metrics: self.pipeline.metrics(),
        }
    }

    /// Connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Current attempt generation
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Messages received over the whole session
    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    /// Ingestion pipeline
    pub fn pipeline(&self) -> &TelemetryPipeline {
        &self.pipeline
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

fn status(update: StatusUpdate) -> Command {
    Command::Notify(Notification::Status(update))
}
