//! Connection states, inbound events and outbound commands.

use fleetglass_core::{Classification, StatusUpdate};
use fleetglass_feeds::ViewCounts;
use fleetglass_stream::ViewRow;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation number of a connection attempt.
///
/// Incremented by every `connect()`; `0` means no attempt has been made.
pub type AttemptId = u64;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Constructed, `init()` not yet called
    Idle,
    /// Transport requested, not yet open
    Connecting,
    /// Transport open
    Open,
    /// Transport closed, reconnect scheduled
    Closed,
    /// Transport reported an error; a close is expected to follow
    Errored,
    /// `dispose()` called; every further event is ignored
    Disposed,
}

impl ConnectionState {
    /// Whether a transport for the current attempt may still be alive
    pub fn has_live_transport(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Open | ConnectionState::Errored
        )
    }
}

/// Event raised by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed
    Opened,
    /// Text payload received
    Message(String),
    /// Transport-level failure
    Error(String),
    /// Transport closed, for any reason
    Closed,
}

/// Event consumed by the session reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Transport event tagged with the attempt that produced it
    Transport {
        /// Attempt the transport belongs to
        attempt: AttemptId,
        /// What happened
        event: TransportEvent,
    },
    /// Liveness timer armed on open has fired
    LivenessElapsed {
        /// Attempt that armed the timer
        attempt: AttemptId,
    },
    /// Reconnect timer scheduled on close has fired
    ReconnectDue {
        /// Attempt whose close scheduled the timer
        attempt: AttemptId,
    },
}

/// Update for the presentation surface
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Status signal
    Status(StatusUpdate),
    /// A row was inserted at the head of a view
    RowAppended {
        /// View the row went to
        view: Classification,
        /// The inserted row
        row: ViewRow,
        /// Counts after insertion and eviction
        counts: ViewCounts,
    },
}

/// Side effect requested by the session reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a new transport
    Connect {
        /// Generation of the new attempt
        attempt: AttemptId,
        /// Endpoint to open
        endpoint: String,
    },
    /// Close the transport of an attempt
    CloseTransport {
        /// Attempt whose transport should close
        attempt: AttemptId,
    },
    /// Deliver [`LinkEvent::LivenessElapsed`] after `after`
    ArmLiveness {
        /// Attempt that opened
        attempt: AttemptId,
        /// Liveness window
        after: Duration,
    },
    /// Deliver [`LinkEvent::ReconnectDue`] after `after`
    ScheduleReconnect {
        /// Attempt that closed
        attempt: AttemptId,
        /// Retry delay
        after: Duration,
    },
    /// Abort every pending timer
    CancelTimers,
    /// Forward to the presentation surface
    Notify(Notification),
}

impl Command {
    /// Status update carried by this command, if any
    pub fn status(&self) -> Option<&StatusUpdate> {
        match self {
            Command::Notify(Notification::Status(update)) => Some(update),
            _ => None,
        }
    }
}
