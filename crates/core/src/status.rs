//! Status signal for the presentation surface.
//!
//! Every connection transition and pipeline failure is reported as a
//! [`StatusUpdate`]. The message text is a default English rendering; a
//! presentation layer is free to localize from the severity alone.

use serde::{Deserialize, Serialize};

/// Severity of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSeverity {
    /// Transport open and healthy
    Connected,
    /// Transport closed, reconnect pending
    Disconnected,
    /// Advisory condition (e.g. connected but silent)
    Warning,
    /// Transport or parse failure
    Error,
    /// Informational
    Info,
}

/// A status signal emitted to the presentation surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Severity
    pub severity: StatusSeverity,
    /// Free-text message
    pub message: String,
}

impl StatusUpdate {
    /// Build a status update
    pub fn new(severity: StatusSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Connection attempt started
    pub fn connecting(endpoint: &str) -> Self {
        Self::new(StatusSeverity::Info, format!("Connecting to {endpoint}..."))
    }

    /// Transport opened
    pub fn connected() -> Self {
        Self::new(StatusSeverity::Connected, "Connected to telemetry stream")
    }

    /// A message was processed on an open transport
    pub fn receiving() -> Self {
        Self::new(StatusSeverity::Connected, "Connected")
    }

    /// Transport closed
    pub fn disconnected() -> Self {
        Self::new(
            StatusSeverity::Disconnected,
            "Disconnected. Attempting to reconnect...",
        )
    }

    /// Open for the liveness window without any message
    pub fn no_data() -> Self {
        Self::new(
            StatusSeverity::Warning,
            "Connected but no data yet. Checking server...",
        )
    }

    /// Transport error
    pub fn transport_error(detail: &str) -> Self {
        Self::new(StatusSeverity::Error, format!("WebSocket error: {detail}"))
    }

    /// Payload could not be parsed
    pub fn parse_error(detail: &str) -> Self {
        Self::new(
            StatusSeverity::Error,
            format!("Error processing message: {detail}"),
        )
    }
}
