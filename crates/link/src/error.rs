//! Error types for the link crate.
//!
//! Transport failures are not errors here: they arrive as
//! [`TransportEvent`](crate::TransportEvent)s and drive the state machine.

use fleetglass_core::ConfigError;
use thiserror::Error;

/// Errors from session construction and the session handle
#[derive(Debug, Error)]
pub enum LinkError {
    /// Session configuration rejected
    #[error("Invalid session configuration: {0}")]
    Config(#[from] ConfigError),

    /// The driver task has stopped
    #[error("Session driver is no longer running")]
    DriverStopped,

    /// Detail could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
