//! Core error types

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint is not a WebSocket URL
    #[error("Invalid endpoint {endpoint}: expected ws:// or wss:// scheme")]
    InvalidEndpoint {
        /// Offending endpoint
        endpoint: String,
    },

    /// A capacity that must be positive was zero
    #[error("Invalid configuration: {field} must be greater than zero")]
    ZeroCapacity {
        /// Name of the offending field
        field: &'static str,
    },
}
