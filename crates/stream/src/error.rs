//! Error types for FleetGlass stream operations.

use thiserror::Error;

/// Errors raised while turning a payload into a telemetry record.
///
/// None of these escape the pipeline: each becomes a diagnostic row.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Payload is not valid JSON
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object
    #[error("expected a JSON object, got {found}")]
    NotAnObject {
        /// JSON kind that was received
        found: &'static str,
    },
}

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
