//! Core functionality shared across the FleetGlass telemetry client.
//!
//! This crate provides the session constants, the status signal consumed by
//! the presentation surface, the record classification, error types and the
//! logging bootstrap used by every other FleetGlass crate.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod status;
pub mod types;

pub use config::{
    CacheRetention, SessionConfig, DEFAULT_ENDPOINT, DEFAULT_LIVENESS_TIMEOUT_MS, DEFAULT_MAX_ROWS,
    DEFAULT_PREVIEW_CHARS, DEFAULT_RECONNECT_DELAY_MS,
};
pub use error::ConfigError;
pub use status::{StatusSeverity, StatusUpdate};
pub use types::Classification;
