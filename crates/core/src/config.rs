//! Session configuration for FleetGlass.
//!
//! The dashboard runs with fixed parameters: [`SessionConfig::default`] is
//! the only configuration the console binary uses. Other values exist so
//! tests and embedders can shrink windows and capacities.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Telemetry stream endpoint
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8082/ws/telemetry";

/// Rows kept per view
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Delay between a close and the next connection attempt
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5000;

/// Silence window after open before the no-data warning
pub const DEFAULT_LIVENESS_TIMEOUT_MS: u64 = 5000;

/// Characters of an unparseable payload kept in its diagnostic row
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Retention policy for the vehicle detail cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode", content = "limit")]
pub enum CacheRetention {
    /// Keep every vehicle for the lifetime of the session
    #[default]
    Unbounded,
    /// Keep at most this many vehicles, dropping the least recently written
    MaxEntries(usize),
}

/// Parameters of one dashboard session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// WebSocket endpoint of the telemetry stream
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Capacity of each classification view
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Fixed reconnect delay in milliseconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Liveness window in milliseconds
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_ms: u64,
    /// Preview length for diagnostic rows
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Detail cache retention
    #[serde(default)]
    pub cache_retention: CacheRetention,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_reconnect_delay() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

fn default_liveness_timeout() -> u64 {
    DEFAULT_LIVENESS_TIMEOUT_MS
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_rows: default_max_rows(),
            reconnect_delay_ms: default_reconnect_delay(),
            liveness_timeout_ms: default_liveness_timeout(),
            preview_chars: default_preview_chars(),
            cache_retention: CacheRetention::default(),
        }
    }
}

impl SessionConfig {
    /// Reconnect delay as a [`Duration`]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Liveness window as a [`Duration`]
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.liveness_timeout_ms)
    }

    /// Check the configuration for values the session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
            });
        }
        if self.max_rows == 0 {
            return Err(ConfigError::ZeroCapacity { field: "max_rows" });
        }
        if self.cache_retention == CacheRetention::MaxEntries(0) {
            return Err(ConfigError::ZeroCapacity {
                field: "cache_retention",
            });
        }
        Ok(())
    }
}
