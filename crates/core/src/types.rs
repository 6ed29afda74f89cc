//! Core types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which view a telemetry row is routed to.
///
/// Decided once at ingestion from the upstream anomaly flag and never
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Regular telemetry
    Normal,
    /// Telemetry flagged anomalous upstream
    Anomaly,
}

impl Classification {
    /// Both classifications, normal first
    pub const ALL: [Classification; 2] = [Classification::Normal, Classification::Anomaly];

    /// Classification for an upstream anomaly flag
    pub fn from_flag(anomaly: bool) -> Self {
        if anomaly {
            Classification::Anomaly
        } else {
            Classification::Normal
        }
    }

    /// Stable label for logs and region names
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Normal => "normal",
            Classification::Anomaly => "anomaly",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
