//! Telemetry record types

use chrono::{DateTime, Utc};
use fleetglass_core::Classification;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Untrusted field map exactly as received from the producer
pub type RawRecord = Map<String, Value>;

/// Vehicle identifier.
///
/// A record without any identifier carries `None` rather than a sentinel
/// string, so `"0"`, `""` and `"-"` are all ordinary identifiers.
///
/// Non-string ids are stored as their JSON text, so the number `7` and the
/// string `"7"` name the same vehicle and share one detail cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canonical telemetry record.
///
/// Measurement fields keep the producer's JSON value untouched; a string
/// where a number was expected is the display layer's concern.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Vehicle identifier, `None` when no alias was present
    pub vehicle_id: Option<VehicleId>,
    /// Speed
    pub speed: Option<Value>,
    /// Acceleration
    pub acceleration: Option<Value>,
    /// Battery level
    pub battery: Option<Value>,
    /// Temperature
    pub temperature: Option<Value>,
    /// Traffic level
    pub traffic_level: Option<Value>,
    /// Upstream anomaly flag
    pub anomaly: bool,
    /// Upstream anomaly label
    pub anomaly_type: Option<Value>,
}

impl NormalizedRecord {
    /// View this record belongs to
    pub fn classification(&self) -> Classification {
        Classification::from_flag(self.anomaly)
    }

    /// Speed when the producer sent a number
    pub fn speed_f64(&self) -> Option<f64> {
        self.speed.as_ref().and_then(Value::as_f64)
    }

    /// Battery level when the producer sent a number
    pub fn battery_f64(&self) -> Option<f64> {
        self.battery.as_ref().and_then(Value::as_f64)
    }

    /// Temperature when the producer sent a number
    pub fn temperature_f64(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(Value::as_f64)
    }
}

/// Body of a view row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowContent {
    /// A normalized telemetry record
    Record(NormalizedRecord),
    /// A payload that could not be parsed
    Diagnostic {
        /// Leading characters of the raw payload
        preview: String,
        /// Parse failure message
        error: String,
    },
}

/// A row in one of the two views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// View the row was inserted into
    pub classification: Classification,
    /// Insertion time, for display only
    pub inserted_at: DateTime<Utc>,
    /// Row body
    pub content: RowContent,
}

impl ViewRow {
    /// Row for a normalized record, classified by its anomaly flag
    pub fn record(record: NormalizedRecord) -> Self {
        Self {
            classification: record.classification(),
            inserted_at: Utc::now(),
            content: RowContent::Record(record),
        }
    }

    /// Diagnostic row for an unparseable payload; always normal
    pub fn diagnostic(preview: String, error: String) -> Self {
        Self {
            classification: Classification::Normal,
            inserted_at: Utc::now(),
            content: RowContent::Diagnostic { preview, error },
        }
    }

    /// Vehicle this row selects in the detail pane
    pub fn vehicle_id(&self) -> Option<&VehicleId> {
        match &self.content {
            RowContent::Record(record) => record.vehicle_id.as_ref(),
            RowContent::Diagnostic { .. } => None,
        }
    }

    /// Whether this row reports a parse failure
    pub fn is_diagnostic(&self) -> bool {
        matches!(self.content, RowContent::Diagnostic { .. })
    }
}
