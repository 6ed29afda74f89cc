//! Ingestion pipeline.
//!
//! `payload text -> parse -> normalize -> route -> view store`. A payload
//! that fails to parse becomes a diagnostic row in the normal view instead
//! of an error; nothing here can abort the session.

use crate::error::{StreamError, StreamResult};
use crate::normalizer::normalize;
use crate::record::{RawRecord, VehicleId, ViewRow};
use crate::router::route;
use fleetglass_core::{CacheRetention, Classification, SessionConfig};
use fleetglass_feeds::{DetailCache, ViewCounts, ViewStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Result of ingesting one payload
#[derive(Debug)]
pub enum IngestOutcome {
    /// Payload parsed and routed
    Routed {
        /// View the row went to
        classification: Classification,
        /// Vehicle id, if the record carried one
        vehicle_id: Option<VehicleId>,
    },
    /// Payload rejected; a diagnostic row was inserted into the normal view
    Diagnostic {
        /// Why the payload was rejected
        error: StreamError,
    },
}

impl IngestOutcome {
    /// View the resulting row was inserted into
    pub fn classification(&self) -> Classification {
        match self {
            IngestOutcome::Routed { classification, .. } => *classification,
            IngestOutcome::Diagnostic { .. } => Classification::Normal,
        }
    }
}

/// Counters for the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    /// Payloads ingested
    pub total_payloads: u64,
    /// Payloads routed to the normal view
    pub normal_routed: u64,
    /// Payloads routed to the anomaly view
    pub anomaly_routed: u64,
    /// Payloads rejected as unparseable
    pub parse_failures: u64,
    /// Rows evicted from either view
    pub evictions: u64,
}

/// Parse one payload into a raw record
pub fn parse(payload: &str) -> StreamResult<RawRecord> {
    match serde_json::from_str::<Value>(payload)? {
        Value::Object(map) => Ok(map),
        other => Err(StreamError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Leading `max_chars` characters of `payload`
pub fn preview(payload: &str, max_chars: usize) -> String {
    payload.chars().take(max_chars).collect()
}

/// Owns the two views and the detail cache for one session
#[derive(Debug, Clone)]
pub struct TelemetryPipeline {
    views: ViewStore<ViewRow>,
    details: DetailCache<VehicleId, RawRecord>,
    preview_chars: usize,
    metrics: PipelineMetrics,
}

impl TelemetryPipeline {
    /// Create an empty pipeline
    pub fn new(max_rows: usize, preview_chars: usize, retention: CacheRetention) -> Self {
        Self {
            views: ViewStore::new(max_rows),
            details: DetailCache::new(retention),
            preview_chars,
            metrics: PipelineMetrics::default(),
        }
    }

    /// Create a pipeline sized from a session configuration
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.max_rows,
            config.preview_chars,
            config.cache_retention,
        )
    }

    /// Ingest one text payload
    pub fn ingest(&mut self, payload: &str) -> IngestOutcome {
        self.metrics.total_payloads += 1;

        let raw = match parse(payload) {
            Ok(raw) => raw,
            Err(error) => {
                let preview = preview(payload, self.preview_chars);
                warn!(%error, preview = %preview, "unparseable telemetry payload");
                self.metrics.parse_failures += 1;
                self.insert(ViewRow::diagnostic(preview, error.to_string()));
                return IngestOutcome::Diagnostic { error };
            }
        };

        let record = normalize(&raw);
        let classification = route(&record, &raw, &mut self.details);
        let vehicle_id = record.vehicle_id.clone();
        match classification {
            Classification::Normal => self.metrics.normal_routed += 1,
            Classification::Anomaly => self.metrics.anomaly_routed += 1,
        }
        debug!(
            vehicle_id = vehicle_id.as_ref().map(VehicleId::as_str).unwrap_or("-"),
            view = %classification,
            "telemetry routed"
        );
        self.insert(ViewRow::record(record));

        IngestOutcome::Routed {
            classification,
            vehicle_id,
        }
    }

    fn insert(&mut self, row: ViewRow) {
        if self.views.push(row.classification, row).is_some() {
            self.metrics.evictions += 1;
        }
    }

    /// Latest raw record for a vehicle
    pub fn detail(&self, vehicle_id: &VehicleId) -> Option<&RawRecord> {
        self.details.get(vehicle_id)
    }

    /// Bounded views
    pub fn views(&self) -> &ViewStore<ViewRow> {
        &self.views
    }

    /// Detail cache
    pub fn details(&self) -> &DetailCache<VehicleId, RawRecord> {
        &self.details
    }

    /// Live row counts
    pub fn counts(&self) -> ViewCounts {
        self.views.counts()
    }

    /// Pipeline counters
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics
    }
}
