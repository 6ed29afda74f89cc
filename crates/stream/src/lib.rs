//! FleetGlass Stream
//!
//! Turns raw telemetry payloads into renderable rows: parse, normalize
//! heterogeneous field names, route by the upstream anomaly flag, and
//! store into the bounded views and the vehicle detail cache.

#![warn(missing_docs)]

pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod record;
pub mod router;

pub use error::{StreamError, StreamResult};
pub use normalizer::normalize;
pub use pipeline::{IngestOutcome, PipelineMetrics, TelemetryPipeline};
pub use record::{NormalizedRecord, RawRecord, RowContent, VehicleId, ViewRow};
pub use router::{classify, route};
