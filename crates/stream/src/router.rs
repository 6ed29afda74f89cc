//! Classification router.
//!
//! The anomaly flag is decided upstream; routing only forwards it.

use crate::record::{NormalizedRecord, RawRecord, VehicleId};
use fleetglass_core::Classification;
use fleetglass_feeds::DetailCache;
use tracing::trace;

/// Target view for a record, from its anomaly flag alone
pub fn classify(record: &NormalizedRecord) -> Classification {
    record.classification()
}

/// Select the target view and refresh the detail cache.
///
/// When the record carries a vehicle id, `raw` (not the normalized record)
/// replaces whatever the cache held for that vehicle, keeping fields the
/// normalizer does not know about.
pub fn route(
    record: &NormalizedRecord,
    raw: &RawRecord,
    details: &mut DetailCache<VehicleId, RawRecord>,
) -> Classification {
    if let Some(id) = &record.vehicle_id {
        details.upsert(id.clone(), raw.clone());
        trace!(vehicle_id = %id, "detail cache updated");
    }
    classify(record)
}
