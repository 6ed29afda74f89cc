//! Record normalizer.
//!
//! Producers disagree on field names (`vehicleId` vs `vehicle_id`, `temp`
//! vs `temperature`, ...). Each canonical field is resolved through a fixed
//! alias list; the first alias holding a non-null value wins and later
//! aliases are ignored.

use crate::record::{NormalizedRecord, RawRecord, VehicleId};
use serde_json::Value;

/// Aliases for the vehicle identifier, in priority order
pub const VEHICLE_ID_ALIASES: &[&str] = &["vehicleId", "vehicle_id", "id", "vehicle"];
/// Aliases for speed
pub const SPEED_ALIASES: &[&str] = &["speed", "speed_kmh", "speed_km"];
/// Aliases for acceleration
pub const ACCELERATION_ALIASES: &[&str] = &["acceleration", "accel"];
/// Aliases for battery level
pub const BATTERY_ALIASES: &[&str] = &["battery", "battery_level", "batteryLevel"];
/// Aliases for temperature
pub const TEMPERATURE_ALIASES: &[&str] = &["temperature", "temp", "temp_c", "tempC"];
/// Aliases for traffic level
pub const TRAFFIC_LEVEL_ALIASES: &[&str] = &["trafficLevel", "traffic_level", "traffic"];
/// Aliases for the anomaly flag
pub const ANOMALY_ALIASES: &[&str] = &["anomaly"];
/// Aliases for the anomaly label
pub const ANOMALY_TYPE_ALIASES: &[&str] = &["anomalyType", "anomaly_type"];

/// First non-null value among `aliases`
pub fn resolve<'a>(raw: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| raw.get(*alias))
        .find(|value| !value.is_null())
}

fn resolve_owned(raw: &RawRecord, aliases: &[&str]) -> Option<Value> {
    resolve(raw, aliases).cloned()
}

/// Identifier text for a resolved vehicle id value.
///
/// Strings are taken verbatim; any other JSON value uses its compact text.
fn vehicle_id_of(value: &Value) -> VehicleId {
    match value {
        Value::String(id) => VehicleId::new(id.as_str()),
        other => VehicleId::new(other.to_string()),
    }
}

/// Truthiness of an anomaly flag value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Normalize a raw record. Never fails.
pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    NormalizedRecord {
        vehicle_id: resolve(raw, VEHICLE_ID_ALIASES).map(vehicle_id_of),
        speed: resolve_owned(raw, SPEED_ALIASES),
        acceleration: resolve_owned(raw, ACCELERATION_ALIASES),
        battery: resolve_owned(raw, BATTERY_ALIASES),
        temperature: resolve_owned(raw, TEMPERATURE_ALIASES),
        traffic_level: resolve_owned(raw, TRAFFIC_LEVEL_ALIASES),
        anomaly: resolve(raw, ANOMALY_ALIASES).is_some_and(is_truthy),
        anomaly_type: resolve_owned(raw, ANOMALY_TYPE_ALIASES),
    }
}
