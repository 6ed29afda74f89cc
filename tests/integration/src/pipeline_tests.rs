//! Pipeline tests - mixed producer schemas through parse, normalize, route

use crate::test_utils::{camel_record, snake_record};
use fleetglass_core::{CacheRetention, Classification, SessionConfig};
use fleetglass_stream::{RowContent, TelemetryPipeline, VehicleId};
use proptest::prelude::*;
use serde_json::{json, Value};

fn pipeline() -> TelemetryPipeline {
    TelemetryPipeline::from_config(&SessionConfig::default())
}

#[test]
fn test_camel_and_snake_producers_normalize_alike() {
    let mut pipeline = pipeline();
    pipeline.ingest(&camel_record("veh-camel", false).to_string());
    pipeline.ingest(&snake_record("veh-snake", false).to_string());

    let rows: Vec<_> = pipeline.views().rows(Classification::Normal).collect();
    assert_eq!(rows.len(), 2);

    let RowContent::Record(snake) = &rows[0].content else {
        panic!("expected record row");
    };
    assert_eq!(snake.vehicle_id, Some(VehicleId::from("veh-snake")));
    assert_eq!(snake.speed, Some(json!(41.0)));
    assert_eq!(snake.battery, Some(json!(67)));
    assert_eq!(snake.temperature, Some(json!(19.0)));

    let RowContent::Record(camel) = &rows[1].content else {
        panic!("expected record row");
    };
    assert_eq!(camel.vehicle_id, Some(VehicleId::from("veh-camel")));
    assert_eq!(camel.traffic_level, Some(json!(3)));
    assert_eq!(camel.anomaly_type, None);
}

#[test]
fn test_hundred_and_one_records_keep_latest_hundred_newest_first() {
    let mut pipeline = pipeline();
    for i in 0..101 {
        pipeline.ingest(&camel_record(&format!("veh-{i}"), false).to_string());
    }

    let ids: Vec<String> = pipeline
        .views()
        .rows(Classification::Normal)
        .map(|row| row.vehicle_id().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (1..101).rev().map(|i| format!("veh-{i}")).collect();

    assert_eq!(ids, expected);
    assert_eq!(pipeline.counts().anomaly, 0);
}

#[test]
fn test_record_without_any_id_alias_leaves_cache_unchanged() {
    let mut pipeline = pipeline();
    pipeline.ingest(&camel_record("veh-1", false).to_string());
    let before = pipeline.details().len();

    pipeline.ingest(r#"{"speed": 12, "battery": 50, "anomaly": true}"#);

    assert_eq!(pipeline.details().len(), before);
    assert_eq!(pipeline.counts().anomaly, 1);
}

#[test]
fn test_detail_returns_latest_payload_across_views() {
    let mut pipeline = pipeline();
    let first = camel_record("veh-7", false);
    let second = snake_record("veh-7", true);
    pipeline.ingest(&first.to_string());
    pipeline.ingest(&second.to_string());

    let detail = pipeline.detail(&VehicleId::from("veh-7")).unwrap();
    assert_eq!(Value::Object(detail.clone()), second);
}

#[test]
fn test_non_json_payload_adds_one_normal_row_only() {
    let mut pipeline = pipeline();
    pipeline.ingest(&camel_record("veh-1", true).to_string());
    let before = pipeline.counts();

    pipeline.ingest("<html>502 Bad Gateway</html>");

    let after = pipeline.counts();
    assert_eq!(after.normal, before.normal + 1);
    assert_eq!(after.anomaly, before.anomaly);
    assert_eq!(pipeline.metrics().parse_failures, 1);
}

#[test]
fn test_bounded_cache_retention_through_pipeline() {
    let mut pipeline = TelemetryPipeline::new(100, 100, CacheRetention::MaxEntries(3));
    for i in 0..10 {
        pipeline.ingest(&camel_record(&format!("veh-{i}"), false).to_string());
    }

    assert_eq!(pipeline.details().len(), 3);
    assert!(pipeline.detail(&VehicleId::from("veh-9")).is_some());
    assert!(pipeline.detail(&VehicleId::from("veh-0")).is_none());
}

proptest! {
    #[test]
    fn views_never_exceed_capacity_for_any_payload_mix(
        payloads in prop::collection::vec(
            prop_oneof![
                Just(r#"{"vehicleId":"a","anomaly":true}"#.to_string()),
                Just(r#"{"vehicleId":"b"}"#.to_string()),
                ".{0,40}",
            ],
            0..300
        )
    ) {
        let mut pipeline = TelemetryPipeline::new(25, 100, CacheRetention::Unbounded);
        for payload in &payloads {
            pipeline.ingest(payload);
            let counts = pipeline.counts();
            prop_assert!(counts.normal <= 25);
            prop_assert!(counts.anomaly <= 25);
        }
        prop_assert_eq!(pipeline.metrics().total_payloads, payloads.len() as u64);
    }
}
