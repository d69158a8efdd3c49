//! End-to-end report tests against the in-memory API.

mod common;

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{device, product, validation, FakeApi, DC_EAST, DC_WEST};
use conch_shell::report::failure::{failure_report, FailureOptions};
use conch_shell::report::health_summary::health_summary;
use conch_shell::report::mbo::{load_batch_file, mbo_hardware_failure};
use conch_shell::report::render::render_csv;
use conch_shell::report::AggregateOptions;

fn fleet() -> FakeApi {
    let dell = product("Compute-Platform-3301", "HA-3301", Some("Dell"));
    let dell_id = dell.id;

    let mut validation_states = BTreeMap::new();
    validation_states.insert(
        "S2".to_string(),
        vec![validation(
            "S2",
            &[
                ("RAM", Some("DIMM-A1"), "fail"),
                ("CPU", None, "pass"),
                ("sas_hdd_num", None, "fail"),
            ],
        )],
    );

    FakeApi {
        devices: vec![
            device("S1", "PASS", Some(("east", DC_EAST)), "R1", Some(dell_id)),
            device("S2", "FAIL", Some(("east", DC_EAST)), "R1", Some(dell_id)),
            device("S3", "FAIL", Some(("west", DC_WEST)), "R2", None),
            device("S4", "UNKNOWN", None, "", None),
        ],
        products: vec![dell],
        validation: validation_states,
        ..Default::default()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

#[tokio::test]
async fn health_summary_counts_per_datacenter() {
    let api = fleet();
    let report = health_summary(&api, Uuid::new_v4(), AggregateOptions::default()).await.unwrap();
    let value = to_json(&report);

    assert_eq!(value["east"]["summary"], json!({"FAIL": 1, "PASS": 1}));
    assert_eq!(value["west"]["summary"], json!({"FAIL": 1}));
    assert_eq!(value["UNKNOWN"]["summary"], json!({"UNKNOWN": 1}));
    assert!(value["east"].get("racks").is_none());
}

#[tokio::test]
async fn health_summary_breakout_and_datacenter_filter() {
    let api = fleet();
    let options = AggregateOptions {
        breakout: true,
        datacenter: Some(DC_EAST.parse().unwrap()),
        ..Default::default()
    };
    let report = health_summary(&api, Uuid::new_v4(), options).await.unwrap();
    let value = to_json(&report);

    let names: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["east"]);
    assert_eq!(value["east"]["racks"]["R1"]["summary"], json!({"FAIL": 1, "PASS": 1}));
    assert_eq!(value["east"]["racks"]["R1"]["rack"]["role"], "compute");
}

#[tokio::test]
async fn failure_report_only_queries_failing_devices() {
    let api = fleet();
    let report = failure_report(&api, Uuid::new_v4(), &FailureOptions::default()).await.unwrap();
    let value = to_json(&report);

    assert_eq!(
        value["east"]["summary"],
        json!({
            "RAM": {"count": 1, "platforms": {"HA-3301": 1}},
            "component_count": {"count": 1, "platforms": {"HA-3301": 1}}
        })
    );
    assert_eq!(value["west"]["summary"], json!({"UNKNOWN": 1}));

    let lookups: Vec<String> = api.calls().into_iter().filter(|c| c.starts_with("validation")).collect();
    assert_eq!(lookups, vec!["validation S2", "validation S3"]);
}

#[tokio::test]
async fn failure_report_full_breakdown() {
    let api = fleet();
    let options = FailureOptions {
        aggregate: AggregateOptions {
            breakout: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_full(true);
    let report = failure_report(&api, Uuid::new_v4(), &options).await.unwrap();
    let value = to_json(&report);

    assert_eq!(
        value["east"]["summary"]["RAM"],
        json!({
            "count": 1,
            "subcategories": {"DIMM-A1": 1},
            "vendors": {"Dell": 1},
            "platforms": {"HA-3301": 1}
        })
    );
    assert_eq!(
        value["east"]["summary"]["component_count"],
        json!({"count": 1, "vendors": {"Dell": 1}, "platforms": {"HA-3301": 1}})
    );
    assert_eq!(value["west"]["summary"]["UNKNOWN"], json!({"count": 1, "vendors": {"UNKNOWN": 1}}));

    let failed = &value["east"]["racks"]["R1"]["failed_devices"];
    assert_eq!(failed["S2"], json!({"platform": "HA-3301", "components": ["DIMM-A1", "component_count"]}));
    assert!(failed.get("S1").is_none());
}

#[tokio::test]
async fn failure_report_aborts_on_lookup_error() {
    let mut api = fleet();
    api.broken.insert("S3".to_string());

    let err = failure_report(&api, Uuid::new_v4(), &FailureOptions::default())
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("S3"));
}

#[tokio::test]
async fn failure_report_filter_skips_lookups_outside_datacenter() {
    let api = fleet();
    let options = FailureOptions {
        aggregate: AggregateOptions {
            datacenter: Some(DC_WEST.parse().unwrap()),
            ..Default::default()
        },
        ..Default::default()
    };
    let report = failure_report(&api, Uuid::new_v4(), &options).await.unwrap();

    assert!(report.datacenter("east").is_none());
    assert_eq!(report.datacenter("west").unwrap().summary().len(), 1);
    assert!(!api.calls().contains(&"validation S2".to_string()));
}

const BATCH: &str = r#"{
    "S2": {
        "dimm_fail": {
            "first_fail": {"timestamp": "2018-06-01T10:00:00Z", "result": {"category": "RAM"}},
            "first_pass": {"timestamp": "2018-06-01T12:00:00Z"}
        }
    },
    "S3": {
        "dimm_fail": {
            "first_fail": {"timestamp": "2018-06-02T10:00:00Z", "result": {"category": "RAM"}},
            "first_pass": {"timestamp": "2018-06-02T11:00:00Z"}
        }
    },
    "S9": {
        "psu_fail": {
            "first_fail": {"timestamp": "2018-06-02T10:00:00Z"},
            "first_pass": {"timestamp": 0}
        }
    }
}"#;

#[tokio::test]
async fn mbo_report_from_batch_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.json");
    std::fs::write(&path, BATCH).unwrap();

    let api = fleet();
    let batch = load_batch_file(&path).await.unwrap();
    let report = mbo_hardware_failure(&api, &batch, AggregateOptions::default()).await.unwrap();
    let value = to_json(&report);

    assert_eq!(value["east"]["summary"]["RAM"], json!({"count": 1, "mean": 7200.0, "median": 7200.0}));
    assert_eq!(value["west"]["summary"]["RAM"], json!({"count": 1, "mean": 3600.0, "median": 3600.0}));
    assert_eq!(api.calls(), vec!["device S2", "device S3"]);

    let mut csv = Vec::new();
    render_csv(&report, &mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("datacenter,datacenter_id,rack,category,count,mean_seconds,median_seconds")
    );
    assert_eq!(lines.next(), Some(format!("east,{},,RAM,1,7200,7200", DC_EAST).as_str()));
}

#[tokio::test]
async fn mbo_report_aborts_on_device_lookup_error() {
    let mut api = fleet();
    api.broken.insert("S2".to_string());
    let batch = serde_json::from_str(BATCH).unwrap();

    let result = mbo_hardware_failure(&api, &batch, AggregateOptions::default()).await;
    assert!(result.is_err());
    assert_eq!(api.calls(), vec!["device S2"]);
}

#[tokio::test]
async fn missing_batch_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_batch_file(&dir.path().join("absent.json")).await.is_err());
}
