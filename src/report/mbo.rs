//! MBO hardware failure report: time from first failure to first pass, per component category.
//!
//! Input is the JSON produced by the nightly batch job:
//! `{ serial: { failure_type: { "first_fail": point, "first_pass": point } } }`
//! where each point carries a timestamp and the classification result of that run.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::api::ConchApi;

use super::aggregator::{AggregateOptions, Aggregator, Keys, Report};
use super::metric::Timing;
use super::normalize::normalize_category;

/// serial -> failure type -> window
pub type BatchFile = BTreeMap<String, BTreeMap<String, FailureWindow>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureWindow {
    #[serde(default)]
    pub first_fail: Option<FailurePoint>,
    #[serde(default)]
    pub first_pass: Option<FailurePoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailurePoint {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<Classification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub component_id: Option<String>,
}

/// Accepts RFC 3339 strings or epoch seconds. Zero, null and unparseable values read as missing.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    };
    Ok(parsed.filter(|t| t.timestamp() > 0))
}

pub async fn load_batch_file(path: &Path) -> Result<BatchFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read batch file: {:?}", path))?;
    let batch: BatchFile =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse batch file: {:?}", path))?;
    info!("Loaded batch file {:?}: {} devices", path, batch.len());
    Ok(batch)
}

/// (category, seconds) for every failure type with a usable fail/pass pair.
///
/// The category comes from the first-fail classification, falling back to the
/// failure type name. Missing timestamps and non-positive intervals are dropped.
pub fn timing_samples(serial: &str, failures: &BTreeMap<String, FailureWindow>) -> Vec<(String, f64)> {
    let mut samples = Vec::new();
    for (failure_type, window) in failures {
        let fail_at = window.first_fail.as_ref().and_then(|p| p.timestamp);
        let pass_at = window.first_pass.as_ref().and_then(|p| p.timestamp);

        let (fail_at, pass_at) = match (fail_at, pass_at) {
            (Some(f), Some(p)) => (f, p),
            _ => {
                debug!("{}: {} has no complete fail/pass pair, skipping", serial, failure_type);
                continue;
            }
        };

        let seconds = (pass_at - fail_at).num_seconds();
        if seconds <= 0 {
            debug!("{}: {} passed before it failed ({}s), skipping", serial, failure_type, seconds);
            continue;
        }

        let raw_category = window
            .first_fail
            .as_ref()
            .and_then(|p| p.result.as_ref())
            .and_then(|r| r.category.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(failure_type);

        samples.push((normalize_category(raw_category), seconds as f64));
    }
    samples
}

/// Build the timing report. Each serial with usable samples costs one device
/// lookup for its location; the first lookup error aborts the report.
pub async fn mbo_hardware_failure(api: &dyn ConchApi, batch: &BatchFile, options: AggregateOptions) -> Result<Report<Timing>> {
    let mut aggregator: Aggregator<Timing> = Aggregator::new(options);

    for (serial, failures) in batch {
        let samples = timing_samples(serial, failures);
        if samples.is_empty() {
            continue;
        }

        let device = api
            .device(serial)
            .await
            .with_context(|| format!("Failed to fetch device {}", serial))?;

        for (category, seconds) in samples {
            aggregator.ingest(Keys::from_location(device.location.as_ref(), category), seconds);
        }
    }

    info!(
        "MBO report: {} samples ingested, {} outside datacenter filter",
        aggregator.ingested(),
        aggregator.filtered()
    );
    Ok(aggregator.finish())
}
